//! Extension pour intégrer le client cloud dans sabconfig
//!
//! Ce module fournit le trait `CloudConfigExt` qui ajoute à
//! `sabconfig::Config` les accesseurs typés des réglages du client :
//! partage par défaut et fenêtres de mémoïsation.

use anyhow::Result;
use sabconfig::Config;
use serde_yaml::Value;

/// Partage public par défaut (l'archive Modern Sabahlar)
pub const DEFAULT_SHARE: &str = "4RaM/vXuYxiCgD";

/// TTL par défaut du token mémoïsé (secondes)
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 300;

/// TTL par défaut de l'URL de base mémoïsée (secondes)
pub const DEFAULT_BASE_URL_TTL_SECS: u64 = 1800;

/// Trait d'extension pour les réglages du client cloud
///
/// Configuration minimale : le partage visé et les deux fenêtres de
/// mémoïsation. Les getters retombent sur les valeurs par défaut quand la
/// clé est absente ou du mauvais type.
pub trait CloudConfigExt {
    /// Retourne le chemin du partage public (slashs de bord retirés)
    fn get_cloud_share(&self) -> Result<String>;

    /// Définit le chemin du partage public
    fn set_cloud_share(&self, share: &str) -> Result<()>;

    /// Retourne le TTL du token mémoïsé en secondes
    fn get_cloud_token_ttl_secs(&self) -> Result<u64>;

    /// Retourne le TTL de l'URL de base mémoïsée en secondes
    fn get_cloud_base_url_ttl_secs(&self) -> Result<u64>;
}

impl CloudConfigExt for Config {
    fn get_cloud_share(&self) -> Result<String> {
        match self.get_value(&["archive", "share"]) {
            Ok(Value::String(s)) if !s.trim_matches('/').is_empty() => {
                Ok(s.trim_matches('/').to_string())
            }
            _ => Ok(DEFAULT_SHARE.to_string()),
        }
    }

    fn set_cloud_share(&self, share: &str) -> Result<()> {
        self.set_value(
            &["archive", "share"],
            Value::String(share.trim_matches('/').to_string()),
        )
    }

    fn get_cloud_token_ttl_secs(&self) -> Result<u64> {
        match self.get_value(&["cloud", "token_ttl_secs"]) {
            Ok(Value::Number(n)) if n.as_u64().is_some() => Ok(n.as_u64().unwrap()),
            _ => Ok(DEFAULT_TOKEN_TTL_SECS),
        }
    }

    fn get_cloud_base_url_ttl_secs(&self) -> Result<u64> {
        match self.get_value(&["cloud", "base_url_ttl_secs"]) {
            Ok(Value::Number(n)) if n.as_u64().is_some() => Ok(n.as_u64().unwrap()),
            _ => Ok(DEFAULT_BASE_URL_TTL_SECS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config() -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_config(dir.path().to_str().unwrap()).unwrap();
        (dir, config)
    }

    #[test]
    fn test_share_defaults_and_roundtrip() {
        let (_dir, config) = temp_config();
        assert_eq!(config.get_cloud_share().unwrap(), DEFAULT_SHARE);

        config.set_cloud_share("/abc/def/").unwrap();
        assert_eq!(config.get_cloud_share().unwrap(), "abc/def");
    }

    #[test]
    fn test_ttl_defaults() {
        let (_dir, config) = temp_config();
        assert_eq!(
            config.get_cloud_token_ttl_secs().unwrap(),
            DEFAULT_TOKEN_TTL_SECS
        );
        assert_eq!(
            config.get_cloud_base_url_ttl_secs().unwrap(),
            DEFAULT_BASE_URL_TTL_SECS
        );
    }
}
