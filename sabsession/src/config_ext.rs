//! Extension pour intégrer le moteur de navigation dans sabconfig
//!
//! Ajoute à `sabconfig::Config` les accesseurs typés des réglages de
//! session : taille de page, fichier de progression et seuil de
//! rafraîchissement du token.

use anyhow::Result;
use sabconfig::Config;
use serde_yaml::Value;

/// Taille de page par défaut des requêtes de listing
pub const DEFAULT_PAGE_SIZE: usize = 200;

/// Nom par défaut du fichier de progression (relatif au répertoire de config)
pub const DEFAULT_PROGRESS_FILE: &str = "progress.json";

/// Seuil par défaut de rafraîchissement du token, en ticks
pub const DEFAULT_TOKEN_REFRESH_TICKS: u64 = 4;

/// Trait d'extension pour les réglages du moteur de navigation
pub trait SessionConfigExt {
    /// Retourne la taille de page des listings
    fn get_page_size(&self) -> Result<usize>;

    /// Définit la taille de page des listings
    fn set_page_size(&self, size: usize) -> Result<()>;

    /// Retourne le chemin absolu du fichier de progression
    ///
    /// Un chemin relatif configuré est ancré dans le répertoire de
    /// configuration.
    fn get_progress_path(&self) -> Result<String>;

    /// Retourne le seuil de rafraîchissement du token en ticks
    fn get_token_refresh_ticks(&self) -> Result<u64>;
}

impl SessionConfigExt for Config {
    fn get_page_size(&self) -> Result<usize> {
        match self.get_value(&["archive", "page_size"]) {
            Ok(Value::Number(n)) if n.as_u64().map_or(false, |v| v > 0) => {
                Ok(n.as_u64().unwrap() as usize)
            }
            _ => Ok(DEFAULT_PAGE_SIZE),
        }
    }

    fn set_page_size(&self, size: usize) -> Result<()> {
        self.set_value(
            &["archive", "page_size"],
            Value::Number(serde_yaml::Number::from(size)),
        )
    }

    fn get_progress_path(&self) -> Result<String> {
        let file = match self.get_value(&["archive", "progress_file"]) {
            Ok(Value::String(s)) if !s.is_empty() => s,
            _ => DEFAULT_PROGRESS_FILE.to_string(),
        };
        Ok(self.resolve_file(&file))
    }

    fn get_token_refresh_ticks(&self) -> Result<u64> {
        match self.get_value(&["cloud", "token_refresh_ticks"]) {
            Ok(Value::Number(n)) if n.as_u64().is_some() => Ok(n.as_u64().unwrap()),
            _ => Ok(DEFAULT_TOKEN_REFRESH_TICKS),
        }
    }
}
