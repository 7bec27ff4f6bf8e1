//! Client principal pour naviguer dans un partage public Mail.ru Cloud
//!
//! Ce module fournit un client haut-niveau combinant l'API bas-niveau et la
//! mémoïsation du token et de l'URL de base.

use crate::api::CloudApi;
use crate::cache::CloudCache;
use crate::config_ext::CloudConfigExt;
use crate::error::Result;
use crate::models::{ListingCounts, ListingPage};
use crate::paths;
use sabconfig::Config;
use std::time::Duration;
use tracing::{debug, info};

/// Durée de validité par défaut du token mémoïsé (5 minutes)
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 300;

/// Durée de validité par défaut de l'URL de base mémoïsée (30 minutes)
pub const DEFAULT_BASE_URL_TTL_SECS: u64 = 1800;

/// Client Mail.ru Cloud haut-niveau avec mémoïsation
///
/// Les échecs réseau, les statuts non-2xx et les réponses malformées
/// remontent à l'appelant sans nouvelle tentative interne ; la stratégie de
/// reprise appartient à la couche d'interaction.
pub struct CloudClient {
    /// API bas-niveau
    api: CloudApi,
    /// Caches mémoïsés (token, URL de base)
    cache: CloudCache,
    /// TTL du token mémoïsé
    token_ttl: Duration,
    /// TTL de l'URL de base mémoïsée
    base_url_ttl: Duration,
}

impl CloudClient {
    /// Crée un nouveau client avec les TTLs par défaut
    pub fn new() -> Result<Self> {
        Ok(Self {
            api: CloudApi::new()?,
            cache: CloudCache::new(),
            token_ttl: Duration::from_secs(DEFAULT_TOKEN_TTL_SECS),
            base_url_ttl: Duration::from_secs(DEFAULT_BASE_URL_TTL_SECS),
        })
    }

    /// Crée un client en utilisant la configuration de sabconfig
    pub fn from_config(config: &Config) -> Result<Self> {
        let token_ttl = Duration::from_secs(config.get_cloud_token_ttl_secs()?);
        let base_url_ttl = Duration::from_secs(config.get_cloud_base_url_ttl_secs()?);
        info!(
            "Creating cloud client (token TTL {:?}, base URL TTL {:?})",
            token_ttl, base_url_ttl
        );

        Ok(Self {
            api: CloudApi::new()?,
            cache: CloudCache::new(),
            token_ttl,
            base_url_ttl,
        })
    }

    /// Retourne une référence à l'API bas-niveau
    pub fn api(&self) -> &CloudApi {
        &self.api
    }

    // ============ Listing ============

    /// Récupère une page d'entrées d'un dossier
    ///
    /// Retourne jusqu'à `limit` entrées à partir de `offset`, avec les totaux
    /// du dossier tels que rapportés par le service.
    pub async fn fetch_page(&self, folder: &str, offset: usize, limit: usize) -> Result<ListingPage> {
        self.api.list_folder(folder, offset, limit).await
    }

    /// Récupère uniquement les totaux d'un dossier
    ///
    /// Listing minimal (une entrée) dont seuls les compteurs sont conservés.
    pub async fn fetch_counts(&self, folder: &str) -> Result<ListingCounts> {
        let page = self.api.list_folder(folder, 0, 1).await?;
        Ok(page.counts)
    }

    // ============ Token et URL de base ============

    /// Retourne le token de téléchargement courant
    ///
    /// La valeur est mémoïsée : plusieurs sessions logiques qui la demandent
    /// dans la fenêtre du TTL partagent la même émission.
    pub async fn download_token(&self) -> Result<String> {
        if let Some(token) = self.cache.get_token() {
            debug!("Download token found in cache");
            return Ok(token);
        }

        let token = self.api.download_token().await?;
        self.cache.put_token(token.clone(), self.token_ttl);

        Ok(token)
    }

    /// Invalide le token mémoïsé
    ///
    /// Garantit que la prochaine demande réémettra un token.
    pub fn invalidate_token(&self) {
        self.cache.invalidate_token();
    }

    /// Retourne l'URL de base de streaming pour un partage
    ///
    /// La valeur est mémoïsée par partage ; l'appelant doit tolérer une URL
    /// rassie pendant au plus la fenêtre du TTL.
    pub async fn base_url(&self, share: &str) -> Result<String> {
        if let Some(url) = self.cache.get_base_url(share) {
            debug!("Base URL for {} found in cache", share);
            return Ok(url);
        }

        let url = self.api.base_url().await?;
        self.cache
            .put_base_url(share.to_string(), url.clone(), self.base_url_ttl);

        Ok(url)
    }

    /// Construit l'URL de streaming d'un fichier du partage
    ///
    /// Combine l'URL de base (mémoïsée), le token fourni et le chemin encodé.
    pub async fn stream_url(&self, share: &str, token: &str, file_path: &str) -> Result<String> {
        let base = self.base_url(share).await?;
        Ok(paths::build_stream_url(&base, token, file_path))
    }

    /// Vide tous les caches mémoïsés
    ///
    /// Utilisé par l'action "rafraîchir" : la prochaine interaction
    /// réobtiendra token et URL de base.
    pub fn clear_caches(&self) {
        self.cache.clear();
    }
}
