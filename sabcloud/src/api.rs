//! Couche d'accès à l'API publique Mail.ru Cloud
//!
//! Ce module fournit une interface bas-niveau pour communiquer avec les
//! endpoints publics du service : listing de dossier partagé, émission du
//! token de téléchargement, résolution de l'URL de base de streaming.

use crate::error::{CloudError, Result};
use crate::models::{ListingCounts, ListingPage};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Endpoint de listing d'un dossier partagé
pub const API_FOLDER_URL: &str = "https://cloud.mail.ru/api/v2/folder";

/// Endpoint d'émission du token de téléchargement anonyme
pub const API_TOKEN_URL: &str = "https://cloud.mail.ru/api/v2/tokens/download";

/// Endpoint du dispatcher (résolution de l'URL de base de streaming)
pub const API_DISPATCHER_URL: &str = "https://cloud.mail.ru/api/v2/dispatcher";

/// User-Agent par défaut (le service rejette celui de reqwest)
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// Timeout par défaut des requêtes HTTP (30 secondes)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Enveloppe commune des réponses de l'API
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    body: Option<T>,
}

/// Corps d'une réponse de listing
#[derive(Debug, Default, Deserialize)]
struct FolderBody {
    #[serde(default)]
    list: Vec<crate::models::Entry>,
    #[serde(default)]
    count: ListingCounts,
}

/// Corps d'une réponse de token
#[derive(Debug, Default, Deserialize)]
struct TokenBody {
    #[serde(default)]
    token: String,
}

/// Corps d'une réponse du dispatcher
///
/// `weblink_get` arrive soit comme tableau d'objets `{url}`, soit comme
/// chaîne nue selon les versions du service ; `weblink_get_url` est une
/// variante historique.
#[derive(Debug, Default, Deserialize)]
struct DispatcherBody {
    #[serde(default)]
    weblink_get: Value,
    #[serde(default)]
    weblink_get_url: Value,
}

/// Client API bas-niveau pour les endpoints publics Mail.ru Cloud
///
/// Le client est sans état et ne mémoïse rien ; la mémoïsation du token et
/// de l'URL de base est gérée par les couches supérieures.
#[derive(Debug, Clone)]
pub struct CloudApi {
    client: Client,
}

impl CloudApi {
    /// Crée une nouvelle instance de l'API avec les réglages par défaut
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;

        Ok(Self { client })
    }

    /// Crée une instance avec un `reqwest::Client` personnalisé
    ///
    /// Utile pour partager un pool de connexions ou configurer un proxy
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Liste une page d'un dossier partagé
    ///
    /// # Arguments
    ///
    /// * `weblink` - Chemin distant du dossier (les slashs de bord sont retirés)
    /// * `offset` - Index de la première entrée demandée
    /// * `limit` - Nombre maximum d'entrées retournées
    pub async fn list_folder(&self, weblink: &str, offset: usize, limit: usize) -> Result<ListingPage> {
        let offset_s = offset.to_string();
        let limit_s = limit.to_string();
        let params = [
            ("weblink", weblink.trim_matches('/')),
            ("offset", offset_s.as_str()),
            ("limit", limit_s.as_str()),
            ("api", "2"),
        ];

        debug!("GET {} weblink={} offset={} limit={}", API_FOLDER_URL, weblink, offset, limit);

        let response = self.client.get(API_FOLDER_URL).query(&params).send().await?;
        let envelope: Envelope<FolderBody> = Self::handle_response(response).await?;
        let body = envelope.body.unwrap_or_default();

        Ok(ListingPage {
            entries: body.list,
            counts: body.count,
        })
    }

    /// Émet un token de téléchargement anonyme
    pub async fn download_token(&self) -> Result<String> {
        debug!("GET {}", API_TOKEN_URL);

        let response = self.client.get(API_TOKEN_URL).send().await?;
        let envelope: Envelope<TokenBody> = Self::handle_response(response).await?;

        match envelope.body {
            Some(body) if !body.token.is_empty() => Ok(body.token),
            _ => Err(CloudError::missing_field("body.token")),
        }
    }

    /// Résout l'URL de base de streaming via le dispatcher
    pub async fn base_url(&self) -> Result<String> {
        debug!("GET {}", API_DISPATCHER_URL);

        let response = self.client.get(API_DISPATCHER_URL).send().await?;
        let envelope: Envelope<DispatcherBody> = Self::handle_response(response).await?;
        let body = envelope.body.unwrap_or_default();

        extract_base_url(&body)
    }

    /// Traite la réponse HTTP
    async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let status_code = status.as_u16();

        debug!("Response status: {}", status);

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("API error ({}): {}", status_code, error_text);
            return Err(CloudError::from_status_code(status_code, error_text));
        }

        let text = response.text().await?;

        serde_json::from_str(&text).map_err(|e| {
            warn!("Failed to parse response: {}", e);
            CloudError::JsonParse(e)
        })
    }
}

/// Extrait l'URL de base d'un corps de réponse dispatcher
///
/// Accepte les deux formes connues (`[{url}]` ou chaîne nue) sur
/// `weblink_get` puis `weblink_get_url` ; l'absence de valeur utilisable est
/// une erreur fatale pour le partage courant.
fn extract_base_url(body: &DispatcherBody) -> Result<String> {
    for candidate in [&body.weblink_get, &body.weblink_get_url] {
        match candidate {
            Value::Array(items) => {
                if let Some(url) = items
                    .first()
                    .and_then(|v| v.get("url"))
                    .and_then(|u| u.as_str())
                {
                    return Ok(url.to_string());
                }
            }
            Value::String(s) if !s.is_empty() => return Ok(s.clone()),
            _ => {}
        }
    }
    Err(CloudError::Configuration(
        "dispatcher did not return body.weblink_get[0].url".to_string(),
    ))
}
