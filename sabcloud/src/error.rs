//! Gestion des erreurs pour le client Mail.ru Cloud

use thiserror::Error;

/// Type Result personnalisé pour sabcloud
pub type Result<T> = std::result::Result<T, CloudError>;

/// Erreurs possibles lors de l'utilisation du client Mail.ru Cloud
#[derive(Error, Debug)]
pub enum CloudError {
    /// Erreur HTTP (transport)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Erreur de parsing JSON
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Ressource non trouvée (partage ou dossier invalide)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Erreur de l'API Mail.ru Cloud (statut non-2xx)
    #[error("Cloud API error (code {code}): {message}")]
    ApiError { code: u16, message: String },

    /// Champ attendu absent ou malformé dans une réponse
    #[error("Missing or malformed field in response: {0}")]
    MissingField(String),

    /// Erreur de configuration (pas d'URL de base utilisable pour le partage)
    #[error("Cloud configuration error: {0}")]
    Configuration(String),

    /// Erreur de configuration (sabconfig/anyhow)
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),
}

impl CloudError {
    /// Crée une erreur API depuis un code de statut HTTP et un message
    pub fn from_status_code(code: u16, message: impl Into<String>) -> Self {
        match code {
            404 => Self::NotFound(message.into()),
            _ => Self::ApiError {
                code,
                message: message.into(),
            },
        }
    }

    /// Crée une erreur de champ manquant
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }
}
