//! # sabcloud - Client Mail.ru Cloud pour SabahMusic
//!
//! Cette crate fournit un client Rust pour l'API publique de Mail.ru Cloud,
//! limitée au flux anonyme des partages publics : listing paginé d'un
//! dossier, émission du token de téléchargement et résolution de l'URL de
//! base de streaming.
//!
//! ## Vue d'ensemble
//!
//! `sabcloud` permet :
//! - Le listing paginé d'un dossier partagé (entrées + totaux)
//! - L'émission mémoïsée du token de téléchargement anonyme
//! - La résolution mémoïsée de l'URL de base via le dispatcher
//! - L'encodage et la composition des chemins distants en URLs de streaming
//!
//! ## Architecture
//!
//! - `CloudClient` : client principal avec mémoïsation
//! - `models` : structures de données (Entry, ListingPage, etc.)
//! - `api` : couche d'accès aux endpoints REST
//! - `cache` : entrées mémoïsées horodatées avec TTL
//! - `paths` : encodage et composition des chemins
//!
//! ## Utilisation
//!
//! ```rust,no_run
//! use sabcloud::CloudClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = CloudClient::new()?;
//!
//!     let page = client.fetch_page("4RaM/vXuYxiCgD", 0, 200).await?;
//!     for entry in page.files() {
//!         println!("{}", entry.name);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Gestion des erreurs
//!
//! La crate utilise `thiserror` pour définir des erreurs typées ; les échecs
//! réseau, statuts non-2xx et réponses malformées remontent à l'appelant
//! sans nouvelle tentative interne.
//!
//! ## Voir aussi
//!
//! - [`sabconfig`] : Configuration

pub mod api;
pub mod cache;
pub mod client;
pub mod config_ext;
pub mod error;
pub mod models;
pub mod paths;

pub use api::CloudApi;
pub use cache::CloudCache;
pub use client::CloudClient;
pub use config_ext::CloudConfigExt;
pub use error::{CloudError, Result};
pub use models::{Entry, EntryKind, ListingCounts, ListingPage};
pub use paths::{build_stream_url, encode_path_segment, normalize_child_path};
