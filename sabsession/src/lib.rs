//! # sabsession - Moteur de navigation de SabahMusic
//!
//! Cette crate contient la logique de navigation de l'archive : pile de
//! dossiers, accumulation paginée des listings, tri et filtrage, gestion du
//! token par ticks d'interaction et mémoire durable du dernier épisode joué
//! par dossier.
//!
//! ## Architecture
//!
//! - `NavSession` : état d'une session de navigation (pile, pages
//!   accumulées, sélection, ticks)
//! - `ordering` : tri des dossiers/fichiers et filtrage par sous-chaîne
//! - `progress` : persistance atomique du dernier épisode joué
//! - `tokens` : réémission du token de téléchargement par âge en ticks
//!
//! ## Modèle d'exécution
//!
//! Une interaction utilisateur = un cycle requête/réponse : l'appelant
//! incrémente le tick ([`NavSession::begin_interaction`]), pilote la session,
//! puis rend la vue. Aucune exécution en arrière-plan ; un appel réseau en
//! échec remonte immédiatement et interrompt l'interaction courante.
//!
//! ## Utilisation
//!
//! ```rust,no_run
//! use sabcloud::CloudClient;
//! use sabsession::{NavSession, ProgressStore, TokenKeeper};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = CloudClient::new()?;
//!     let store = ProgressStore::new("progress.json");
//!     let mut session = NavSession::new("4RaM/vXuYxiCgD", 200);
//!     let mut tokens = TokenKeeper::default();
//!
//!     let tick = session.begin_interaction();
//!     session.load_first_page(&client).await?;
//!
//!     if let Some(name) = session.default_selection(&store) {
//!         session.select(&name);
//!         let token = tokens.current(&client, tick).await?;
//!         if let Some(entry) = session.selected_entry() {
//!             let path = sabcloud::normalize_child_path(&entry.weblink, &entry.name);
//!             let url = client.stream_url(session.share(), &token, &path).await?;
//!             store.update(session.current(), &name)?;
//!             println!("{}", url);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod config_ext;
pub mod error;
pub mod ordering;
pub mod progress;
pub mod session;
pub mod tokens;

pub use config_ext::SessionConfigExt;
pub use error::{Result, SessionError};
pub use progress::{ProgressRecord, ProgressStore};
pub use session::NavSession;
pub use tokens::TokenKeeper;
