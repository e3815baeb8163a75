//! # Funnel Workspace
//!
//! Persistence and funnel-level services around the editor: loading pages
//! from the document backend, writing every change back through a
//! single-flight auto-saver, publishing, and multi-step navigation.
//!
//! Every backend call is wrapped in a timeout (see [`external`]); failures
//! are logged and reported through a [`Notifier`], never retried.

pub mod backend;
pub mod config;
pub mod error;
pub mod external;
pub mod loader;
pub mod navigator;
pub mod notify;
pub mod publish;
pub mod service;
pub mod sync;
pub mod wizard;

pub use backend::{DocumentBackend, MemoryBackend};
pub use config::SyncConfig;
pub use error::{SyncError, SyncResult};
pub use external::{with_fallback, with_timeout, Fetched};
pub use loader::{LoadOutcome, Loader, OpenDocument};
pub use navigator::{Destination, Navigator};
pub use notify::{CollectingNotifier, Level, Notification, Notifier, TracingNotifier};
pub use publish::{mark_published, public_slug, published_url, slugify};
pub use service::FunnelService;
pub use sync::AutoSaver;
pub use wizard::{FunnelRequest, FunnelWizard, WizardError, WizardStep};
