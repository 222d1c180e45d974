//! Kubeconfig store: load, merge, validate and atomically persist the
//! cluster-access document.
//!
//! # Usage
//!
//! ```rust,no_run
//! use kconnect_core::kubeconfig::{ClusterEntry, KubeconfigStore};
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = KubeconfigStore::locate(None);
//!     store.add_cluster("dev", ClusterEntry::new("https://dev.example.com"))?;
//!     let doc = store.get_config()?;
//!     assert!(doc.clusters.contains_key("dev"));
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod merge;
pub mod redact;
pub mod store;
pub mod types;
pub mod validation;

pub use errors::KubeconfigError;
pub use merge::merge_documents;
pub use redact::redact_secrets;
pub use store::{KUBECONFIG_ENV, KubeconfigStore, resolve_kubeconfig_path};
pub use types::{
    AuthEntry, ClusterEntry, ConfigDocument, ContextEntry, ExecConfig, ExecEnvVar, parse_document,
    render_document,
};
pub use validation::validate_document;
