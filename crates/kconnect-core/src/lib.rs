//! kconnect-core: discover Kubernetes clusters on cloud providers and write
//! access entries into a kubeconfig file.
//!
//! # Main Entry Points
//!
//! - [`pipeline`] - The `use` workflow (authenticate, resolve, discover, persist)
//! - [`providers`] - Cluster and identity providers and their registry
//! - [`kubeconfig`] - Load, merge, validate and atomically write kubeconfig files
//! - [`config`] - User and project configuration
//! - [`flags`] - Options contributed by providers

pub mod config;
pub mod errors;
pub mod events;
pub mod flags;
pub mod kubeconfig;
pub mod logging;
pub mod pipeline;
pub mod prompt;
pub mod providers;

// Re-export commonly used types at crate root for convenience
pub use config::KconnectConfig;
pub use errors::{KconnectError, KconnectResult};
pub use kubeconfig::{ConfigDocument, KubeconfigStore};
pub use pipeline::{PipelineError, Stage, UseOutcome, UseWorkflow};
pub use prompt::{Prompter, StdioPrompter};
pub use providers::{ClusterProvider, IdentityProvider, ProviderRegistry};

// Re-export logging initialization
pub use logging::init_logging;
