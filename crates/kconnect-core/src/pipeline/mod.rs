//! The `use` pipeline.
//!
//! `kconnect use <provider> --idp-protocol <idp> ...` runs five stages in
//! order: Setup picks the providers and parses the merged options,
//! Authenticate obtains an identity, Resolve fills unset options, Discover
//! lists clusters and builds entries for the selected one, and Persist merges
//! them into the kubeconfig. The first failure aborts the run as a
//! [`PipelineError`] naming the stage.

pub mod errors;
pub mod handler;
pub mod preparse;

pub use errors::{PipelineError, SetupError, Stage, StageError};
pub use handler::{
    FLAG_ALIAS, FLAG_CLUSTER_ID, FLAG_IDP_PROTOCOL, FLAG_KUBECONFIG, FLAG_SET_CURRENT,
    ResolutionContext, UseOutcome, UseWorkflow, base_flags, select_cluster,
};
