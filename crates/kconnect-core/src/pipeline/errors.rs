//! Pipeline error types.

use std::fmt;

use crate::errors::{ConfigError, KconnectError};
use crate::flags::FlagError;
use crate::kubeconfig::KubeconfigError;
use crate::providers::{AuthenticationError, DiscoveryError, ProviderError, ResolutionError};

/// Stages of the `use` pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Setup,
    Authenticate,
    Resolve,
    Discover,
    Persist,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Setup => "setup",
            Stage::Authenticate => "authenticate",
            Stage::Resolve => "resolve",
            Stage::Discover => "discover",
            Stage::Persist => "persist",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("No cluster provider given. Usage: kconnect use <provider> [flags]. Supported: {available}")]
    MissingProviderArgument { available: String },

    #[error("No identity provider given for '{cluster}'. Pass --idp-protocol with one of: {supported}")]
    MissingIdpProtocol { cluster: String, supported: String },

    #[error("{message}")]
    InvalidArguments { message: String },

    /// `--help` was passed; `text` is the rendered help.
    #[error("{text}")]
    HelpRequested { text: String },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Flag(#[from] FlagError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl KconnectError for SetupError {
    fn error_code(&self) -> &'static str {
        match self {
            SetupError::MissingProviderArgument { .. } => "MISSING_PROVIDER_ARGUMENT",
            SetupError::MissingIdpProtocol { .. } => "MISSING_IDP_PROTOCOL",
            SetupError::InvalidArguments { .. } => "INVALID_ARGUMENTS",
            SetupError::HelpRequested { .. } => "HELP_REQUESTED",
            SetupError::Provider(e) => e.error_code(),
            SetupError::Flag(e) => e.error_code(),
            SetupError::Config(e) => e.error_code(),
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            SetupError::Provider(e) => e.is_user_error(),
            SetupError::Flag(e) => e.is_user_error(),
            SetupError::Config(e) => e.is_user_error(),
            _ => true,
        }
    }
}

/// The cause of a pipeline failure.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error(transparent)]
    Authentication(#[from] AuthenticationError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Kubeconfig(#[from] KubeconfigError),
}

impl StageError {
    fn as_kconnect(&self) -> &dyn KconnectError {
        match self {
            StageError::Setup(e) => e,
            StageError::Authentication(e) => e,
            StageError::Resolution(e) => e,
            StageError::Discovery(e) => e,
            StageError::Kubeconfig(e) => e,
        }
    }
}

/// A `use` invocation aborted in `stage`. Later stages did not run.
#[derive(Debug, thiserror::Error)]
#[error("{stage} failed: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: StageError,
}

impl PipelineError {
    pub fn new(stage: Stage, source: impl Into<StageError>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }

    /// Rendered help when the user asked for it instead of running.
    pub fn help_text(&self) -> Option<&str> {
        match &self.source {
            StageError::Setup(SetupError::HelpRequested { text }) => Some(text),
            _ => None,
        }
    }
}

impl KconnectError for PipelineError {
    fn error_code(&self) -> &'static str {
        self.source.as_kconnect().error_code()
    }

    fn is_user_error(&self) -> bool {
        self.source.as_kconnect().is_user_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_stage() {
        let error = PipelineError::new(Stage::Discover, DiscoveryError::NoClusters);
        assert_eq!(error.to_string(), "discover failed: No clusters found");
        assert_eq!(error.error_code(), "DISCOVERY_NO_CLUSTERS");
        assert!(error.is_user_error());
    }

    #[test]
    fn test_setup_delegates_to_provider_error() {
        let error = PipelineError::new(
            Stage::Setup,
            SetupError::from(ProviderError::UnknownClusterProvider {
                name: "gke".to_string(),
                available: "aks, eks".to_string(),
            }),
        );
        assert_eq!(error.error_code(), "UNKNOWN_CLUSTER_PROVIDER");
        assert!(error.help_text().is_none());
    }

    #[test]
    fn test_stage_order() {
        assert!(Stage::Setup < Stage::Authenticate);
        assert!(Stage::Discover < Stage::Persist);
    }
}
