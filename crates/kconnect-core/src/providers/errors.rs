//! Provider-specific error types.

use crate::errors::KconnectError;
use crate::flags::FlagError;
use crate::prompt::PromptError;

/// Registry lookup and registration failures.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Unknown cluster provider '{name}'. Supported: {available}")]
    UnknownClusterProvider { name: String, available: String },

    #[error("Unknown identity provider '{name}'. Supported: {available}")]
    UnknownIdentityProvider { name: String, available: String },

    #[error("Cluster provider '{cluster}' does not support identity provider '{identity}'. Supported: {supported}")]
    UnsupportedIdentityProvider {
        cluster: String,
        identity: String,
        supported: String,
    },

    #[error("Provider '{name}' is already registered")]
    DuplicateProvider { name: String },
}

impl KconnectError for ProviderError {
    fn error_code(&self) -> &'static str {
        match self {
            ProviderError::UnknownClusterProvider { .. } => "UNKNOWN_CLUSTER_PROVIDER",
            ProviderError::UnknownIdentityProvider { .. } => "UNKNOWN_IDENTITY_PROVIDER",
            ProviderError::UnsupportedIdentityProvider { .. } => "UNSUPPORTED_IDENTITY_PROVIDER",
            ProviderError::DuplicateProvider { .. } => "DUPLICATE_PROVIDER",
        }
    }

    fn is_user_error(&self) -> bool {
        !matches!(self, ProviderError::DuplicateProvider { .. })
    }
}

/// Failures talking to a vendor CLI.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("'{program}' is not installed or not in PATH")]
    NotInstalled { program: String },

    #[error("'{program}' failed: {message}")]
    CommandFailed { program: String, message: String },

    #[error("'{program}' returned unexpected output: {message}")]
    InvalidOutput { program: String, message: String },
}

impl KconnectError for BackendError {
    fn error_code(&self) -> &'static str {
        match self {
            BackendError::NotInstalled { .. } => "BACKEND_NOT_INSTALLED",
            BackendError::CommandFailed { .. } => "BACKEND_COMMAND_FAILED",
            BackendError::InvalidOutput { .. } => "BACKEND_INVALID_OUTPUT",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, BackendError::NotInstalled { .. })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("'--{flag}' is required by identity provider '{provider}'")]
    MissingValue { provider: String, flag: String },

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Flag(#[from] FlagError),
}

impl KconnectError for AuthenticationError {
    fn error_code(&self) -> &'static str {
        match self {
            AuthenticationError::MissingValue { .. } => "AUTH_MISSING_VALUE",
            AuthenticationError::Prompt(_) => "AUTH_PROMPT_FAILED",
            AuthenticationError::Backend(_) => "AUTH_BACKEND_FAILED",
            AuthenticationError::Flag(_) => "AUTH_FLAG_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            AuthenticationError::MissingValue { .. } | AuthenticationError::Prompt(_)
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    #[error("Required option(s) not set: {}", format_flags(.names))]
    MissingRequired { names: Vec<String> },

    #[error("Invalid value for '--{flag}': {message}")]
    InvalidValue { flag: String, message: String },

    #[error("No choices available for '--{flag}'")]
    NoChoices { flag: String },

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Flag(#[from] FlagError),
}

fn format_flags(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("--{}", n))
        .collect::<Vec<_>>()
        .join(", ")
}

impl KconnectError for ResolutionError {
    fn error_code(&self) -> &'static str {
        match self {
            ResolutionError::MissingRequired { .. } => "RESOLUTION_MISSING_REQUIRED",
            ResolutionError::InvalidValue { .. } => "RESOLUTION_INVALID_VALUE",
            ResolutionError::NoChoices { .. } => "RESOLUTION_NO_CHOICES",
            ResolutionError::Prompt(_) => "RESOLUTION_PROMPT_FAILED",
            ResolutionError::Backend(_) => "RESOLUTION_BACKEND_FAILED",
            ResolutionError::Flag(_) => "RESOLUTION_FLAG_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            ResolutionError::MissingRequired { .. }
                | ResolutionError::InvalidValue { .. }
                | ResolutionError::NoChoices { .. }
                | ResolutionError::Prompt(_)
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("No clusters found")]
    NoClusters,

    #[error("Cluster '{id}' was not found among the discovered clusters")]
    ClusterNotFound { id: String },

    #[error("Option '--{flag}' has no value")]
    MissingOption { flag: String },

    #[error("Cluster '{name}' is missing {field}")]
    IncompleteCluster { name: String, field: String },

    #[error("Credentials returned for cluster '{name}' are invalid: {message}")]
    InvalidCredentials { name: String, message: String },

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Flag(#[from] FlagError),
}

impl KconnectError for DiscoveryError {
    fn error_code(&self) -> &'static str {
        match self {
            DiscoveryError::NoClusters => "DISCOVERY_NO_CLUSTERS",
            DiscoveryError::ClusterNotFound { .. } => "DISCOVERY_CLUSTER_NOT_FOUND",
            DiscoveryError::MissingOption { .. } => "DISCOVERY_MISSING_OPTION",
            DiscoveryError::IncompleteCluster { .. } => "DISCOVERY_INCOMPLETE_CLUSTER",
            DiscoveryError::InvalidCredentials { .. } => "DISCOVERY_INVALID_CREDENTIALS",
            DiscoveryError::Prompt(_) => "DISCOVERY_PROMPT_FAILED",
            DiscoveryError::Backend(_) => "DISCOVERY_BACKEND_FAILED",
            DiscoveryError::Flag(_) => "DISCOVERY_FLAG_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            DiscoveryError::NoClusters
                | DiscoveryError::ClusterNotFound { .. }
                | DiscoveryError::Prompt(_)
        )
    }
}
