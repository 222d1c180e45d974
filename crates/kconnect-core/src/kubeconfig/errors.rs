use crate::errors::KconnectError;

#[derive(Debug, thiserror::Error)]
pub enum KubeconfigError {
    #[error("Invalid kubeconfig: {message}")]
    Validation { message: String },

    #[error("Failed to read kubeconfig '{path}': {message}")]
    Read { path: String, message: String },

    #[error("Kubeconfig '{path}' is malformed: {message}")]
    Malformed { path: String, message: String },

    #[error("Failed to write kubeconfig '{path}': {message}")]
    Write { path: String, message: String },
}

impl KubeconfigError {
    /// Whether the failure happened reading or writing the file, as opposed
    /// to rejecting the content being merged.
    pub fn is_persistence(&self) -> bool {
        !matches!(self, KubeconfigError::Validation { .. })
    }
}

impl KconnectError for KubeconfigError {
    fn error_code(&self) -> &'static str {
        match self {
            KubeconfigError::Validation { .. } => "KUBECONFIG_VALIDATION",
            KubeconfigError::Read { .. } => "KUBECONFIG_READ_FAILED",
            KubeconfigError::Malformed { .. } => "KUBECONFIG_MALFORMED",
            KubeconfigError::Write { .. } => "KUBECONFIG_WRITE_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            KubeconfigError::Validation { .. } | KubeconfigError::Malformed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_is_not_persistence() {
        let error = KubeconfigError::Validation {
            message: "cluster 'a' has no server".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid kubeconfig: cluster 'a' has no server"
        );
        assert!(!error.is_persistence());
        assert!(error.is_user_error());
    }

    #[test]
    fn test_write_error() {
        let error = KubeconfigError::Write {
            path: "/root/.kube/config".to_string(),
            message: "permission denied".to_string(),
        };
        assert!(error.is_persistence());
        assert_eq!(error.error_code(), "KUBECONFIG_WRITE_FAILED");
        assert!(!error.is_user_error());
    }
}
