//! Structural checks run before anything is merged or written.

use super::errors::KubeconfigError;
use super::types::ConfigDocument;

/// Validate a document that is about to be merged.
///
/// Only structure is checked: references between sections are not, because a
/// single-key document (e.g. a lone context) legitimately points at entries
/// that live in the file it is merged into.
pub fn validate_document(doc: &ConfigDocument) -> Result<(), KubeconfigError> {
    for (name, cluster) in &doc.clusters {
        check_name("cluster", name)?;
        if cluster.server.trim().is_empty() {
            return Err(invalid(format!("cluster '{}' has no server", name)));
        }
    }

    for name in doc.auth_infos.keys() {
        check_name("user", name)?;
    }

    for (name, context) in &doc.contexts {
        check_name("context", name)?;
        if context.cluster.trim().is_empty() {
            return Err(invalid(format!("context '{}' has no cluster", name)));
        }
        if context.user.trim().is_empty() {
            return Err(invalid(format!("context '{}' has no user", name)));
        }
    }

    for name in doc.extensions.keys() {
        check_name("extension", name)?;
    }

    Ok(())
}

/// Check that `current_context` names a context present in `doc`.
pub fn validate_current_context(doc: &ConfigDocument) -> Result<(), KubeconfigError> {
    if doc.current_context.is_empty() || doc.contexts.contains_key(&doc.current_context) {
        return Ok(());
    }
    Err(invalid(format!(
        "current context '{}' does not exist",
        doc.current_context
    )))
}

fn check_name(section: &str, name: &str) -> Result<(), KubeconfigError> {
    if name.trim().is_empty() {
        return Err(invalid(format!("{} name must not be empty", section)));
    }
    if name.chars().any(|c| c.is_control()) {
        return Err(invalid(format!(
            "{} name '{}' contains control characters",
            section,
            name.escape_debug()
        )));
    }
    Ok(())
}

fn invalid(message: String) -> KubeconfigError {
    KubeconfigError::Validation { message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kubeconfig::types::{AuthEntry, ClusterEntry, ContextEntry};

    #[test]
    fn test_valid_document() {
        let mut doc = ConfigDocument::default();
        doc.clusters
            .insert("c1".to_string(), ClusterEntry::new("https://c1"));
        doc.auth_infos.insert("a1".to_string(), AuthEntry::default());
        doc.contexts
            .insert("ctx1".to_string(), ContextEntry::new("c1", "a1"));
        assert!(validate_document(&doc).is_ok());
    }

    #[test]
    fn test_lone_context_is_structurally_valid() {
        let mut doc = ConfigDocument::default();
        doc.contexts
            .insert("ctx1".to_string(), ContextEntry::new("elsewhere", "someone"));
        assert!(validate_document(&doc).is_ok());
    }

    #[test]
    fn test_cluster_without_server() {
        let mut doc = ConfigDocument::default();
        doc.clusters
            .insert("c1".to_string(), ClusterEntry::default());
        let err = validate_document(&doc).unwrap_err();
        assert!(err.to_string().contains("cluster 'c1' has no server"));
    }

    #[test]
    fn test_context_without_user() {
        let mut doc = ConfigDocument::default();
        doc.contexts
            .insert("ctx1".to_string(), ContextEntry::new("c1", ""));
        assert!(validate_document(&doc).is_err());
    }

    #[test]
    fn test_empty_name() {
        let mut doc = ConfigDocument::default();
        doc.auth_infos.insert(" ".to_string(), AuthEntry::default());
        let err = validate_document(&doc).unwrap_err();
        assert!(err.to_string().contains("user name must not be empty"));
    }

    #[test]
    fn test_current_context_must_exist() {
        let mut doc = ConfigDocument {
            current_context: "missing".to_string(),
            ..Default::default()
        };
        assert!(validate_current_context(&doc).is_err());

        doc.contexts
            .insert("missing".to_string(), ContextEntry::new("c", "u"));
        assert!(validate_current_context(&doc).is_ok());
    }
}
