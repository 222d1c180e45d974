//! Read-modify-write operations on a kubeconfig file.
//!
//! Every operation loads the file, applies its change and writes the whole
//! document back through a temporary file in the same directory followed by a
//! rename, so a failed write never leaves a truncated kubeconfig behind.
//! There is no cross-process locking: concurrent writers race and the last
//! rename wins.

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use super::errors::KubeconfigError;
use super::merge::merge_documents;
use super::types::{
    AuthEntry, ClusterEntry, ConfigDocument, ContextEntry, parse_document, render_document,
};
use super::validation::{validate_current_context, validate_document};

/// Environment variable holding a kubeconfig path list.
pub const KUBECONFIG_ENV: &str = "KUBECONFIG";

/// Pick the kubeconfig path.
///
/// Order: explicit path, first non-empty entry of `KUBECONFIG`,
/// `<home>/.kube/config`, and finally `./.kube/config`.
pub fn resolve_kubeconfig_path(
    explicit: Option<&Path>,
    env_value: Option<OsString>,
    home: Option<PathBuf>,
) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    if let Some(value) = env_value
        && let Some(first) = std::env::split_paths(&value).find(|p| !p.as_os_str().is_empty())
    {
        return first;
    }

    match home {
        Some(home) => home.join(".kube").join("config"),
        None => {
            error!(
                event = "core.kubeconfig.home_dir_not_found",
                fallback = ".",
                "Could not determine home directory - using current directory as fallback"
            );
            PathBuf::from(".").join(".kube").join("config")
        }
    }
}

/// Handle to one kubeconfig file.
#[derive(Debug, Clone)]
pub struct KubeconfigStore {
    path: PathBuf,
}

impl KubeconfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store for `explicit`, or the path derived from the environment.
    pub fn locate(explicit: Option<&Path>) -> Self {
        Self::new(resolve_kubeconfig_path(
            explicit,
            std::env::var_os(KUBECONFIG_ENV),
            dirs::home_dir(),
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document. A missing file reads as an empty document.
    pub fn get_config(&self) -> Result<ConfigDocument, KubeconfigError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(
                    event = "core.kubeconfig.not_found",
                    path = %self.path.display()
                );
                return Ok(ConfigDocument::default());
            }
            Err(e) => {
                error!(
                    event = "core.kubeconfig.read_failed",
                    path = %self.path.display(),
                    error = %e
                );
                return Err(KubeconfigError::Read {
                    path: self.path.display().to_string(),
                    message: e.to_string(),
                });
            }
        };

        parse_document(&content).map_err(|message| self.malformed(message))
    }

    /// Merge `incoming` into the file. See [`merge_documents`] for the rules.
    ///
    /// `current-context` is only checked when this write sets or changes it.
    /// A dangling value already in the file is left alone.
    pub fn modify_config(
        &self,
        incoming: &ConfigDocument,
        override_maps: bool,
    ) -> Result<(), KubeconfigError> {
        validate_document(incoming)?;

        let current = self.get_config()?;
        let previous_context = current.current_context.clone();
        let merged = merge_documents(current, incoming, override_maps);
        let sets_current = if override_maps {
            merged.current_context != previous_context
        } else {
            !incoming.current_context.is_empty()
        };
        if sets_current {
            validate_current_context(&merged)?;
        }

        self.save(&merged)?;

        info!(
            event = "core.kubeconfig.modified",
            path = %self.path.display(),
            override_maps = override_maps,
            clusters = incoming.clusters.len(),
            users = incoming.auth_infos.len(),
            contexts = incoming.contexts.len()
        );
        Ok(())
    }

    pub fn set_current_context(&self, name: &str) -> Result<(), KubeconfigError> {
        let incoming = ConfigDocument {
            current_context: name.to_string(),
            ..Default::default()
        };
        self.modify_config(&incoming, false)
    }

    pub fn add_cluster(&self, name: &str, entry: ClusterEntry) -> Result<(), KubeconfigError> {
        let mut incoming = ConfigDocument::default();
        incoming.clusters.insert(name.to_string(), entry);
        self.modify_config(&incoming, false)
    }

    pub fn add_auth_info(&self, name: &str, entry: AuthEntry) -> Result<(), KubeconfigError> {
        let mut incoming = ConfigDocument::default();
        incoming.auth_infos.insert(name.to_string(), entry);
        self.modify_config(&incoming, false)
    }

    pub fn add_context(&self, name: &str, entry: ContextEntry) -> Result<(), KubeconfigError> {
        let mut incoming = ConfigDocument::default();
        incoming.contexts.insert(name.to_string(), entry);
        self.modify_config(&incoming, false)
    }

    pub fn remove_clusters(&self, names: &[&str]) -> Result<(), KubeconfigError> {
        let mut incoming = self.get_config()?;
        for name in names {
            if incoming.clusters.remove(*name).is_none() {
                return Err(not_found("cluster", name));
            }
        }
        self.modify_config(&incoming, true)
    }

    pub fn remove_auth_infos(&self, names: &[&str]) -> Result<(), KubeconfigError> {
        let mut incoming = self.get_config()?;
        for name in names {
            if incoming.auth_infos.remove(*name).is_none() {
                return Err(not_found("user", name));
            }
        }
        self.modify_config(&incoming, true)
    }

    /// Remove contexts together with the cluster and user each one references.
    ///
    /// The referenced entries are removed even when another context still
    /// points at them. Removing the current context clears `current-context`.
    pub fn remove_contexts(&self, names: &[&str]) -> Result<(), KubeconfigError> {
        let mut incoming = self.get_config()?;
        for name in names {
            let context = incoming
                .contexts
                .remove(*name)
                .ok_or_else(|| not_found("context", name))?;
            incoming.clusters.remove(&context.cluster);
            incoming.auth_infos.remove(&context.user);
            if incoming.current_context == *name {
                incoming.current_context.clear();
            }
        }
        self.modify_config(&incoming, true)
    }

    fn save(&self, doc: &ConfigDocument) -> Result<(), KubeconfigError> {
        let yaml = render_document(doc)
            .map_err(|e| self.write_failed(format!("failed to serialize: {}", e)))?;
        write_atomic(&self.path, yaml.as_bytes()).map_err(|e| {
            error!(
                event = "core.kubeconfig.write_failed",
                path = %self.path.display(),
                error = %e
            );
            self.write_failed(e.to_string())
        })
    }

    fn malformed(&self, message: String) -> KubeconfigError {
        error!(
            event = "core.kubeconfig.malformed",
            path = %self.path.display(),
            error = %message
        );
        KubeconfigError::Malformed {
            path: self.path.display().to_string(),
            message,
        }
    }

    fn write_failed(&self, message: String) -> KubeconfigError {
        KubeconfigError::Write {
            path: self.path.display().to_string(),
            message,
        }
    }
}

fn not_found(section: &str, name: &str) -> KubeconfigError {
    KubeconfigError::Validation {
        message: format!("{} '{}' not found", section, name),
    }
}

fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent)?;

    // NamedTempFile is created with 0600, which is what kubeconfig wants.
    let mut tmp = tempfile::NamedTempFile::new_in(&parent)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> KubeconfigStore {
        KubeconfigStore::new(dir.path().join("config"))
    }

    fn cluster(server: &str) -> ClusterEntry {
        ClusterEntry {
            certificate_authority_data: Some("Q0E=".to_string()),
            ..ClusterEntry::new(server)
        }
    }

    fn token_user(token: &str) -> AuthEntry {
        AuthEntry {
            token: Some(token.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_file_is_empty_document() {
        let dir = TempDir::new().unwrap();
        let doc = store_in(&dir).get_config().unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_add_cluster_then_get() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let entry = cluster("https://x.example");

        store.add_cluster("x", entry.clone()).unwrap();

        let doc = store.get_config().unwrap();
        assert_eq!(doc.clusters["x"], entry);
    }

    #[test]
    fn test_end_to_end_build_document() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.add_cluster("c1", cluster("https://c1")).unwrap();
        store.add_auth_info("a1", token_user("t")).unwrap();
        store
            .add_context("ctx1", ContextEntry::new("c1", "a1"))
            .unwrap();
        store.set_current_context("ctx1").unwrap();

        let doc = store.get_config().unwrap();
        assert_eq!(doc.clusters.len(), 1);
        assert_eq!(doc.auth_infos.len(), 1);
        assert_eq!(doc.contexts.len(), 1);
        assert_eq!(doc.current_context, "ctx1");

        let written = std::fs::read_to_string(store.path()).unwrap();
        assert!(written.contains("kind: Config"));
        assert!(written.contains("current-context: ctx1"));
    }

    #[test]
    fn test_remove_context_cascades() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.add_cluster("c1", cluster("https://c1")).unwrap();
        store.add_auth_info("a1", token_user("t")).unwrap();
        store
            .add_context("ctx1", ContextEntry::new("c1", "a1"))
            .unwrap();
        store.set_current_context("ctx1").unwrap();

        store.remove_contexts(&["ctx1"]).unwrap();

        let doc = store.get_config().unwrap();
        assert!(doc.contexts.is_empty());
        assert!(!doc.clusters.contains_key("c1"));
        assert!(!doc.auth_infos.contains_key("a1"));
        assert!(doc.current_context.is_empty());
    }

    #[test]
    fn test_remove_context_cascades_even_when_shared() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.add_cluster("c1", cluster("https://c1")).unwrap();
        store.add_auth_info("a1", token_user("t")).unwrap();
        store
            .add_context("ctx1", ContextEntry::new("c1", "a1"))
            .unwrap();
        store
            .add_context("ctx2", ContextEntry::new("c1", "a1"))
            .unwrap();

        store.remove_contexts(&["ctx1"]).unwrap();

        let doc = store.get_config().unwrap();
        assert!(doc.contexts.contains_key("ctx2"));
        assert!(doc.clusters.is_empty());
        assert!(doc.auth_infos.is_empty());
    }

    #[test]
    fn test_remove_unknown_context_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.add_cluster("c1", cluster("https://c1")).unwrap();
        let before = std::fs::read_to_string(store.path()).unwrap();

        let err = store.remove_contexts(&["nope"]).unwrap_err();
        assert!(err.to_string().contains("context 'nope' not found"));
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), before);
    }

    #[test]
    fn test_remove_clusters_and_users() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.add_cluster("c1", cluster("https://c1")).unwrap();
        store.add_cluster("c2", cluster("https://c2")).unwrap();
        store.add_auth_info("a1", token_user("t")).unwrap();

        store.remove_clusters(&["c1"]).unwrap();
        store.remove_auth_infos(&["a1"]).unwrap();

        let doc = store.get_config().unwrap();
        assert_eq!(doc.clusters.keys().collect::<Vec<_>>(), vec!["c2"]);
        assert!(doc.auth_infos.is_empty());
    }

    #[test]
    fn test_set_unknown_current_context_is_rejected() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let err = store.set_current_context("ghost").unwrap_err();
        assert!(matches!(err, KubeconfigError::Validation { .. }));
        assert!(!store.path().exists());
    }

    #[test]
    fn test_dangling_current_context_does_not_block_writes() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "current-context: gone\n").unwrap();

        store.add_cluster("c1", cluster("https://c1")).unwrap();
        store.add_auth_info("a1", AuthEntry::default()).unwrap();
        store.remove_auth_infos(&["a1"]).unwrap();

        let doc = store.get_config().unwrap();
        assert!(doc.clusters.contains_key("c1"));
        assert_eq!(doc.current_context, "gone");

        let err = store.set_current_context("gone").unwrap_err();
        assert!(matches!(err, KubeconfigError::Validation { .. }));
    }

    #[test]
    fn test_invalid_incoming_is_not_written() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let err = store.add_cluster("bad", ClusterEntry::default()).unwrap_err();
        assert!(!err.is_persistence());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_malformed_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "clusters: [this is: not valid").unwrap();

        let err = store.get_config().unwrap_err();
        assert!(matches!(err, KubeconfigError::Malformed { .. }));
        assert!(err.is_persistence());
    }

    #[test]
    fn test_unreadable_path_is_read_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config");
        std::fs::create_dir_all(&path).unwrap();

        let err = KubeconfigStore::new(&path).get_config().unwrap_err();
        assert!(matches!(err, KubeconfigError::Read { .. }));
    }

    #[test]
    fn test_write_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let store = KubeconfigStore::new(dir.path().join(".kube").join("config"));
        store.add_cluster("c1", cluster("https://c1")).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_existing_entries_and_unknown_fields_preserved() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(
            store.path(),
            r#"apiVersion: v1
kind: Config
clusters:
- name: legacy
  cluster:
    server: https://legacy
    proxy-url: http://proxy
preferences:
  colors: true
"#,
        )
        .unwrap();

        store.add_cluster("new", cluster("https://new")).unwrap();

        let written = std::fs::read_to_string(store.path()).unwrap();
        assert!(written.contains("proxy-url: http://proxy"));
        assert!(written.contains("colors: true"));
        let doc = store.get_config().unwrap();
        assert_eq!(doc.clusters.len(), 2);
    }

    #[test]
    fn test_resolve_path_prefers_explicit() {
        let path = resolve_kubeconfig_path(
            Some(Path::new("/tmp/explicit")),
            Some(OsString::from("/tmp/env")),
            Some(PathBuf::from("/home/u")),
        );
        assert_eq!(path, PathBuf::from("/tmp/explicit"));
    }

    #[test]
    fn test_resolve_path_uses_first_env_entry() {
        let joined = std::env::join_paths(["/tmp/first", "/tmp/second"]).unwrap();
        let path = resolve_kubeconfig_path(None, Some(joined), Some(PathBuf::from("/home/u")));
        assert_eq!(path, PathBuf::from("/tmp/first"));
    }

    #[test]
    fn test_resolve_path_defaults_to_home() {
        let path =
            resolve_kubeconfig_path(None, Some(OsString::new()), Some(PathBuf::from("/home/u")));
        assert_eq!(path, PathBuf::from("/home/u/.kube/config"));
    }
}
