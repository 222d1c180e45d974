//! Kubeconfig document types.
//!
//! [`ConfigDocument`] is the in-memory model: every section is a map keyed by
//! entry name, so name uniqueness holds by construction. [`RawKubeconfig`] is
//! the on-disk YAML shape (named lists) and is only used at the file boundary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

/// Connection details for one cluster (`clusters[].cluster`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClusterEntry {
    #[serde(default)]
    pub server: String,

    #[serde(
        rename = "certificate-authority-data",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub certificate_authority_data: Option<String>,

    #[serde(
        rename = "certificate-authority",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub certificate_authority: Option<String>,

    #[serde(
        rename = "insecure-skip-tls-verify",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub insecure_skip_tls_verify: Option<bool>,

    /// Fields this tool does not interpret, preserved as-is.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ClusterEntry {
    pub fn new(server: &str) -> Self {
        Self {
            server: server.to_string(),
            ..Default::default()
        }
    }
}

/// Environment variable passed to an exec credential plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecEnvVar {
    pub name: String,
    pub value: String,
}

/// Exec credential plugin (`users[].user.exec`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecConfig {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub command: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<ExecEnvVar>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Credentials for one user (`users[].user`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AuthEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(
        rename = "client-certificate-data",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub client_certificate_data: Option<String>,

    #[serde(
        rename = "client-key-data",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub client_key_data: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exec: Option<ExecConfig>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A named pairing of cluster and user (`contexts[].context`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContextEntry {
    #[serde(default)]
    pub cluster: String,

    #[serde(default)]
    pub user: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ContextEntry {
    pub fn new(cluster: &str, user: &str) -> Self {
        Self {
            cluster: cluster.to_string(),
            user: user.to_string(),
            ..Default::default()
        }
    }
}

/// In-memory kubeconfig.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigDocument {
    pub clusters: BTreeMap<String, ClusterEntry>,
    pub auth_infos: BTreeMap<String, AuthEntry>,
    pub contexts: BTreeMap<String, ContextEntry>,
    pub current_context: String,
    pub extensions: BTreeMap<String, Value>,
    pub preferences: Value,
}

impl ConfigDocument {
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
            && self.auth_infos.is_empty()
            && self.contexts.is_empty()
            && self.extensions.is_empty()
            && self.current_context.is_empty()
    }
}

/// Parse kubeconfig YAML into the keyed model.
///
/// Blank input is an empty document. Duplicate names within a section are
/// rejected.
pub fn parse_document(content: &str) -> Result<ConfigDocument, String> {
    if content.trim().is_empty() {
        return Ok(ConfigDocument::default());
    }
    let raw: RawKubeconfig = serde_yaml::from_str(content).map_err(|e| e.to_string())?;
    raw.into_document()
        .map_err(|(section, name)| format!("duplicate entry '{}' in {}", name, section))
}

/// Render the keyed model as kubeconfig YAML.
pub fn render_document(doc: &ConfigDocument) -> Result<String, String> {
    serde_yaml::to_string(&RawKubeconfig::from_document(doc)).map_err(|e| e.to_string())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct NamedCluster {
    pub name: String,
    pub cluster: ClusterEntry,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct NamedAuthInfo {
    pub name: String,
    pub user: AuthEntry,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct NamedContext {
    pub name: String,
    pub context: ContextEntry,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct NamedExtension {
    pub name: String,
    pub extension: Value,
}

/// On-disk kubeconfig layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RawKubeconfig {
    #[serde(rename = "apiVersion", default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_kind")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub clusters: Vec<NamedCluster>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub users: Vec<NamedAuthInfo>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contexts: Vec<NamedContext>,
    #[serde(rename = "current-context", default, deserialize_with = "null_as_default")]
    pub current_context: String,
    #[serde(default, skip_serializing_if = "is_null_or_empty")]
    pub preferences: Value,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<NamedExtension>,
}

fn default_api_version() -> String {
    "v1".to_string()
}

fn default_kind() -> String {
    "Config".to_string()
}

// `kubectl` writes `clusters: null` for an empty file.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn is_null_or_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Mapping(m) => m.is_empty(),
        _ => false,
    }
}

impl RawKubeconfig {
    /// Convert to the keyed model. Fails with the section and name of the
    /// first duplicate entry.
    pub fn into_document(self) -> Result<ConfigDocument, (&'static str, String)> {
        let mut doc = ConfigDocument {
            current_context: self.current_context,
            preferences: self.preferences,
            ..Default::default()
        };

        for named in self.clusters {
            if doc.clusters.insert(named.name.clone(), named.cluster).is_some() {
                return Err(("clusters", named.name));
            }
        }
        for named in self.users {
            if doc.auth_infos.insert(named.name.clone(), named.user).is_some() {
                return Err(("users", named.name));
            }
        }
        for named in self.contexts {
            if doc.contexts.insert(named.name.clone(), named.context).is_some() {
                return Err(("contexts", named.name));
            }
        }
        for named in self.extensions {
            if doc
                .extensions
                .insert(named.name.clone(), named.extension)
                .is_some()
            {
                return Err(("extensions", named.name));
            }
        }

        Ok(doc)
    }

    pub fn from_document(doc: &ConfigDocument) -> Self {
        Self {
            api_version: default_api_version(),
            kind: default_kind(),
            clusters: doc
                .clusters
                .iter()
                .map(|(name, cluster)| NamedCluster {
                    name: name.clone(),
                    cluster: cluster.clone(),
                })
                .collect(),
            users: doc
                .auth_infos
                .iter()
                .map(|(name, user)| NamedAuthInfo {
                    name: name.clone(),
                    user: user.clone(),
                })
                .collect(),
            contexts: doc
                .contexts
                .iter()
                .map(|(name, context)| NamedContext {
                    name: name.clone(),
                    context: context.clone(),
                })
                .collect(),
            current_context: doc.current_context.clone(),
            preferences: doc.preferences.clone(),
            extensions: doc
                .extensions
                .iter()
                .map(|(name, extension)| NamedExtension {
                    name: name.clone(),
                    extension: extension.clone(),
                })
                .collect(),
        }
    }
}
