//! Provider data types.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::flags::FlagSpec;

/// Attribute holding the AWS profile credentials were written to.
pub const ATTR_AWS_PROFILE: &str = "aws-profile";

/// Result of authenticating with an identity provider.
///
/// Opaque to the pipeline: only providers and resolvers look inside. It lives
/// for one invocation and is never written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    provider: String,
    principal: Option<String>,
    attributes: BTreeMap<String, String>,
}

impl Identity {
    /// Identity that carries no credentials of its own; backends fall back to
    /// whatever the vendor CLI is already logged in as.
    pub fn anonymous(provider: &str) -> Self {
        Self {
            provider: provider.to_string(),
            principal: None,
            attributes: BTreeMap::new(),
        }
    }

    pub fn for_principal(provider: &str, principal: &str) -> Self {
        Self {
            principal: Some(principal.to_string()),
            ..Self::anonymous(provider)
        }
    }

    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }

    /// Name of the identity provider that produced this identity.
    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn principal(&self) -> Option<&str> {
        self.principal.as_deref()
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

/// A cluster found by [`ClusterProvider::discover`](super::ClusterProvider::discover).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ClusterDescriptor {
    pub name: String,
    pub id: String,
    pub region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_authority_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<String>,
}

impl ClusterDescriptor {
    pub fn new(name: &str, id: &str, region: &str) -> Self {
        Self {
            name: name.to_string(),
            id: id.to_string(),
            region: region.to_string(),
            ..Default::default()
        }
    }

    /// Label shown when the user has to choose between clusters.
    pub fn label(&self) -> String {
        match &self.resource_group {
            Some(group) => format!("{} ({}, {})", self.name, group, self.region),
            None => format!("{} ({})", self.name, self.region),
        }
    }
}

/// Which registry namespace a provider lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Cluster,
    Identity,
}

/// Description of a registered provider, for listings and help output.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderDescriptor {
    pub name: String,
    pub kind: ProviderKind,
    pub usage: String,
    pub flags: Vec<FlagSpec>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub identity_providers: Vec<String>,
}
