//! Provider registry.
//!
//! Built once at startup and passed to whoever needs it. Cluster and
//! identity providers live in separate namespaces; names are matched
//! case-insensitively.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use super::cluster::{AksProvider, EksProvider};
use super::errors::ProviderError;
use super::identity::{EmptyIdentityProvider, SamlIdentityProvider};
use super::traits::{ClusterProvider, IdentityProvider};
use super::types::{ProviderDescriptor, ProviderKind};

#[derive(Default, Clone)]
pub struct ProviderRegistry {
    cluster: BTreeMap<String, Arc<dyn ClusterProvider>>,
    identity: BTreeMap<String, Arc<dyn IdentityProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every provider shipped with kconnect, backed by the
    /// vendor CLIs.
    pub fn builtin() -> Result<Self, ProviderError> {
        let mut registry = Self::new();
        registry.register_cluster_provider(Arc::new(EksProvider::default()))?;
        registry.register_cluster_provider(Arc::new(AksProvider::default()))?;
        registry.register_identity_provider(Arc::new(EmptyIdentityProvider))?;
        registry.register_identity_provider(Arc::new(SamlIdentityProvider::default()))?;
        Ok(registry)
    }

    pub fn register_cluster_provider(
        &mut self,
        provider: Arc<dyn ClusterProvider>,
    ) -> Result<(), ProviderError> {
        let key = provider.name().to_lowercase();
        if self.cluster.contains_key(&key) {
            return Err(ProviderError::DuplicateProvider { name: key });
        }
        debug!(event = "core.registry.cluster_provider_registered", name = %key);
        self.cluster.insert(key, provider);
        Ok(())
    }

    pub fn register_identity_provider(
        &mut self,
        provider: Arc<dyn IdentityProvider>,
    ) -> Result<(), ProviderError> {
        let key = provider.name().to_lowercase();
        if self.identity.contains_key(&key) {
            return Err(ProviderError::DuplicateProvider { name: key });
        }
        debug!(event = "core.registry.identity_provider_registered", name = %key);
        self.identity.insert(key, provider);
        Ok(())
    }

    pub fn create_cluster_provider(
        &self,
        name: &str,
    ) -> Result<Arc<dyn ClusterProvider>, ProviderError> {
        self.cluster
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| ProviderError::UnknownClusterProvider {
                name: name.to_string(),
                available: self.list_cluster_providers().join(", "),
            })
    }

    pub fn create_identity_provider(
        &self,
        name: &str,
    ) -> Result<Arc<dyn IdentityProvider>, ProviderError> {
        self.identity
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| ProviderError::UnknownIdentityProvider {
                name: name.to_string(),
                available: self.list_identity_providers().join(", "),
            })
    }

    /// Cluster provider names, sorted.
    pub fn list_cluster_providers(&self) -> Vec<String> {
        self.cluster.keys().cloned().collect()
    }

    /// Identity provider names, sorted.
    pub fn list_identity_providers(&self) -> Vec<String> {
        self.identity.keys().cloned().collect()
    }

    /// Descriptions of every provider, cluster providers first.
    pub fn descriptors(&self) -> Vec<ProviderDescriptor> {
        let cluster = self.cluster.values().map(|p| ProviderDescriptor {
            name: p.name().to_string(),
            kind: ProviderKind::Cluster,
            usage: p.usage().to_string(),
            flags: p.flags(),
            identity_providers: p
                .supported_identity_providers()
                .iter()
                .map(|s| s.to_string())
                .collect(),
        });
        let identity = self.identity.values().map(|p| ProviderDescriptor {
            name: p.name().to_string(),
            kind: ProviderKind::Identity,
            usage: p.usage().to_string(),
            flags: p.flags(),
            identity_providers: Vec::new(),
        });
        cluster.chain(identity).collect()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("cluster", &self.list_cluster_providers())
            .field("identity", &self.list_identity_providers())
            .finish()
    }
}
