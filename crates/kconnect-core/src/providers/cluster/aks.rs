//! Azure AKS cluster provider.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::flags::{FlagSet, FlagSpec};
use crate::kubeconfig::{ConfigDocument, parse_document};
use crate::providers::backends::{AksApi, AzureCli};
use crate::providers::errors::DiscoveryError;
use crate::providers::resolvers::AzureFlagsResolver;
use crate::providers::traits::{ClusterProvider, FlagsResolver};
use crate::providers::types::{ClusterDescriptor, Identity};

pub const FLAG_SUBSCRIPTION_ID: &str = "subscription-id";
pub const FLAG_RESOURCE_GROUP: &str = "resource-group";
pub const FLAG_ADMIN: &str = "admin";

pub struct AksProvider {
    api: Arc<dyn AksApi>,
}

impl AksProvider {
    pub fn new(api: Arc<dyn AksApi>) -> Self {
        Self { api }
    }

    fn resource_group(flags: &FlagSet) -> Result<&str, DiscoveryError> {
        flags
            .get(FLAG_RESOURCE_GROUP)
            .ok_or_else(|| DiscoveryError::MissingOption {
                flag: FLAG_RESOURCE_GROUP.to_string(),
            })
    }
}

impl Default for AksProvider {
    fn default() -> Self {
        Self::new(Arc::new(AzureCli))
    }
}

impl ClusterProvider for AksProvider {
    fn name(&self) -> &'static str {
        "aks"
    }

    fn usage(&self) -> &'static str {
        "Discover and connect to Azure AKS clusters"
    }

    fn flags(&self) -> Vec<FlagSpec> {
        vec![
            FlagSpec::string(FLAG_SUBSCRIPTION_ID, "Azure subscription to search"),
            FlagSpec::string(FLAG_RESOURCE_GROUP, "Resource group holding the clusters")
                .required(),
            FlagSpec::bool(FLAG_ADMIN, "Use cluster admin credentials", false),
        ]
    }

    fn supported_identity_providers(&self) -> &'static [&'static str] {
        &["empty"]
    }

    fn flags_resolver(&self) -> Box<dyn FlagsResolver> {
        Box::new(AzureFlagsResolver::new(Arc::clone(&self.api)))
    }

    fn discover(
        &self,
        _identity: &Identity,
        flags: &FlagSet,
    ) -> Result<Vec<ClusterDescriptor>, DiscoveryError> {
        let subscription = flags.get(FLAG_SUBSCRIPTION_ID);
        let resource_group = Self::resource_group(flags)?;
        debug!(
            event = "core.aks.discover_started",
            subscription = ?subscription,
            resource_group = resource_group
        );

        let mut clusters: Vec<ClusterDescriptor> = self
            .api
            .list_clusters(subscription, resource_group)?
            .into_iter()
            .map(|info| {
                let mut cluster = ClusterDescriptor::new(&info.name, &info.id, &info.location);
                cluster.endpoint = info.fqdn.map(|fqdn| format!("https://{}", fqdn));
                cluster.resource_group = Some(info.resource_group);
                cluster
            })
            .collect();
        clusters.sort_by(|a, b| a.name.cmp(&b.name));

        info!(
            event = "core.aks.discover_completed",
            resource_group = resource_group,
            count = clusters.len()
        );
        Ok(clusters)
    }

    fn cluster_config(
        &self,
        _identity: &Identity,
        cluster: &ClusterDescriptor,
        flags: &FlagSet,
    ) -> Result<ConfigDocument, DiscoveryError> {
        let resource_group = match cluster.resource_group.as_deref() {
            Some(group) => group,
            None => Self::resource_group(flags)?,
        };
        let admin = flags.get_bool(FLAG_ADMIN)?;

        let yaml = self.api.get_credentials(
            flags.get(FLAG_SUBSCRIPTION_ID),
            resource_group,
            &cluster.name,
            admin,
        )?;

        let invalid = |message: String| DiscoveryError::InvalidCredentials {
            name: cluster.name.clone(),
            message,
        };
        let mut doc = parse_document(&yaml).map_err(invalid)?;
        if doc.contexts.len() != 1 {
            return Err(invalid(format!(
                "expected one context, found {}",
                doc.contexts.len()
            )));
        }
        if !doc.current_context.is_empty() {
            warn!(
                event = "core.aks.current_context_ignored",
                cluster = %cluster.name,
                context = %doc.current_context
            );
            doc.current_context.clear();
        }
        Ok(doc)
    }
}
