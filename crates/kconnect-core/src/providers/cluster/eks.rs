//! AWS EKS cluster provider.

use std::sync::Arc;

use tracing::{debug, info};

use crate::flags::{FlagSet, FlagSpec};
use crate::kubeconfig::{
    AuthEntry, ClusterEntry, ConfigDocument, ContextEntry, ExecConfig, ExecEnvVar,
};
use crate::providers::backends::{AwsCli, AwsSession, EksApi};
use crate::providers::errors::DiscoveryError;
use crate::providers::resolvers::AwsFlagsResolver;
use crate::providers::traits::{ClusterProvider, FlagsResolver};
use crate::providers::types::{ATTR_AWS_PROFILE, ClusterDescriptor, Identity};

pub const FLAG_REGION: &str = "region";
pub const FLAG_PROFILE: &str = "profile";
pub const FLAG_REGION_FILTER: &str = "region-filter";

const EXEC_API_VERSION: &str = "client.authentication.k8s.io/v1beta1";

/// AWS profile to call the backend with: the `--profile` option wins over
/// the profile the identity provider wrote credentials to.
pub(crate) fn aws_profile(identity: &Identity, flags: &FlagSet) -> Option<String> {
    flags
        .get(FLAG_PROFILE)
        .or_else(|| identity.attribute(ATTR_AWS_PROFILE))
        .map(str::to_string)
}

pub struct EksProvider {
    api: Arc<dyn EksApi>,
}

impl EksProvider {
    pub fn new(api: Arc<dyn EksApi>) -> Self {
        Self { api }
    }

    fn session(identity: &Identity, flags: &FlagSet) -> Result<AwsSession, DiscoveryError> {
        let region = flags
            .get(FLAG_REGION)
            .ok_or_else(|| DiscoveryError::MissingOption {
                flag: FLAG_REGION.to_string(),
            })?;
        Ok(AwsSession {
            region: region.to_string(),
            profile: aws_profile(identity, flags),
        })
    }
}

impl Default for EksProvider {
    fn default() -> Self {
        Self::new(Arc::new(AwsCli))
    }
}

impl ClusterProvider for EksProvider {
    fn name(&self) -> &'static str {
        "eks"
    }

    fn usage(&self) -> &'static str {
        "Discover and connect to AWS EKS clusters"
    }

    fn flags(&self) -> Vec<FlagSpec> {
        vec![
            FlagSpec::string(FLAG_REGION, "AWS region to search for clusters").required(),
            FlagSpec::string(FLAG_PROFILE, "AWS profile to use for API calls"),
            FlagSpec::string(
                FLAG_REGION_FILTER,
                "Regular expression limiting the regions offered for selection",
            ),
        ]
    }

    fn supported_identity_providers(&self) -> &'static [&'static str] {
        &["empty", "saml"]
    }

    fn flags_resolver(&self) -> Box<dyn FlagsResolver> {
        Box::new(AwsFlagsResolver::new(Arc::clone(&self.api)))
    }

    fn discover(
        &self,
        identity: &Identity,
        flags: &FlagSet,
    ) -> Result<Vec<ClusterDescriptor>, DiscoveryError> {
        let session = Self::session(identity, flags)?;
        debug!(
            event = "core.eks.discover_started",
            region = %session.region,
            profile = ?session.profile
        );

        let mut clusters = Vec::new();
        for name in self.api.list_clusters(&session)? {
            let info = self.api.describe_cluster(&session, &name)?;
            let mut cluster = ClusterDescriptor::new(&info.name, &info.arn, &session.region);
            cluster.endpoint = info.endpoint;
            cluster.certificate_authority_data = info.certificate_authority_data;
            clusters.push(cluster);
        }
        clusters.sort_by(|a, b| a.name.cmp(&b.name));

        info!(
            event = "core.eks.discover_completed",
            region = %session.region,
            count = clusters.len()
        );
        Ok(clusters)
    }

    fn cluster_config(
        &self,
        identity: &Identity,
        cluster: &ClusterDescriptor,
        flags: &FlagSet,
    ) -> Result<ConfigDocument, DiscoveryError> {
        let endpoint = cluster
            .endpoint
            .as_deref()
            .ok_or_else(|| DiscoveryError::IncompleteCluster {
                name: cluster.name.clone(),
                field: "endpoint".to_string(),
            })?;

        let mut entry = ClusterEntry::new(endpoint);
        entry.certificate_authority_data = cluster.certificate_authority_data.clone();

        let env = aws_profile(identity, flags)
            .map(|profile| {
                vec![ExecEnvVar {
                    name: "AWS_PROFILE".to_string(),
                    value: profile,
                }]
            })
            .unwrap_or_default();

        let auth = AuthEntry {
            exec: Some(ExecConfig {
                api_version: EXEC_API_VERSION.to_string(),
                command: "aws".to_string(),
                args: vec![
                    "--region".to_string(),
                    cluster.region.clone(),
                    "eks".to_string(),
                    "get-token".to_string(),
                    "--cluster-name".to_string(),
                    cluster.name.clone(),
                    "--output".to_string(),
                    "json".to_string(),
                ],
                env,
                extra: Default::default(),
            }),
            ..Default::default()
        };

        // Cluster, user and context all share the ARN so entries from
        // different accounts never collide.
        let key = cluster.id.clone();
        let mut doc = ConfigDocument::default();
        doc.clusters.insert(key.clone(), entry);
        doc.auth_infos.insert(key.clone(), auth);
        doc.contexts.insert(key.clone(), ContextEntry::new(&key, &key));
        Ok(doc)
    }
}
