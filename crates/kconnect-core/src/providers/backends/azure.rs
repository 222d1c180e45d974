//! Azure backend used by the AKS provider and the Azure resolver.

use serde::Deserialize;

use super::cli::{CliCommand, parse_json};
use crate::providers::errors::BackendError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AzureSubscription {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AksClusterInfo {
    pub name: String,
    pub id: String,
    pub location: String,
    #[serde(rename = "resourceGroup")]
    pub resource_group: String,
    #[serde(default)]
    pub fqdn: Option<String>,
}

pub trait AksApi: Send + Sync {
    fn list_subscriptions(&self) -> Result<Vec<AzureSubscription>, BackendError>;

    fn list_resource_groups(&self, subscription: Option<&str>)
    -> Result<Vec<String>, BackendError>;

    fn list_clusters(
        &self,
        subscription: Option<&str>,
        resource_group: &str,
    ) -> Result<Vec<AksClusterInfo>, BackendError>;

    /// Kubeconfig YAML for one cluster.
    fn get_credentials(
        &self,
        subscription: Option<&str>,
        resource_group: &str,
        name: &str,
        admin: bool,
    ) -> Result<String, BackendError>;
}

/// [`AksApi`] backed by the `az` CLI.
#[derive(Debug, Default, Clone, Copy)]
pub struct AzureCli;

impl AzureCli {
    fn command(args: &[&str], subscription: Option<&str>) -> CliCommand {
        CliCommand::new("az")
            .env("AZURE_CORE_NO_COLOR", "true")
            .args(args.iter().copied())
            .opt_arg("--subscription", subscription)
    }
}

#[derive(Deserialize)]
struct ResourceGroup {
    name: String,
}

impl AksApi for AzureCli {
    fn list_subscriptions(&self) -> Result<Vec<AzureSubscription>, BackendError> {
        Self::command(&["account", "list", "--output", "json"], None).run_json()
    }

    fn list_resource_groups(
        &self,
        subscription: Option<&str>,
    ) -> Result<Vec<String>, BackendError> {
        let groups: Vec<ResourceGroup> =
            Self::command(&["group", "list", "--output", "json"], subscription).run_json()?;
        Ok(groups.into_iter().map(|g| g.name).collect())
    }

    fn list_clusters(
        &self,
        subscription: Option<&str>,
        resource_group: &str,
    ) -> Result<Vec<AksClusterInfo>, BackendError> {
        let stdout = Self::command(
            &["aks", "list", "--output", "json", "--resource-group", resource_group],
            subscription,
        )
        .run()?;
        parse_json("az", &stdout)
    }

    fn get_credentials(
        &self,
        subscription: Option<&str>,
        resource_group: &str,
        name: &str,
        admin: bool,
    ) -> Result<String, BackendError> {
        let mut cmd = Self::command(
            &[
                "aks",
                "get-credentials",
                "--resource-group",
                resource_group,
                "--name",
                name,
                "--file",
                "-",
            ],
            subscription,
        );
        if admin {
            cmd = cmd.arg("--admin");
        }
        cmd.run()
    }
}
