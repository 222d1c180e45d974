//! AWS backend used by the EKS provider and the AWS resolver.

use serde::Deserialize;

use super::cli::{CliCommand, parse_json};
use crate::providers::errors::BackendError;

/// Where AWS calls are made from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AwsSession {
    pub region: String,
    pub profile: Option<String>,
}

/// Subset of `eks describe-cluster` the provider needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EksClusterInfo {
    pub name: String,
    pub arn: String,
    pub endpoint: Option<String>,
    pub certificate_authority_data: Option<String>,
}

pub trait EksApi: Send + Sync {
    /// Regions enabled for the account behind `profile`.
    fn list_regions(&self, profile: Option<&str>) -> Result<Vec<String>, BackendError>;

    fn list_clusters(&self, session: &AwsSession) -> Result<Vec<String>, BackendError>;

    fn describe_cluster(
        &self,
        session: &AwsSession,
        name: &str,
    ) -> Result<EksClusterInfo, BackendError>;
}

/// [`EksApi`] backed by the `aws` CLI.
#[derive(Debug, Default, Clone, Copy)]
pub struct AwsCli;

impl AwsCli {
    fn command(session: Option<&AwsSession>) -> CliCommand {
        let cmd = CliCommand::new("aws")
            .env("AWS_PAGER", "")
            .args(["--output", "json"]);
        match session {
            Some(session) => cmd
                .arg("--region")
                .arg(&session.region)
                .opt_arg("--profile", session.profile.as_deref()),
            None => cmd,
        }
    }
}

#[derive(Deserialize)]
struct RegionsOutput {
    #[serde(rename = "Regions", default)]
    regions: Vec<RegionItem>,
}

#[derive(Deserialize)]
struct RegionItem {
    #[serde(rename = "RegionName")]
    region_name: String,
}

#[derive(Deserialize)]
struct ListClustersOutput {
    #[serde(default)]
    clusters: Vec<String>,
}

#[derive(Deserialize)]
struct DescribeClusterOutput {
    cluster: DescribedCluster,
}

#[derive(Deserialize)]
struct DescribedCluster {
    name: String,
    arn: String,
    endpoint: Option<String>,
    #[serde(rename = "certificateAuthority")]
    certificate_authority: Option<CertificateAuthority>,
}

#[derive(Deserialize)]
struct CertificateAuthority {
    data: Option<String>,
}

impl EksApi for AwsCli {
    fn list_regions(&self, profile: Option<&str>) -> Result<Vec<String>, BackendError> {
        let out: RegionsOutput = Self::command(None)
            .opt_arg("--profile", profile)
            .args(["ec2", "describe-regions"])
            .run_json()?;
        Ok(out.regions.into_iter().map(|r| r.region_name).collect())
    }

    fn list_clusters(&self, session: &AwsSession) -> Result<Vec<String>, BackendError> {
        let out: ListClustersOutput = Self::command(Some(session))
            .args(["eks", "list-clusters"])
            .run_json()?;
        Ok(out.clusters)
    }

    fn describe_cluster(
        &self,
        session: &AwsSession,
        name: &str,
    ) -> Result<EksClusterInfo, BackendError> {
        let stdout = Self::command(Some(session))
            .args(["eks", "describe-cluster", "--name", name])
            .run()?;
        parse_describe_cluster(&stdout)
    }
}

fn parse_describe_cluster(stdout: &str) -> Result<EksClusterInfo, BackendError> {
    let out: DescribeClusterOutput = parse_json("aws", stdout)?;
    Ok(EksClusterInfo {
        name: out.cluster.name,
        arn: out.cluster.arn,
        endpoint: out.cluster.endpoint,
        certificate_authority_data: out.cluster.certificate_authority.and_then(|ca| ca.data),
    })
}
