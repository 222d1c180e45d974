//! In-memory backends for tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use super::aws::{AwsSession, EksApi, EksClusterInfo};
use super::azure::{AksApi, AksClusterInfo, AzureSubscription};
use super::saml::{SamlClient, SamlLoginRequest, SamlSession};
use crate::providers::errors::BackendError;

fn failure(program: &str, message: &str) -> BackendError {
    BackendError::CommandFailed {
        program: program.to_string(),
        message: message.to_string(),
    }
}

/// EKS backend serving fixed regions and clusters (keyed by region).
#[derive(Debug, Default)]
pub struct FakeEksApi {
    pub regions: Vec<String>,
    pub clusters: BTreeMap<String, Vec<EksClusterInfo>>,
    pub error: Option<String>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeEksApi {
    pub fn with_cluster(mut self, region: &str, name: &str) -> Self {
        let info = EksClusterInfo {
            name: name.to_string(),
            arn: format!("arn:aws:eks:{}:123456789012:cluster/{}", region, name),
            endpoint: Some(format!("https://{}.{}.eks.amazonaws.com", name, region)),
            certificate_authority_data: Some("Q0E=".to_string()),
        };
        self.clusters
            .entry(region.to_string())
            .or_default()
            .push(info);
        if !self.regions.iter().any(|r| r == region) {
            self.regions.push(region.to_string());
        }
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: String) -> Result<(), BackendError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        match &self.error {
            Some(message) => Err(failure("aws", message)),
            None => Ok(()),
        }
    }
}

impl EksApi for FakeEksApi {
    fn list_regions(&self, profile: Option<&str>) -> Result<Vec<String>, BackendError> {
        self.record(format!("list_regions profile={}", profile.unwrap_or("-")))?;
        Ok(self.regions.clone())
    }

    fn list_clusters(&self, session: &AwsSession) -> Result<Vec<String>, BackendError> {
        self.record(format!(
            "list_clusters region={} profile={}",
            session.region,
            session.profile.as_deref().unwrap_or("-")
        ))?;
        Ok(self
            .clusters
            .get(&session.region)
            .map(|c| c.iter().map(|i| i.name.clone()).collect())
            .unwrap_or_default())
    }

    fn describe_cluster(
        &self,
        session: &AwsSession,
        name: &str,
    ) -> Result<EksClusterInfo, BackendError> {
        self.record(format!("describe_cluster {}", name))?;
        self.clusters
            .get(&session.region)
            .and_then(|c| c.iter().find(|i| i.name == name))
            .cloned()
            .ok_or_else(|| failure("aws", "ResourceNotFoundException"))
    }
}

/// AKS backend serving fixed subscriptions, groups and clusters.
#[derive(Debug, Default)]
pub struct FakeAksApi {
    pub subscriptions: Vec<AzureSubscription>,
    pub resource_groups: Vec<String>,
    pub clusters: Vec<AksClusterInfo>,
    pub kubeconfig: String,
    pub error: Option<String>,
}

impl FakeAksApi {
    pub fn with_cluster(mut self, resource_group: &str, name: &str) -> Self {
        self.clusters.push(AksClusterInfo {
            name: name.to_string(),
            id: format!(
                "/subscriptions/sub-1/resourceGroups/{}/providers/Microsoft.ContainerService/managedClusters/{}",
                resource_group, name
            ),
            location: "westeurope".to_string(),
            resource_group: resource_group.to_string(),
            fqdn: Some(format!("{}.hcp.westeurope.azmk8s.io", name)),
        });
        if !self.resource_groups.iter().any(|g| g == resource_group) {
            self.resource_groups.push(resource_group.to_string());
        }
        self
    }

    fn check(&self) -> Result<(), BackendError> {
        match &self.error {
            Some(message) => Err(failure("az", message)),
            None => Ok(()),
        }
    }
}

impl AksApi for FakeAksApi {
    fn list_subscriptions(&self) -> Result<Vec<AzureSubscription>, BackendError> {
        self.check()?;
        Ok(self.subscriptions.clone())
    }

    fn list_resource_groups(
        &self,
        _subscription: Option<&str>,
    ) -> Result<Vec<String>, BackendError> {
        self.check()?;
        Ok(self.resource_groups.clone())
    }

    fn list_clusters(
        &self,
        _subscription: Option<&str>,
        resource_group: &str,
    ) -> Result<Vec<AksClusterInfo>, BackendError> {
        self.check()?;
        Ok(self
            .clusters
            .iter()
            .filter(|c| c.resource_group == resource_group)
            .cloned()
            .collect())
    }

    fn get_credentials(
        &self,
        _subscription: Option<&str>,
        _resource_group: &str,
        _name: &str,
        _admin: bool,
    ) -> Result<String, BackendError> {
        self.check()?;
        Ok(self.kubeconfig.clone())
    }
}

/// SAML client that records the last request instead of logging in.
#[derive(Debug, Default)]
pub struct FakeSamlClient {
    pub error: Option<String>,
    pub requests: Mutex<Vec<SamlLoginRequest>>,
}

impl FakeSamlClient {
    pub fn requests(&self) -> Vec<SamlLoginRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl SamlClient for FakeSamlClient {
    fn login(&self, request: &SamlLoginRequest) -> Result<SamlSession, BackendError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        if let Some(message) = &self.error {
            return Err(failure("saml2aws", message));
        }
        Ok(SamlSession {
            aws_profile: request.aws_profile.clone(),
        })
    }
}
