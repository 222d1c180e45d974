//! Vendor backends behind the providers.
//!
//! Each backend is a trait so providers can be exercised without the vendor
//! CLIs installed; the default implementations shell out to `aws`, `az` and
//! `saml2aws`.

pub mod aws;
pub mod azure;
pub mod cli;
pub mod saml;

pub use aws::{AwsCli, AwsSession, EksApi, EksClusterInfo};
pub use azure::{AksApi, AksClusterInfo, AzureCli, AzureSubscription};
pub use cli::CliCommand;
pub use saml::{Saml2AwsCli, SamlClient, SamlLoginRequest, SamlSession};

/// Test utilities for code that talks to vendor backends.
#[doc(hidden)]
pub mod test_helpers;
