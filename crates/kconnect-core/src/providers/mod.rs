//! Cluster and identity providers.
//!
//! A [`ClusterProvider`] discovers clusters on one cloud backend and turns a
//! discovered cluster into kubeconfig entries. An [`IdentityProvider`]
//! authenticates the user first. Both are looked up by name in a
//! [`ProviderRegistry`]; the `use` pipeline drives them.

pub mod backends;
pub mod cluster;
pub mod errors;
pub mod identity;
pub mod registry;
pub mod resolvers;
pub mod traits;
pub mod types;

pub use errors::{
    AuthenticationError, BackendError, DiscoveryError, ProviderError, ResolutionError,
};
pub use registry::ProviderRegistry;
pub use traits::{ClusterProvider, FlagsResolver, IdentityProvider};
pub use types::{ATTR_AWS_PROFILE, ClusterDescriptor, Identity, ProviderDescriptor, ProviderKind};
