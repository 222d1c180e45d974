//! Cluster providers.

pub mod aks;
pub mod eks;

pub use aks::AksProvider;
pub use eks::EksProvider;
