//! # Configuration System
//!
//! Hierarchical TOML configuration for kconnect. Config values only ever act
//! as defaults: anything given on the command line or through a `KCONNECT_*`
//! variable wins, and resolvers still treat configured values as set.
//!
//! ```toml
//! # ~/.kconnect/config.toml
//! [defaults]
//! idp_protocol = "saml"
//!
//! [providers.eks]
//! region = "eu-west-2"
//! ```
//!
//! ```rust,no_run
//! use kconnect_core::config::KconnectConfig;
//! use kconnect_core::providers::ProviderRegistry;
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = ProviderRegistry::builtin()?;
//!     let config = KconnectConfig::load_hierarchy()?;
//!     config.validate(&registry)?;
//!     Ok(())
//! }
//! ```

pub mod loading;
pub mod types;
pub mod validation;

pub use loading::{CONFIG_ENV, load_config_file, merge_configs};
pub use types::{DefaultsConfig, KconnectConfig};
pub use validation::validate_config;

impl KconnectConfig {
    /// See [`loading::load_hierarchy`].
    pub fn load_hierarchy() -> Result<Self, crate::errors::ConfigError> {
        loading::load_hierarchy()
    }

    /// See [`validation::validate_config`].
    pub fn validate(
        &self,
        registry: &crate::providers::ProviderRegistry,
    ) -> Result<(), crate::errors::ConfigError> {
        validation::validate_config(self, registry)
    }
}
