//! Identity providers.

pub mod empty;
pub mod saml;

pub use empty::EmptyIdentityProvider;
pub use saml::SamlIdentityProvider;
