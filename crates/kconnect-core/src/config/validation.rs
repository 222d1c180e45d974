//! Configuration validation.

use crate::config::types::{KconnectConfig, value_to_string};
use crate::errors::ConfigError;
use crate::providers::ProviderRegistry;

/// Check that every provider section names a registered provider and only
/// sets options that provider declares.
pub fn validate_config(
    config: &KconnectConfig,
    registry: &ProviderRegistry,
) -> Result<(), ConfigError> {
    let descriptors = registry.descriptors();

    for (section, options) in &config.providers {
        let descriptor = descriptors
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(section))
            .ok_or_else(|| ConfigError::UnknownProviderSection {
                provider: section.clone(),
            })?;

        for (key, value) in options {
            if !descriptor.flags.iter().any(|f| &f.name == key) {
                return Err(ConfigError::InvalidConfiguration {
                    message: format!(
                        "provider '{}' has no option '{}'",
                        descriptor.name, key
                    ),
                });
            }
            if value_to_string(value).is_none() {
                return Err(ConfigError::InvalidConfiguration {
                    message: format!(
                        "[providers.{}] {} must be a string, boolean or integer",
                        section, key
                    ),
                });
            }
        }
    }

    if let Some(idp) = &config.defaults.idp_protocol
        && !registry
            .list_identity_providers()
            .iter()
            .any(|name| name.eq_ignore_ascii_case(idp))
    {
        return Err(ConfigError::InvalidConfiguration {
            message: format!("defaults.idp_protocol '{}' is not a known identity provider", idp),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> KconnectConfig {
        toml::from_str(content).unwrap()
    }

    fn registry() -> ProviderRegistry {
        ProviderRegistry::builtin().unwrap()
    }

    #[test]
    fn test_valid_config() {
        let config = parse(
            r#"
[defaults]
idp_protocol = "saml"

[providers.eks]
region = "eu-west-2"

[providers.saml]
idp-provider = "Okta"
"#,
        );
        assert!(validate_config(&config, &registry()).is_ok());
    }

    #[test]
    fn test_unknown_provider_section() {
        let config = parse("[providers.gke]\nproject = \"x\"\n");
        let err = validate_config(&config, &registry()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnknownProviderSection { ref provider } if provider == "gke"
        ));
    }

    #[test]
    fn test_unknown_option() {
        let config = parse("[providers.eks]\nsubscription-id = \"x\"\n");
        let err = validate_config(&config, &registry()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration: provider 'eks' has no option 'subscription-id'"
        );
    }

    #[test]
    fn test_unknown_default_identity_provider() {
        let config = parse("[defaults]\nidp_protocol = \"oidc\"\n");
        assert!(validate_config(&config, &registry()).is_err());
    }
}
