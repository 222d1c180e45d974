//! Configuration type definitions.
//!
//! # Example Configuration
//!
//! ```toml
//! [defaults]
//! idp_protocol = "saml"
//! set_current = true
//! kubeconfig = "~/.kube/work"
//!
//! [providers.eks]
//! region = "eu-west-2"
//! profile = "ops"
//!
//! [providers.saml]
//! idp-endpoint = "https://idp.example.com/saml"
//! idp-provider = "Okta"
//!
//! [providers.aks]
//! admin = true
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration loaded from TOML config files.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KconnectConfig {
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Option defaults per provider, keyed by provider name then option name.
    #[serde(default)]
    pub providers: BTreeMap<String, BTreeMap<String, toml::Value>>,
}

/// Defaults for the options every `use` invocation has.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Identity provider used when `--idp-protocol` is not given.
    #[serde(default)]
    pub idp_protocol: Option<String>,

    #[serde(default)]
    pub set_current: Option<bool>,

    #[serde(default)]
    pub kubeconfig: Option<PathBuf>,
}

impl KconnectConfig {
    /// Configured option defaults for `provider`, rendered as strings.
    ///
    /// Section names match case-insensitively. Values that are not strings,
    /// booleans or integers are skipped; validation reports them.
    pub fn provider_defaults(&self, provider: &str) -> Vec<(String, String)> {
        self.providers
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case(provider))
            .flat_map(|(_, options)| options.iter())
            .filter_map(|(key, value)| value_to_string(value).map(|v| (key.clone(), v)))
            .collect()
    }
}

pub(crate) fn value_to_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        toml::Value::Integer(i) => Some(i.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config: KconnectConfig = toml::from_str(
            r#"
[defaults]
idp_protocol = "saml"
set_current = false

[providers.eks]
region = "eu-west-2"

[providers.aks]
admin = true
"#,
        )
        .unwrap();

        assert_eq!(config.defaults.idp_protocol.as_deref(), Some("saml"));
        assert_eq!(config.defaults.set_current, Some(false));
        assert_eq!(
            config.provider_defaults("eks"),
            [("region".to_string(), "eu-west-2".to_string())]
        );
        assert_eq!(
            config.provider_defaults("AKS"),
            [("admin".to_string(), "true".to_string())]
        );
        assert!(config.provider_defaults("saml").is_empty());
    }

    #[test]
    fn test_empty_config() {
        let config: KconnectConfig = toml::from_str("").unwrap();
        assert_eq!(config, KconnectConfig::default());
    }

    #[test]
    fn test_unsupported_values_are_skipped() {
        let config: KconnectConfig =
            toml::from_str("[providers.eks]\nregion = [\"a\", \"b\"]\n").unwrap();
        assert!(config.provider_defaults("eks").is_empty());
    }
}
