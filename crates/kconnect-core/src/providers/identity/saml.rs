//! SAML identity provider.
//!
//! Logs in through an identity provider endpoint and writes temporary AWS
//! credentials to a named profile, which the EKS provider then uses.

use std::sync::Arc;

use tracing::info;

use crate::flags::{FlagSet, FlagSpec};
use crate::prompt::Prompter;
use crate::providers::backends::{Saml2AwsCli, SamlClient, SamlLoginRequest};
use crate::providers::errors::AuthenticationError;
use crate::providers::traits::IdentityProvider;
use crate::providers::types::{ATTR_AWS_PROFILE, Identity};

pub const FLAG_IDP_ENDPOINT: &str = "idp-endpoint";
pub const FLAG_IDP_PROVIDER: &str = "idp-provider";
pub const FLAG_USERNAME: &str = "username";
pub const FLAG_PASSWORD: &str = "password";
pub const FLAG_ROLE_ARN: &str = "role-arn";
pub const FLAG_AWS_PROFILE: &str = "aws-profile";

const DEFAULT_AWS_PROFILE: &str = "kconnect";

pub struct SamlIdentityProvider {
    client: Arc<dyn SamlClient>,
}

impl SamlIdentityProvider {
    pub fn new(client: Arc<dyn SamlClient>) -> Self {
        Self { client }
    }

    fn required(&self, flags: &FlagSet, flag: &str) -> Result<String, AuthenticationError> {
        flags
            .get(flag)
            .map(str::to_string)
            .ok_or_else(|| AuthenticationError::MissingValue {
                provider: self.name().to_string(),
                flag: flag.to_string(),
            })
    }
}

impl Default for SamlIdentityProvider {
    fn default() -> Self {
        Self::new(Arc::new(Saml2AwsCli))
    }
}

impl IdentityProvider for SamlIdentityProvider {
    fn name(&self) -> &'static str {
        "saml"
    }

    fn usage(&self) -> &'static str {
        "Log in through a SAML identity provider and use the resulting AWS credentials"
    }

    fn flags(&self) -> Vec<FlagSpec> {
        vec![
            FlagSpec::string(FLAG_IDP_ENDPOINT, "URL of the identity provider login page")
                .required(),
            FlagSpec::string(FLAG_IDP_PROVIDER, "Identity provider type (e.g. Okta, ADFS)")
                .required(),
            FlagSpec::string(FLAG_USERNAME, "User to log in as").short('u'),
            FlagSpec::string(FLAG_PASSWORD, "Password for the user"),
            FlagSpec::string(FLAG_ROLE_ARN, "ARN of the AWS role to assume"),
            FlagSpec::string(FLAG_AWS_PROFILE, "AWS profile to write credentials to")
                .default_value(DEFAULT_AWS_PROFILE),
        ]
    }

    fn authenticate(
        &self,
        flags: &FlagSet,
        prompter: &mut dyn Prompter,
    ) -> Result<Identity, AuthenticationError> {
        let idp_endpoint = self.required(flags, FLAG_IDP_ENDPOINT)?;
        let idp_provider = self.required(flags, FLAG_IDP_PROVIDER)?;

        let username = match flags.get(FLAG_USERNAME) {
            Some(username) => username.to_string(),
            None => prompter.input("Username")?,
        };
        let password = match flags.get(FLAG_PASSWORD) {
            Some(password) => password.to_string(),
            None => prompter.password("Password")?,
        };

        let request = SamlLoginRequest {
            idp_endpoint,
            idp_provider,
            username,
            password,
            aws_profile: flags
                .get(FLAG_AWS_PROFILE)
                .unwrap_or(DEFAULT_AWS_PROFILE)
                .to_string(),
            role_arn: flags.get(FLAG_ROLE_ARN).map(str::to_string),
        };

        let session = self.client.login(&request)?;
        info!(
            event = "core.saml.login_completed",
            username = %request.username,
            aws_profile = %session.aws_profile
        );

        Ok(Identity::for_principal(self.name(), &request.username)
            .with_attribute(ATTR_AWS_PROFILE, &session.aws_profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::test_helpers::ScriptedPrompter;
    use crate::providers::backends::test_helpers::FakeSamlClient;

    fn flags() -> FlagSet {
        let mut flags = FlagSet::from_specs(SamlIdentityProvider::default().flags()).unwrap();
        flags
            .set_explicit(FLAG_IDP_ENDPOINT, "https://idp.example.com/saml")
            .unwrap();
        flags.set_explicit(FLAG_IDP_PROVIDER, "Okta").unwrap();
        flags
    }

    #[test]
    fn test_prompts_for_missing_credentials() {
        let client = Arc::new(FakeSamlClient::default());
        let provider = SamlIdentityProvider::new(client.clone());
        let mut prompter = ScriptedPrompter::new(&["jane", "hunter2"]);

        let identity = provider.authenticate(&flags(), &mut prompter).unwrap();

        assert_eq!(prompter.asked, ["Username", "Password"]);
        assert_eq!(identity.principal(), Some("jane"));
        assert_eq!(identity.attribute(ATTR_AWS_PROFILE), Some("kconnect"));

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].password, "hunter2");
        assert_eq!(requests[0].idp_provider, "Okta");
        assert_eq!(requests[0].role_arn, None);
    }

    #[test]
    fn test_flags_supply_credentials() {
        let client = Arc::new(FakeSamlClient::default());
        let mut flags = flags();
        flags.set_explicit(FLAG_USERNAME, "jane").unwrap();
        flags.set_explicit(FLAG_PASSWORD, "hunter2").unwrap();
        flags.set_explicit(FLAG_AWS_PROFILE, "work").unwrap();
        flags
            .set_explicit(FLAG_ROLE_ARN, "arn:aws:iam::123456789012:role/dev")
            .unwrap();
        let mut prompter = ScriptedPrompter::default();

        let identity = SamlIdentityProvider::new(client.clone())
            .authenticate(&flags, &mut prompter)
            .unwrap();

        assert!(prompter.asked.is_empty());
        assert_eq!(identity.attribute(ATTR_AWS_PROFILE), Some("work"));
        assert_eq!(
            client.requests()[0].role_arn.as_deref(),
            Some("arn:aws:iam::123456789012:role/dev")
        );
    }

    #[test]
    fn test_missing_endpoint() {
        let flags = FlagSet::from_specs(SamlIdentityProvider::default().flags()).unwrap();
        let err = SamlIdentityProvider::new(Arc::new(FakeSamlClient::default()))
            .authenticate(&flags, &mut ScriptedPrompter::default())
            .unwrap_err();
        assert!(matches!(
            err,
            AuthenticationError::MissingValue { ref flag, .. } if flag == FLAG_IDP_ENDPOINT
        ));
    }

    #[test]
    fn test_login_failure() {
        let client = FakeSamlClient {
            error: Some("invalid credentials".to_string()),
            ..Default::default()
        };
        let mut prompter = ScriptedPrompter::new(&["jane", "wrong"]);
        let err = SamlIdentityProvider::new(Arc::new(client))
            .authenticate(&flags(), &mut prompter)
            .unwrap_err();
        assert!(matches!(err, AuthenticationError::Backend(_)));
    }
}
