//! SAML login backend used by the SAML identity provider.

use super::cli::CliCommand;
use crate::providers::errors::BackendError;

/// Inputs for one SAML login.
#[derive(Clone, PartialEq, Eq)]
pub struct SamlLoginRequest {
    pub idp_endpoint: String,
    pub idp_provider: String,
    pub username: String,
    pub password: String,
    pub aws_profile: String,
    pub role_arn: Option<String>,
}

impl std::fmt::Debug for SamlLoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SamlLoginRequest")
            .field("idp_endpoint", &self.idp_endpoint)
            .field("idp_provider", &self.idp_provider)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("aws_profile", &self.aws_profile)
            .field("role_arn", &self.role_arn)
            .finish()
    }
}

/// Outcome of a successful SAML login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamlSession {
    /// Profile the temporary AWS credentials were written to.
    pub aws_profile: String,
}

pub trait SamlClient: Send + Sync {
    fn login(&self, request: &SamlLoginRequest) -> Result<SamlSession, BackendError>;
}

/// [`SamlClient`] backed by the `saml2aws` CLI.
///
/// Credentials go through environment variables so the password never shows
/// up in the process list.
#[derive(Debug, Default, Clone, Copy)]
pub struct Saml2AwsCli;

impl Saml2AwsCli {
    fn command(request: &SamlLoginRequest) -> CliCommand {
        CliCommand::new("saml2aws")
            .args(["login", "--skip-prompt", "--force"])
            .arg("--url")
            .arg(&request.idp_endpoint)
            .arg("--idp-provider")
            .arg(&request.idp_provider)
            .arg("--profile")
            .arg(&request.aws_profile)
            .opt_arg("--role", request.role_arn.as_deref())
            .env("SAML2AWS_USERNAME", &request.username)
            .env("SAML2AWS_PASSWORD", &request.password)
    }
}

impl SamlClient for Saml2AwsCli {
    fn login(&self, request: &SamlLoginRequest) -> Result<SamlSession, BackendError> {
        Self::command(request).run()?;
        Ok(SamlSession {
            aws_profile: request.aws_profile.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SamlLoginRequest {
        SamlLoginRequest {
            idp_endpoint: "https://idp.example.com/saml".to_string(),
            idp_provider: "KeyCloak".to_string(),
            username: "jane".to_string(),
            password: "hunter2".to_string(),
            aws_profile: "kconnect".to_string(),
            role_arn: None,
        }
    }

    #[test]
    fn test_password_not_in_args() {
        let cmd = Saml2AwsCli::command(&request());
        assert!(!cmd.args.iter().any(|a| a.contains("hunter2")));
        assert!(
            cmd.envs
                .contains(&("SAML2AWS_PASSWORD".to_string(), "hunter2".to_string()))
        );
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", request());
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
