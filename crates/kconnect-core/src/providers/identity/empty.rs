use crate::flags::{FlagSet, FlagSpec};
use crate::prompt::Prompter;
use crate::providers::errors::AuthenticationError;
use crate::providers::traits::IdentityProvider;
use crate::providers::types::Identity;

/// Uses whatever credentials the vendor CLI already holds.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyIdentityProvider;

impl IdentityProvider for EmptyIdentityProvider {
    fn name(&self) -> &'static str {
        "empty"
    }

    fn usage(&self) -> &'static str {
        "Use the credentials the cloud CLI is already logged in with"
    }

    fn flags(&self) -> Vec<FlagSpec> {
        Vec::new()
    }

    fn authenticate(
        &self,
        _flags: &FlagSet,
        _prompter: &mut dyn Prompter,
    ) -> Result<Identity, AuthenticationError> {
        Ok(Identity::anonymous(self.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::test_helpers::ScriptedPrompter;

    #[test]
    fn test_empty_identity_never_prompts() {
        let mut prompter = ScriptedPrompter::default();
        let identity = EmptyIdentityProvider
            .authenticate(&FlagSet::new(), &mut prompter)
            .unwrap();
        assert_eq!(identity, Identity::anonymous("empty"));
        assert!(prompter.asked.is_empty());
    }
}
