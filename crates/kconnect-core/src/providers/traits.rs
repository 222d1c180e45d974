//! Provider capability traits.

use crate::flags::{FlagSet, FlagSpec};
use crate::kubeconfig::ConfigDocument;
use crate::prompt::Prompter;

use super::errors::{AuthenticationError, DiscoveryError, ResolutionError};
use super::types::{ClusterDescriptor, Identity};

/// Discovers clusters on one cloud backend.
pub trait ClusterProvider: Send + Sync {
    /// Registry key and the positional selector on the command line (e.g. "eks").
    fn name(&self) -> &'static str;

    /// One-line description for help and listings.
    fn usage(&self) -> &'static str;

    /// Options this provider adds to the `use` command.
    fn flags(&self) -> Vec<FlagSpec>;

    /// Identity providers this cluster provider can work with.
    fn supported_identity_providers(&self) -> &'static [&'static str];

    /// Resolver that fills this provider's unset options.
    fn flags_resolver(&self) -> Box<dyn FlagsResolver>;

    /// List clusters visible to `identity`. Read-only; an empty list is not an error.
    fn discover(
        &self,
        identity: &Identity,
        flags: &FlagSet,
    ) -> Result<Vec<ClusterDescriptor>, DiscoveryError>;

    /// Build the cluster, user and context entries for one discovered cluster.
    ///
    /// The returned document holds exactly one context.
    fn cluster_config(
        &self,
        identity: &Identity,
        cluster: &ClusterDescriptor,
        flags: &FlagSet,
    ) -> Result<ConfigDocument, DiscoveryError>;
}

/// Authenticates a user.
pub trait IdentityProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn usage(&self) -> &'static str;

    fn flags(&self) -> Vec<FlagSpec>;

    /// Authenticate once per invocation. May prompt or call out to an identity backend.
    fn authenticate(
        &self,
        flags: &FlagSet,
        prompter: &mut dyn Prompter,
    ) -> Result<Identity, AuthenticationError>;
}

/// Fills options the user did not supply.
pub trait FlagsResolver {
    /// Resolve unset options in place. Values the user supplied explicitly are
    /// never changed.
    fn resolve(
        &self,
        identity: &Identity,
        flags: &mut FlagSet,
        prompter: &mut dyn Prompter,
    ) -> Result<(), ResolutionError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::test_helpers::ScriptedPrompter;

    struct MockIdentityProvider;

    impl IdentityProvider for MockIdentityProvider {
        fn name(&self) -> &'static str {
            "mock"
        }

        fn usage(&self) -> &'static str {
            "Mock identity"
        }

        fn flags(&self) -> Vec<FlagSpec> {
            vec![FlagSpec::string("token", "Token")]
        }

        fn authenticate(
            &self,
            flags: &FlagSet,
            _prompter: &mut dyn Prompter,
        ) -> Result<Identity, AuthenticationError> {
            let token = flags.get("token").unwrap_or("anonymous");
            Ok(Identity::for_principal(self.name(), token))
        }
    }

    #[test]
    fn test_identity_provider_reads_its_flags() {
        let provider = MockIdentityProvider;
        let mut flags = FlagSet::from_specs(provider.flags()).unwrap();
        flags.set_explicit("token", "abc").unwrap();

        let identity = provider
            .authenticate(&flags, &mut ScriptedPrompter::default())
            .unwrap();
        assert_eq!(identity.provider(), "mock");
        assert_eq!(identity.principal(), Some("abc"));
    }
}
