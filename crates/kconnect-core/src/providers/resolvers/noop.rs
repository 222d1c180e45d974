use crate::flags::FlagSet;
use crate::prompt::Prompter;
use crate::providers::errors::ResolutionError;
use crate::providers::traits::FlagsResolver;
use crate::providers::types::Identity;

/// Resolver for providers whose options all have usable defaults.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopFlagsResolver;

impl FlagsResolver for NoopFlagsResolver {
    fn resolve(
        &self,
        _identity: &Identity,
        _flags: &mut FlagSet,
        _prompter: &mut dyn Prompter,
    ) -> Result<(), ResolutionError> {
        Ok(())
    }
}
