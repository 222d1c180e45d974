//! Flags resolver implementations.

mod aws;
mod azure;
mod noop;

pub use aws::AwsFlagsResolver;
pub use azure::AzureFlagsResolver;
pub use noop::NoopFlagsResolver;

use tracing::info;

use crate::flags::FlagSet;
use crate::prompt::Prompter;

use super::errors::ResolutionError;

/// Set `flag` from `choices`: sorted and de-duplicated, a single choice is
/// taken as-is, several are offered to the user.
pub(crate) fn choose_value(
    flag: &str,
    message: &str,
    mut choices: Vec<String>,
    flags: &mut FlagSet,
    prompter: &mut dyn Prompter,
) -> Result<(), ResolutionError> {
    choices.sort();
    choices.dedup();

    let value = match choices.len() {
        0 => {
            return Err(ResolutionError::NoChoices {
                flag: flag.to_string(),
            });
        }
        1 => {
            info!(
                event = "core.resolver.single_choice",
                flag = flag,
                value = %choices[0]
            );
            choices.swap_remove(0)
        }
        _ => prompter.select(message, &choices)?,
    };

    flags.set_resolved(flag, &value)?;
    info!(event = "core.resolver.flag_resolved", flag = flag, value = %value);
    Ok(())
}
