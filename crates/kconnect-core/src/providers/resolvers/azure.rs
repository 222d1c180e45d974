use std::sync::Arc;

use tracing::{debug, warn};

use super::choose_value;
use crate::flags::FlagSet;
use crate::prompt::Prompter;
use crate::providers::backends::AksApi;
use crate::providers::cluster::aks::{FLAG_RESOURCE_GROUP, FLAG_SUBSCRIPTION_ID};
use crate::providers::errors::ResolutionError;
use crate::providers::traits::FlagsResolver;
use crate::providers::types::Identity;

/// Fills the Azure subscription and resource group.
///
/// With no subscriptions visible the subscription is left unset and `az`
/// falls back to its default subscription.
pub struct AzureFlagsResolver {
    api: Arc<dyn AksApi>,
}

impl AzureFlagsResolver {
    pub fn new(api: Arc<dyn AksApi>) -> Self {
        Self { api }
    }

    fn resolve_subscription(
        &self,
        flags: &mut FlagSet,
        prompter: &mut dyn Prompter,
    ) -> Result<(), ResolutionError> {
        let subscriptions = self.api.list_subscriptions()?;
        let id = match subscriptions.as_slice() {
            [] => {
                warn!(event = "core.resolver.azure_no_subscriptions");
                return Ok(());
            }
            [only] => only.id.clone(),
            many => {
                let mut labels: Vec<String> = many
                    .iter()
                    .map(|s| format!("{} ({})", s.name, s.id))
                    .collect();
                labels.sort();
                let chosen = prompter.select("Select an Azure subscription", &labels)?;
                many.iter()
                    .find(|s| format!("{} ({})", s.name, s.id) == chosen)
                    .map(|s| s.id.clone())
                    .ok_or_else(|| ResolutionError::InvalidValue {
                        flag: FLAG_SUBSCRIPTION_ID.to_string(),
                        message: format!("'{}' is not a known subscription", chosen),
                    })?
            }
        };
        flags.set_resolved(FLAG_SUBSCRIPTION_ID, &id)?;
        Ok(())
    }
}

impl FlagsResolver for AzureFlagsResolver {
    fn resolve(
        &self,
        _identity: &Identity,
        flags: &mut FlagSet,
        prompter: &mut dyn Prompter,
    ) -> Result<(), ResolutionError> {
        if flags.needs_value(FLAG_SUBSCRIPTION_ID) {
            self.resolve_subscription(flags, prompter)?;
        }

        if flags.needs_value(FLAG_RESOURCE_GROUP) {
            let groups = self
                .api
                .list_resource_groups(flags.get(FLAG_SUBSCRIPTION_ID))?;
            debug!(
                event = "core.resolver.azure_groups_listed",
                count = groups.len()
            );
            choose_value(
                FLAG_RESOURCE_GROUP,
                "Select a resource group",
                groups,
                flags,
                prompter,
            )?;
        }
        Ok(())
    }
}
