use std::sync::Arc;

use regex::Regex;
use tracing::debug;

use super::choose_value;
use crate::flags::FlagSet;
use crate::prompt::Prompter;
use crate::providers::backends::EksApi;
use crate::providers::cluster::eks::{FLAG_REGION, FLAG_REGION_FILTER, aws_profile};
use crate::providers::errors::ResolutionError;
use crate::providers::traits::FlagsResolver;
use crate::providers::types::Identity;

/// Fills the AWS region from the regions enabled for the account.
pub struct AwsFlagsResolver {
    api: Arc<dyn EksApi>,
}

impl AwsFlagsResolver {
    pub fn new(api: Arc<dyn EksApi>) -> Self {
        Self { api }
    }
}

impl FlagsResolver for AwsFlagsResolver {
    fn resolve(
        &self,
        identity: &Identity,
        flags: &mut FlagSet,
        prompter: &mut dyn Prompter,
    ) -> Result<(), ResolutionError> {
        if !flags.needs_value(FLAG_REGION) {
            return Ok(());
        }

        let filter = flags
            .get(FLAG_REGION_FILTER)
            .map(Regex::new)
            .transpose()
            .map_err(|e| ResolutionError::InvalidValue {
                flag: FLAG_REGION_FILTER.to_string(),
                message: e.to_string(),
            })?;

        let profile = aws_profile(identity, flags);
        let regions: Vec<String> = self
            .api
            .list_regions(profile.as_deref())?
            .into_iter()
            .filter(|r| filter.as_ref().is_none_or(|f| f.is_match(r)))
            .collect();
        debug!(
            event = "core.resolver.aws_regions_listed",
            count = regions.len()
        );

        choose_value(FLAG_REGION, "Select an AWS region", regions, flags, prompter)
    }
}
