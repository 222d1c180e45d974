//! Option declarations and the merged option set.

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches};
use serde::Serialize;

use super::errors::FlagError;

/// Prefix for environment variables that can supply any option.
pub const ENV_PREFIX: &str = "KCONNECT_";

/// Value type of a declared option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagKind {
    String,
    Bool,
}

/// A declared option contributed by the base command or a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlagSpec {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shorthand: Option<char>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    pub required: bool,
    pub kind: FlagKind,
}

impl FlagSpec {
    pub fn string(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            shorthand: None,
            description: description.to_string(),
            default: None,
            required: false,
            kind: FlagKind::String,
        }
    }

    pub fn bool(name: &str, description: &str, default: bool) -> Self {
        Self {
            kind: FlagKind::Bool,
            default: Some(default.to_string()),
            ..Self::string(name, description)
        }
    }

    pub fn short(mut self, shorthand: char) -> Self {
        self.shorthand = Some(shorthand);
        self
    }

    pub fn default_value(mut self, value: &str) -> Self {
        self.default = Some(value.to_string());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Environment variable that supplies this option, e.g. `KCONNECT_IDP_PROTOCOL`.
    pub fn env_var(&self) -> String {
        format!(
            "{}{}",
            ENV_PREFIX,
            self.name.to_uppercase().replace('-', "_")
        )
    }

    /// Build the clap argument for this option.
    ///
    /// Defaults are not handed to clap: the value source clap reports is only
    /// ever the command line or the environment.
    pub fn to_arg(&self) -> Arg {
        let mut arg = Arg::new(self.name.clone())
            .long(self.name.clone())
            .help(self.help_text())
            .env(self.env_var());

        if let Some(short) = self.shorthand {
            arg = arg.short(short);
        }

        match self.kind {
            FlagKind::String => arg.action(ArgAction::Set).num_args(1),
            FlagKind::Bool => arg
                .action(ArgAction::Set)
                .num_args(0..=1)
                .require_equals(true)
                .default_missing_value("true")
                .value_parser(clap::builder::BoolishValueParser::new()),
        }
    }

    fn help_text(&self) -> String {
        let mut help = self.description.clone();
        if self.required {
            help.push_str(" [required]");
        }
        if let Some(default) = &self.default {
            help.push_str(&format!(" [default: {}]", default));
        }
        help
    }
}

#[derive(Debug, Clone)]
struct FlagSlot {
    spec: FlagSpec,
    value: Option<String>,
    explicit: bool,
}

/// An ordered set of options with their current values.
///
/// Names are unique across the whole set. Each value remembers whether the
/// user supplied it (command line or environment) or whether it came from a
/// default or a resolver.
#[derive(Debug, Clone, Default)]
pub struct FlagSet {
    slots: Vec<FlagSlot>,
}

impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from specs, rejecting duplicate names.
    pub fn from_specs(specs: impl IntoIterator<Item = FlagSpec>) -> Result<Self, FlagError> {
        let mut set = Self::new();
        for spec in specs {
            set.add(spec)?;
        }
        Ok(set)
    }

    pub fn add(&mut self, spec: FlagSpec) -> Result<(), FlagError> {
        if self.contains(&spec.name) {
            return Err(FlagError::Duplicate { name: spec.name });
        }
        self.slots.push(FlagSlot {
            spec,
            value: None,
            explicit: false,
        });
        Ok(())
    }

    /// Merge another set into this one.
    ///
    /// All-or-nothing: if any name in `other` already exists here (or repeats
    /// inside `other`), nothing is added.
    pub fn merge(&mut self, other: FlagSet) -> Result<(), FlagError> {
        let mut seen: Vec<&str> = Vec::with_capacity(other.slots.len());
        for slot in &other.slots {
            let name = slot.spec.name.as_str();
            if self.contains(name) || seen.contains(&name) {
                return Err(FlagError::Duplicate {
                    name: name.to_string(),
                });
            }
            seen.push(name);
        }
        self.slots.extend(other.slots);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slot(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn specs(&self) -> impl Iterator<Item = &FlagSpec> {
        self.slots.iter().map(|s| &s.spec)
    }

    /// Current value, falling back to the declared default.
    pub fn get(&self, name: &str) -> Option<&str> {
        let slot = self.slot(name)?;
        slot.value
            .as_deref()
            .or(slot.spec.default.as_deref())
            .filter(|v| !v.is_empty())
    }

    pub fn get_bool(&self, name: &str) -> Result<bool, FlagError> {
        match self.get(name) {
            None => Ok(false),
            Some(value) => parse_bool(value).ok_or_else(|| FlagError::InvalidBool {
                name: name.to_string(),
                value: value.to_string(),
            }),
        }
    }

    pub fn is_explicit(&self, name: &str) -> bool {
        self.slot(name).is_some_and(|s| s.explicit)
    }

    /// Whether a resolver should try to fill this option.
    pub fn needs_value(&self, name: &str) -> bool {
        self.contains(name) && !self.is_explicit(name) && self.get(name).is_none()
    }

    /// Record a value the user supplied.
    pub fn set_explicit(&mut self, name: &str, value: &str) -> Result<(), FlagError> {
        let slot = self.slot_mut(name)?;
        slot.value = Some(value.to_string());
        slot.explicit = true;
        Ok(())
    }

    /// Record a value determined by a resolver. Explicit values are never replaced.
    pub fn set_resolved(&mut self, name: &str, value: &str) -> Result<(), FlagError> {
        let slot = self.slot_mut(name)?;
        if slot.explicit {
            return Err(FlagError::AlreadyExplicit {
                name: name.to_string(),
            });
        }
        slot.value = Some(value.to_string());
        Ok(())
    }

    /// Replace the declared default of an option (used for config file defaults).
    pub fn set_default(&mut self, name: &str, value: &str) -> Result<(), FlagError> {
        let slot = self.slot_mut(name)?;
        slot.spec.default = Some(value.to_string());
        Ok(())
    }

    /// Names of required options that still have no value.
    pub fn missing_required(&self) -> Vec<String> {
        self.slots
            .iter()
            .filter(|s| s.spec.required && self.get(&s.spec.name).is_none())
            .map(|s| s.spec.name.clone())
            .collect()
    }

    pub fn to_args(&self) -> Vec<Arg> {
        self.slots.iter().map(|s| s.spec.to_arg()).collect()
    }

    /// Copy user-supplied values out of parsed matches.
    ///
    /// `matches` must come from a command built with [`FlagSet::to_args`].
    pub fn apply_matches(&mut self, matches: &ArgMatches) {
        for slot in &mut self.slots {
            let name = slot.spec.name.as_str();
            let supplied = matches!(
                matches.value_source(name),
                Some(ValueSource::CommandLine) | Some(ValueSource::EnvVariable)
            );
            if !supplied {
                continue;
            }
            let value = match slot.spec.kind {
                FlagKind::String => matches.get_one::<String>(name).cloned(),
                FlagKind::Bool => matches.get_one::<bool>(name).map(|b| b.to_string()),
            };
            if let Some(value) = value {
                slot.value = Some(value);
                slot.explicit = true;
            }
        }
    }

    fn slot(&self, name: &str) -> Option<&FlagSlot> {
        self.slots.iter().find(|s| s.spec.name == name)
    }

    fn slot_mut(&mut self, name: &str) -> Result<&mut FlagSlot, FlagError> {
        self.slots
            .iter_mut()
            .find(|s| s.spec.name == name)
            .ok_or_else(|| FlagError::Unknown {
                name: name.to_string(),
            })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "on" => Some(true),
        "false" | "no" | "n" | "0" | "off" => Some(false),
        _ => None,
    }
}
