//! Typed command options exchanged between providers and the command layer.
//!
//! A provider declares its options as [`FlagSpec`]s. The `use` workflow merges
//! the base command's set with every provider's set, turns the result into
//! clap arguments, and writes parsed values back into the set. Resolvers then
//! fill the gaps without touching anything the user supplied.

pub mod errors;
pub mod types;

pub use errors::FlagError;
pub use types::{ENV_PREFIX, FlagKind, FlagSet, FlagSpec};
