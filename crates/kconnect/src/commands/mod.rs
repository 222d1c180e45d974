use clap::ArgMatches;
use tracing::error;

use kconnect_core::events;
use kconnect_core::providers::ProviderRegistry;

pub mod helpers;

mod completions;
mod config;
mod providers;
mod use_cluster;

pub fn run_command(
    matches: &ArgMatches,
    registry: &ProviderRegistry,
) -> Result<(), Box<dyn std::error::Error>> {
    events::log_app_startup();

    match matches.subcommand() {
        Some(("use", sub_matches)) => use_cluster::handle_use_command(sub_matches, registry),
        Some(("providers", sub_matches)) => {
            providers::handle_providers_command(sub_matches, registry)
        }
        Some(("config", sub_matches)) => config::handle_config_command(sub_matches),
        Some(("completions", sub_matches)) => {
            completions::handle_completions_command(sub_matches)
        }
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    }
}
