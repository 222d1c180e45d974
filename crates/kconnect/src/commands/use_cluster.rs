use clap::ArgMatches;
use tracing::{error, info};

use kconnect_core::pipeline::UseWorkflow;
use kconnect_core::prompt::StdioPrompter;
use kconnect_core::providers::ProviderRegistry;
use kconnect_core::{KconnectError, events};

use super::helpers::load_config;

pub(crate) fn handle_use_command(
    matches: &ArgMatches,
    registry: &ProviderRegistry,
) -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = matches
        .get_many::<String>("args")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    info!(event = "cli.use_started", args = args.len());

    let config = load_config(registry)?;
    let mut prompter = StdioPrompter::stdio();

    match UseWorkflow::new(registry, &config).run(&args, &mut prompter) {
        Ok(outcome) => {
            println!("✅ Connected to cluster {}", outcome.cluster.name);
            println!("   Id: {}", outcome.cluster.id);
            println!("   Context: {}", outcome.context);
            println!("   Kubeconfig: {}", outcome.kubeconfig.display());
            if !outcome.set_current {
                println!(
                    "   Current context unchanged. Switch with: kconnect config use-context {}",
                    outcome.context
                );
            }

            info!(
                event = "cli.use_completed",
                context = %outcome.context,
                cluster = %outcome.cluster.id
            );
            Ok(())
        }
        Err(e) => {
            if let Some(help) = e.help_text() {
                print!("{}", help);
                return Ok(());
            }

            eprintln!("❌ Failed to connect: {}", e);
            error!(
                event = "cli.use_failed",
                stage = %e.stage,
                error = %e,
                error_code = e.error_code(),
                user_error = e.is_user_error()
            );
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}
