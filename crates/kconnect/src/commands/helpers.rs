use std::path::Path;

use clap::ArgMatches;
use tracing::{error, warn};

use kconnect_core::config::KconnectConfig;
use kconnect_core::kubeconfig::KubeconfigStore;
use kconnect_core::providers::ProviderRegistry;

/// Load and validate the config files.
///
/// A broken config file is reported on stderr and fails the command: its
/// values would otherwise silently stop applying.
pub fn load_config(
    registry: &ProviderRegistry,
) -> Result<KconnectConfig, Box<dyn std::error::Error>> {
    let config = KconnectConfig::load_hierarchy().and_then(|config| {
        config.validate(registry)?;
        Ok(config)
    });

    config.map_err(|e| {
        eprintln!("❌ Could not load config: {}", e);
        eprintln!(
            "   Tip: Check ~/.kconnect/config.toml (or $KCONNECT_CONFIG) and ./.kconnect/config.toml."
        );
        error!(event = "cli.config.load_failed", error = %e);
        e.into()
    })
}

/// Kubeconfig store for `--kubeconfig`, falling back to the environment.
pub fn kubeconfig_store(matches: &ArgMatches) -> KubeconfigStore {
    let explicit = matches.get_one::<String>("kubeconfig").map(Path::new);
    let store = KubeconfigStore::locate(explicit);
    if explicit.is_none() && !store.path().exists() {
        warn!(
            event = "cli.kubeconfig.missing",
            path = %store.path().display()
        );
    }
    store
}
