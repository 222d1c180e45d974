use kconnect_core::init_logging;
use kconnect_core::providers::ProviderRegistry;

mod app;
mod commands;
mod table;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let app = app::build_cli();
    let matches = app.get_matches();

    let verbose = matches.get_flag("verbose");
    init_logging(verbose);

    let registry = ProviderRegistry::builtin()?;
    commands::run_command(&matches, &registry)?;

    Ok(())
}
