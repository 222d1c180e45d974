use clap::ArgMatches;
use tracing::info;

use kconnect_core::providers::{ProviderKind, ProviderRegistry};

use crate::table::TableFormatter;

pub(crate) fn handle_providers_command(
    matches: &ArgMatches,
    registry: &ProviderRegistry,
) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    let descriptors = registry.descriptors();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&descriptors)?);
    } else {
        let rows: Vec<Vec<String>> = descriptors
            .iter()
            .map(|d| {
                let kind = match d.kind {
                    ProviderKind::Cluster => "cluster",
                    ProviderKind::Identity => "identity",
                };
                let flags: Vec<String> = d
                    .flags
                    .iter()
                    .map(|f| {
                        if f.required {
                            format!("--{}*", f.name)
                        } else {
                            format!("--{}", f.name)
                        }
                    })
                    .collect();
                vec![
                    d.name.clone(),
                    kind.to_string(),
                    d.identity_providers.join(", "),
                    flags.join(" "),
                ]
            })
            .collect();

        let table = TableFormatter::new(&["Name", "Kind", "Identity", "Options"], &rows);
        table.print_table(&rows);
        println!("Options marked * are required.");
    }

    info!(event = "cli.providers_completed", count = descriptors.len());
    Ok(())
}
