use clap::ArgMatches;
use serde::Serialize;
use tracing::{error, info};

use kconnect_core::KconnectError;
use kconnect_core::kubeconfig::{KubeconfigError, redact_secrets, render_document};

use super::helpers::kubeconfig_store;
use crate::table::TableFormatter;

#[derive(Serialize)]
struct ContextRow<'a> {
    name: &'a str,
    cluster: &'a str,
    user: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
    current: bool,
}

pub(crate) fn handle_config_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    match matches.subcommand() {
        Some(("view", sub)) => handle_view(sub),
        Some(("get-contexts", sub)) => handle_get_contexts(sub),
        Some(("use-context", sub)) => handle_use_context(sub),
        Some(("delete-context", sub)) => handle_delete(sub, "context"),
        Some(("delete-cluster", sub)) => handle_delete(sub, "cluster"),
        Some(("delete-user", sub)) => handle_delete(sub, "user"),
        _ => {
            error!(event = "cli.config.command_unknown");
            Err("Unknown config command".into())
        }
    }
}

fn handle_view(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let store = kubeconfig_store(matches);
    let mut doc = store.get_config().map_err(|e| report("read kubeconfig", e))?;
    if !matches.get_flag("raw") {
        redact_secrets(&mut doc);
    }

    let yaml = render_document(&doc)?;
    print!("{}", yaml);
    info!(event = "cli.config.view_completed", path = %store.path().display());
    Ok(())
}

fn handle_get_contexts(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    let store = kubeconfig_store(matches);
    let doc = store.get_config().map_err(|e| report("read kubeconfig", e))?;

    let contexts: Vec<ContextRow> = doc
        .contexts
        .iter()
        .map(|(name, entry)| ContextRow {
            name,
            cluster: &entry.cluster,
            user: &entry.user,
            namespace: entry.namespace.as_deref(),
            current: *name == doc.current_context,
        })
        .collect();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&contexts)?);
    } else if contexts.is_empty() {
        println!("No contexts found in {}.", store.path().display());
    } else {
        let rows: Vec<Vec<String>> = contexts
            .iter()
            .map(|c| {
                vec![
                    if c.current { "*" } else { "" }.to_string(),
                    c.name.to_string(),
                    c.cluster.to_string(),
                    c.user.to_string(),
                    c.namespace.unwrap_or("").to_string(),
                ]
            })
            .collect();
        let table =
            TableFormatter::new(&["Current", "Name", "Cluster", "User", "Namespace"], &rows);
        table.print_table(&rows);
    }

    info!(event = "cli.config.get_contexts_completed", count = contexts.len());
    Ok(())
}

fn handle_use_context(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let name = matches
        .get_one::<String>("name")
        .ok_or("Context name is required")?;
    let store = kubeconfig_store(matches);

    store
        .set_current_context(name)
        .map_err(|e| report("switch context", e))?;

    println!("✅ Switched to context {}", name);
    info!(event = "cli.config.use_context_completed", context = %name);
    Ok(())
}

fn handle_delete(matches: &ArgMatches, kind: &str) -> Result<(), Box<dyn std::error::Error>> {
    let names: Vec<&str> = matches
        .get_many::<String>("names")
        .map(|values| values.map(String::as_str).collect())
        .unwrap_or_default();
    let store = kubeconfig_store(matches);

    let result = match kind {
        "context" => store.remove_contexts(&names),
        "cluster" => store.remove_clusters(&names),
        _ => store.remove_auth_infos(&names),
    };
    result.map_err(|e| report(&format!("delete {}", kind), e))?;

    for name in &names {
        println!("🗑️  Deleted {} {}", kind, name);
    }
    info!(
        event = "cli.config.delete_completed",
        kind = kind,
        count = names.len(),
        path = %store.path().display()
    );
    Ok(())
}

fn report(action: &str, e: KubeconfigError) -> Box<dyn std::error::Error> {
    eprintln!("❌ Failed to {}: {}", action, e);
    error!(
        event = "cli.config.failed",
        action = action,
        error = %e,
        error_code = e.error_code()
    );
    e.into()
}
