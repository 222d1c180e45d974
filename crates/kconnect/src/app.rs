use clap::{Arg, ArgAction, Command};
use clap_complete::Shell;

pub fn build_cli() -> Command {
    Command::new("kconnect")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Discover Kubernetes clusters on cloud providers and connect to them")
        .long_about("kconnect authenticates against an identity provider, discovers the Kubernetes clusters you can reach on a cloud provider, and writes the cluster, user and context entries for the one you pick into your kubeconfig.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("use")
                .about("Discover a cluster and add it to your kubeconfig")
                .long_about("Discover a cluster and add it to your kubeconfig.\n\nOptions depend on the chosen providers: run 'kconnect use <provider> --idp-protocol <idp> --help' to see them.")
                .override_usage("kconnect use <PROVIDER> --idp-protocol <IDP> [OPTIONS]")
                .disable_help_flag(true)
                .arg(
                    Arg::new("args")
                        .help("Provider name followed by its options")
                        .num_args(0..)
                        .trailing_var_arg(true)
                        .allow_hyphen_values(true)
                        .value_name("ARGS")
                )
        )
        .subcommand(
            Command::new("providers")
                .about("List the available cluster and identity providers")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("config")
                .about("Inspect and edit the kubeconfig file")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .arg(
                    Arg::new("kubeconfig")
                        .long("kubeconfig")
                        .help("Kubeconfig file to operate on (default: $KUBECONFIG or ~/.kube/config)")
                        .global(true)
                )
                .subcommand(
                    Command::new("view")
                        .about("Print the kubeconfig")
                        .arg(
                            Arg::new("raw")
                                .long("raw")
                                .help("Show credentials instead of redacting them")
                                .action(ArgAction::SetTrue)
                        )
                )
                .subcommand(
                    Command::new("get-contexts")
                        .about("List contexts")
                        .arg(
                            Arg::new("json")
                                .long("json")
                                .help("Output in JSON format")
                                .action(ArgAction::SetTrue)
                        )
                )
                .subcommand(
                    Command::new("use-context")
                        .about("Set the current context")
                        .arg(
                            Arg::new("name")
                                .help("Context to make current")
                                .required(true)
                                .index(1)
                        )
                )
                .subcommand(names_command(
                    "delete-context",
                    "Delete contexts together with the cluster and user they reference",
                ))
                .subcommand(names_command("delete-cluster", "Delete clusters"))
                .subcommand(names_command("delete-user", "Delete users"))
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completions")
                .arg(
                    Arg::new("shell")
                        .help("Shell to generate completions for")
                        .required(true)
                        .value_parser(clap::value_parser!(Shell))
                )
        )
}

fn names_command(name: &'static str, about: &'static str) -> Command {
    Command::new(name).about(about).arg(
        Arg::new("names")
            .help("Entry names")
            .required(true)
            .num_args(1..)
            .value_name("NAME"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_build() {
        let app = build_cli();
        assert_eq!(app.get_name(), "kconnect");
        app.debug_assert();
    }

    #[test]
    fn test_use_passes_provider_options_through() {
        let matches = build_cli()
            .try_get_matches_from(vec![
                "kconnect",
                "use",
                "eks",
                "--idp-protocol",
                "saml",
                "--region=eu-west-2",
                "--help",
            ])
            .unwrap();
        let use_matches = matches.subcommand_matches("use").unwrap();
        let args: Vec<&String> = use_matches.get_many::<String>("args").unwrap().collect();
        assert_eq!(
            args,
            ["eks", "--idp-protocol", "saml", "--region=eu-west-2", "--help"]
        );
    }

    #[test]
    fn test_use_without_args() {
        let matches = build_cli()
            .try_get_matches_from(vec!["kconnect", "use"])
            .unwrap();
        let use_matches = matches.subcommand_matches("use").unwrap();
        assert!(use_matches.get_many::<String>("args").is_none());
    }

    #[test]
    fn test_verbose_is_global() {
        let matches = build_cli()
            .try_get_matches_from(vec!["kconnect", "providers", "-v"])
            .unwrap();
        assert!(matches.get_flag("verbose"));
    }

    #[test]
    fn test_providers_json_flag() {
        let matches = build_cli()
            .try_get_matches_from(vec!["kconnect", "providers", "--json"])
            .unwrap();
        let sub = matches.subcommand_matches("providers").unwrap();
        assert!(sub.get_flag("json"));
    }

    #[test]
    fn test_config_delete_context_many_names() {
        let matches = build_cli()
            .try_get_matches_from(vec![
                "kconnect",
                "config",
                "delete-context",
                "a",
                "b",
                "--kubeconfig",
                "/tmp/kc",
            ])
            .unwrap();
        let (_, config) = matches.subcommand().unwrap();
        let (name, delete) = config.subcommand().unwrap();
        assert_eq!(name, "delete-context");
        let names: Vec<&String> = delete.get_many::<String>("names").unwrap().collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(
            delete.get_one::<String>("kubeconfig").map(String::as_str),
            Some("/tmp/kc")
        );
    }

    #[test]
    fn test_config_delete_requires_names() {
        let result = build_cli().try_get_matches_from(vec!["kconnect", "config", "delete-user"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_completions_shell_value() {
        let matches = build_cli()
            .try_get_matches_from(vec!["kconnect", "completions", "bash"])
            .unwrap();
        let sub = matches.subcommand_matches("completions").unwrap();
        assert_eq!(sub.get_one::<Shell>("shell"), Some(&Shell::Bash));

        assert!(
            build_cli()
                .try_get_matches_from(vec!["kconnect", "completions", "tcsh"])
                .is_err()
        );
    }
}
