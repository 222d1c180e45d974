//! The `use` workflow: Setup, Authenticate, Resolve, Discover, Persist.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::error::ErrorKind;
use clap::{Arg, Command};
use tracing::{debug, info};

use super::errors::{PipelineError, SetupError, Stage, StageError};
use super::preparse::{find_flag_value, find_positional, wants_help};
use crate::config::KconnectConfig;
use crate::events;
use crate::flags::{ENV_PREFIX, FlagSet, FlagSpec};
use crate::kubeconfig::{ConfigDocument, KubeconfigStore};
use crate::prompt::Prompter;
use crate::providers::{
    ClusterDescriptor, ClusterProvider, DiscoveryError, Identity, IdentityProvider,
    ProviderError, ProviderRegistry, ResolutionError,
};

pub const FLAG_IDP_PROTOCOL: &str = "idp-protocol";
pub const FLAG_KUBECONFIG: &str = "kubeconfig";
pub const FLAG_CLUSTER_ID: &str = "cluster-id";
pub const FLAG_ALIAS: &str = "alias";
pub const FLAG_SET_CURRENT: &str = "set-current";

/// Base options that take a separate value token.
const VALUE_FLAGS: &[&str] = &[FLAG_IDP_PROTOCOL, FLAG_KUBECONFIG, FLAG_CLUSTER_ID, FLAG_ALIAS];

/// Options every `use` invocation has, whatever the providers.
pub fn base_flags() -> Vec<FlagSpec> {
    vec![
        FlagSpec::string(FLAG_IDP_PROTOCOL, "Identity provider to authenticate with"),
        FlagSpec::string(FLAG_KUBECONFIG, "Kubeconfig file to write to"),
        FlagSpec::string(FLAG_CLUSTER_ID, "Id of the cluster to connect to"),
        FlagSpec::string(FLAG_ALIAS, "Name to give the new context"),
        FlagSpec::bool(FLAG_SET_CURRENT, "Make the new context the current one", true),
    ]
}

/// Per-invocation state built by the Setup stage.
pub struct ResolutionContext {
    pub cluster_provider: Arc<dyn ClusterProvider>,
    pub identity_provider: Arc<dyn IdentityProvider>,
    pub flags: FlagSet,
    pub set_current: bool,
}

/// Entries built for the selected cluster, ready to be persisted.
struct Connection {
    cluster: ClusterDescriptor,
    context: String,
    doc: ConfigDocument,
}

/// What a successful `use` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UseOutcome {
    pub cluster: ClusterDescriptor,
    pub context: String,
    pub kubeconfig: PathBuf,
    pub set_current: bool,
}

/// Runs `kconnect use` against a registry and loaded config.
pub struct UseWorkflow<'a> {
    registry: &'a ProviderRegistry,
    config: &'a KconnectConfig,
}

impl<'a> UseWorkflow<'a> {
    pub fn new(registry: &'a ProviderRegistry, config: &'a KconnectConfig) -> Self {
        Self { registry, config }
    }

    /// Run all stages over `args` (everything after `use`).
    pub fn run(
        &self,
        args: &[String],
        prompter: &mut dyn Prompter,
    ) -> Result<UseOutcome, PipelineError> {
        events::log_use_started(args.len());

        let mut ctx = self.setup(args).map_err(|e| failed(Stage::Setup, e))?;

        let identity = ctx
            .identity_provider
            .authenticate(&ctx.flags, prompter)
            .map_err(|e| failed(Stage::Authenticate, e))?;
        events::log_stage_completed(Stage::Authenticate);

        resolve(&mut ctx, &identity, prompter).map_err(|e| failed(Stage::Resolve, e))?;
        events::log_stage_completed(Stage::Resolve);

        let connection =
            discover(&ctx, &identity, prompter).map_err(|e| failed(Stage::Discover, e))?;
        events::log_stage_completed(Stage::Discover);

        let outcome = persist(&ctx, connection).map_err(|e| failed(Stage::Persist, e))?;
        events::log_stage_completed(Stage::Persist);

        events::log_use_completed(&outcome.context, &outcome.kubeconfig, outcome.set_current);
        Ok(outcome)
    }

    /// Pick providers, build the merged option set and parse `args` against it.
    pub fn setup(&self, args: &[String]) -> Result<ResolutionContext, SetupError> {
        let Some(provider_name) = find_positional(args, VALUE_FLAGS) else {
            if wants_help(args) {
                return Err(SetupError::HelpRequested {
                    text: self.base_help(),
                });
            }
            return Err(SetupError::MissingProviderArgument {
                available: self.registry.list_cluster_providers().join(", "),
            });
        };

        let cluster_provider = self.registry.create_cluster_provider(provider_name)?;
        let mut flags = FlagSet::from_specs(base_flags())?;
        flags.merge(FlagSet::from_specs(cluster_provider.flags())?)?;
        debug!(
            event = "core.pipeline.cluster_provider_selected",
            provider = cluster_provider.name()
        );

        let idp_name = find_flag_value(args, FLAG_IDP_PROTOCOL)
            .or_else(|| {
                std::env::var(format!("{}IDP_PROTOCOL", ENV_PREFIX))
                    .ok()
                    .filter(|v| !v.is_empty())
            })
            .or_else(|| self.config.defaults.idp_protocol.clone());

        let Some(idp_name) = idp_name else {
            if wants_help(args) {
                return Err(SetupError::HelpRequested {
                    text: render_help(cluster_provider.as_ref(), &flags),
                });
            }
            return Err(SetupError::MissingIdpProtocol {
                cluster: cluster_provider.name().to_string(),
                supported: cluster_provider.supported_identity_providers().join(", "),
            });
        };

        let identity_provider = self.registry.create_identity_provider(&idp_name)?;
        let supported = cluster_provider.supported_identity_providers();
        if !supported.contains(&identity_provider.name()) {
            return Err(ProviderError::UnsupportedIdentityProvider {
                cluster: cluster_provider.name().to_string(),
                identity: identity_provider.name().to_string(),
                supported: supported.join(", "),
            }
            .into());
        }
        flags.merge(FlagSet::from_specs(identity_provider.flags())?)?;
        debug!(
            event = "core.pipeline.identity_provider_selected",
            provider = identity_provider.name()
        );

        self.apply_config_defaults(
            &mut flags,
            &[cluster_provider.name(), identity_provider.name()],
        )?;

        let matches = use_command(cluster_provider.as_ref(), &flags)
            .try_get_matches_from(args)
            .map_err(|e| match e.kind() {
                ErrorKind::DisplayHelp => SetupError::HelpRequested {
                    text: e.render().to_string(),
                },
                _ => SetupError::InvalidArguments {
                    message: e.render().to_string().trim_end().to_string(),
                },
            })?;
        flags.apply_matches(&matches);
        let set_current = flags.get_bool(FLAG_SET_CURRENT)?;

        events::log_stage_completed(Stage::Setup);
        Ok(ResolutionContext {
            cluster_provider,
            identity_provider,
            flags,
            set_current,
        })
    }

    fn apply_config_defaults(
        &self,
        flags: &mut FlagSet,
        providers: &[&str],
    ) -> Result<(), SetupError> {
        let defaults = &self.config.defaults;
        if let Some(path) = &defaults.kubeconfig {
            flags.set_default(FLAG_KUBECONFIG, &path.to_string_lossy())?;
        }
        if let Some(set_current) = defaults.set_current {
            flags.set_default(FLAG_SET_CURRENT, &set_current.to_string())?;
        }

        for provider in providers {
            for (name, value) in self.config.provider_defaults(provider) {
                if flags.contains(&name) {
                    flags.set_default(&name, &value)?;
                } else {
                    debug!(
                        event = "core.pipeline.config_default_ignored",
                        provider = provider,
                        option = %name
                    );
                }
            }
        }
        Ok(())
    }

    fn base_help(&self) -> String {
        let mut command = Command::new("use")
            .bin_name("kconnect use")
            .about("Discover a cluster and add it to your kubeconfig")
            .override_usage("kconnect use <PROVIDER> --idp-protocol <IDP> [OPTIONS]")
            .no_binary_name(true)
            .args(base_flags().iter().map(FlagSpec::to_arg));
        format!(
            "{}\nCluster providers: {}\nIdentity providers: {}\n",
            command.render_help(),
            self.registry.list_cluster_providers().join(", "),
            self.registry.list_identity_providers().join(", ")
        )
    }
}

fn use_command(provider: &dyn ClusterProvider, flags: &FlagSet) -> Command {
    Command::new("use")
        .bin_name(format!("kconnect use {}", provider.name()))
        .about(provider.usage())
        .no_binary_name(true)
        .arg(
            Arg::new("provider")
                .value_name("PROVIDER")
                .help("Cluster provider")
                .required(true),
        )
        .args(flags.to_args())
}

fn render_help(provider: &dyn ClusterProvider, flags: &FlagSet) -> String {
    format!(
        "{}\nIdentity providers: {}\n",
        use_command(provider, flags).render_help(),
        provider.supported_identity_providers().join(", ")
    )
}

fn resolve(
    ctx: &mut ResolutionContext,
    identity: &Identity,
    prompter: &mut dyn Prompter,
) -> Result<(), ResolutionError> {
    ctx.cluster_provider
        .flags_resolver()
        .resolve(identity, &mut ctx.flags, prompter)?;

    let missing = ctx.flags.missing_required();
    if !missing.is_empty() {
        return Err(ResolutionError::MissingRequired { names: missing });
    }
    Ok(())
}

fn discover(
    ctx: &ResolutionContext,
    identity: &Identity,
    prompter: &mut dyn Prompter,
) -> Result<Connection, DiscoveryError> {
    let clusters = ctx.cluster_provider.discover(identity, &ctx.flags)?;
    let cluster = select_cluster(clusters, ctx.flags.get(FLAG_CLUSTER_ID), prompter)?;
    info!(
        event = "core.pipeline.cluster_selected",
        cluster = %cluster.name,
        id = %cluster.id
    );

    let doc = ctx
        .cluster_provider
        .cluster_config(identity, &cluster, &ctx.flags)?;
    let context = match doc.contexts.keys().next() {
        Some(name) if doc.contexts.len() == 1 => name.clone(),
        _ => {
            return Err(DiscoveryError::InvalidCredentials {
                name: cluster.name.clone(),
                message: format!("expected one context, found {}", doc.contexts.len()),
            });
        }
    };
    Ok(Connection {
        cluster,
        context,
        doc,
    })
}

/// Pick the cluster to connect to.
///
/// `cluster_id` must match a discovered cluster by id or name. Without it a
/// single cluster is taken and several are offered to the user.
pub fn select_cluster(
    mut clusters: Vec<ClusterDescriptor>,
    cluster_id: Option<&str>,
    prompter: &mut dyn Prompter,
) -> Result<ClusterDescriptor, DiscoveryError> {
    if clusters.is_empty() {
        return Err(DiscoveryError::NoClusters);
    }

    if let Some(id) = cluster_id {
        return clusters
            .into_iter()
            .find(|c| c.id == id || c.name == id)
            .ok_or_else(|| DiscoveryError::ClusterNotFound { id: id.to_string() });
    }

    if clusters.len() == 1 {
        return Ok(clusters.swap_remove(0));
    }

    let labels: Vec<String> = clusters.iter().map(ClusterDescriptor::label).collect();
    let chosen = prompter.select("Select a cluster", &labels)?;
    let index = labels
        .iter()
        .position(|l| *l == chosen)
        .ok_or_else(|| DiscoveryError::ClusterNotFound { id: chosen })?;
    Ok(clusters.swap_remove(index))
}

fn persist(ctx: &ResolutionContext, connection: Connection) -> Result<UseOutcome, StageError> {
    let Connection {
        cluster,
        mut context,
        mut doc,
    } = connection;

    if let Some(alias) = ctx.flags.get(FLAG_ALIAS)
        && alias != context
        && let Some(entry) = doc.contexts.remove(&context)
    {
        doc.contexts.insert(alias.to_string(), entry);
        context = alias.to_string();
    }
    if ctx.set_current {
        doc.current_context = context.clone();
    } else {
        doc.current_context.clear();
    }

    let store = KubeconfigStore::locate(ctx.flags.get(FLAG_KUBECONFIG).map(Path::new));
    store.modify_config(&doc, false)?;

    Ok(UseOutcome {
        cluster,
        context,
        kubeconfig: store.path().to_path_buf(),
        set_current: ctx.set_current,
    })
}

fn failed(stage: Stage, source: impl Into<StageError>) -> PipelineError {
    let error = PipelineError::new(stage, source);
    events::log_stage_failed(&error);
    error
}
