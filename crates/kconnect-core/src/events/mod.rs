//! Lifecycle events shared by the CLI and the `use` workflow.

use std::path::Path;

use tracing::{debug, error, info};

use crate::pipeline::{PipelineError, Stage};

pub fn log_app_startup() {
    info!(
        event = "core.app.startup_completed",
        version = env!("CARGO_PKG_VERSION")
    );
}

pub fn log_app_error(error: &dyn std::error::Error) {
    error!(
        event = "core.app.error_occurred",
        error = %error,
        error_type = std::any::type_name_of_val(error)
    );
}

pub fn log_use_started(args: usize) {
    info!(event = "core.pipeline.use_started", args = args);
}

pub fn log_stage_completed(stage: Stage) {
    debug!(event = "core.pipeline.stage_completed", stage = %stage);
}

/// Help requests travel as errors but are not failures, so they are skipped.
pub fn log_stage_failed(error: &PipelineError) {
    if error.help_text().is_some() {
        return;
    }
    error!(
        event = "core.pipeline.stage_failed",
        stage = %error.stage,
        error = %error.source,
        error_code = crate::errors::KconnectError::error_code(error)
    );
}

pub fn log_use_completed(context: &str, kubeconfig: &Path, set_current: bool) {
    info!(
        event = "core.pipeline.use_completed",
        context = context,
        kubeconfig = %kubeconfig.display(),
        set_current = set_current
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{SetupError, StageError};

    #[test]
    fn test_app_events() {
        log_app_startup();

        let test_error = std::io::Error::other("test");
        log_app_error(&test_error);
    }

    #[test]
    fn test_pipeline_events() {
        log_use_started(3);
        log_stage_completed(Stage::Resolve);
        log_use_completed("dev", Path::new("/tmp/kubeconfig"), true);

        let help = PipelineError::new(
            Stage::Setup,
            StageError::Setup(SetupError::HelpRequested {
                text: "usage".to_string(),
            }),
        );
        log_stage_failed(&help);

        let failure = PipelineError::new(
            Stage::Setup,
            StageError::Setup(SetupError::InvalidArguments {
                message: "bad".to_string(),
            }),
        );
        log_stage_failed(&failure);
    }
}
