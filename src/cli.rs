//! Entry point dispatch: parse flags, set up logging, and run either the
//! standalone workflow once or the web intake server.

use clap::Parser;

use crate::config::{Behavior, Cli, Settings};
use crate::driver::{self, WorkflowArgs};
use crate::error::OstrichError;
use crate::fs::RealFs;
use crate::server;
use crate::vcs::GitCli;

/// Parse CLI flags into validated [`Settings`], before logging is set up.
pub fn parse_settings() -> Result<Settings, OstrichError> {
    Settings::from_cli(Cli::parse())
}

pub async fn run(settings: Settings) -> Result<(), OstrichError> {
    tracing::info!(
        behavior = ?settings.behavior,
        repository = %settings.repository,
        from_branch = %settings.from_branch,
        commit_id = %settings.commit_id,
        ostrich_branch = %settings.ostrich_branch,
        log_level = ?settings.log_level,
        port = settings.port,
        "start ostrich-development"
    );

    match settings.behavior {
        Behavior::Standalone => {
            let args = WorkflowArgs {
                repository: settings.repository,
                from_branch: settings.from_branch,
                ostrich_branch: settings.ostrich_branch,
                commit_id: settings.commit_id,
            };
            driver::run_workflow(&args, &GitCli, &RealFs)
        }
        Behavior::Web => server::start_server(settings.port).await,
    }
}
