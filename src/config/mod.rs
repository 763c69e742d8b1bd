//! CLI flags merged into a validated [`Settings`] value.
//!
//! Seven scalar flags don't warrant a layered `figment` provider; `clap`'s
//! derive output is the only source, with `Settings::from_cli` performing
//! the same "must need argument" validation the original flag parser did.

use clap::{Parser, ValueEnum};

use crate::error::OstrichError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Behavior {
    Standalone,
    Web,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
#[clap(rename_all = "UPPER")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_tracing_filter(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "ostrich", version, about = "Replay a commit onto an annotation branch")]
pub struct Cli {
    #[arg(long, value_enum, default_value = "standalone")]
    pub behavior: Behavior,

    /// repository url.ex)https://github.com/xxx/yyy.git
    #[arg(long, default_value = "")]
    pub repository: String,

    /// committed branch name
    #[arg(long = "from-branch", default_value = "")]
    pub from_branch: String,

    /// commit id
    #[arg(long = "commit-id", default_value = "")]
    pub commit_id: String,

    /// ostrich repository.
    #[arg(long = "ostrich-branch", default_value = "")]
    pub ostrich_branch: String,

    #[arg(long = "log-level", value_enum, default_value = "WARN")]
    pub log_level: LogLevel,

    /// ostrich service web port
    #[arg(long, default_value_t = 8080)]
    pub port: u16,
}

/// Validated settings for one process invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub behavior: Behavior,
    pub repository: String,
    pub from_branch: String,
    pub commit_id: String,
    pub ostrich_branch: String,
    pub log_level: LogLevel,
    pub port: u16,
}

impl Settings {
    /// Build `Settings` from parsed CLI flags.
    ///
    /// In `standalone` mode all four workflow arguments are required; `web`
    /// mode takes them per-request instead, so no validation happens here.
    pub fn from_cli(cli: Cli) -> Result<Self, OstrichError> {
        if cli.behavior == Behavior::Standalone {
            require_nonempty(&cli.repository, "repository")?;
            require_nonempty(&cli.from_branch, "from branch")?;
            require_nonempty(&cli.commit_id, "commit id")?;
            require_nonempty(&cli.ostrich_branch, "ostrich branch")?;
        }

        Ok(Settings {
            behavior: cli.behavior,
            repository: cli.repository,
            from_branch: cli.from_branch,
            commit_id: cli.commit_id,
            ostrich_branch: cli.ostrich_branch,
            log_level: cli.log_level,
            port: cli.port,
        })
    }
}

fn require_nonempty(value: &str, name: &'static str) -> Result<(), OstrichError> {
    if value.is_empty() {
        return Err(OstrichError::ArgMissing { name });
    }
    Ok(())
}
