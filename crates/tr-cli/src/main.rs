use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};

use tr_config::TrendsConfig;
use tr_runtime::Mode;
use tr_runtime::tracing_init::init_tracing;

mod cmd_explain;
mod cmd_replay;

#[derive(Parser)]
#[command(name = "trends", about = "Trend detection query tools")]
struct Cli {
    /// Path to trends.toml; built-in defaults apply when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Plain,
    Stats,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Plain => Mode::Plain,
            ModeArg::Stats => Mode::Stats,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show the compiled columns and rewritten filter for a trend request
    Explain {
        /// Trend function, e.g. "p95()" or "user_misery(300)"
        #[arg(short, long)]
        trend_function: Option<String>,

        /// Range start, RFC 3339
        #[arg(long)]
        start: DateTime<Utc>,

        /// Range end, RFC 3339
        #[arg(long)]
        end: DateTime<Utc>,

        /// Pass-through columns
        #[arg(short, long)]
        field: Vec<String>,

        /// Filter expression
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Run a JSON request against a JSON engine fixture
    Replay {
        /// Request file (camelCase TrendsRequest JSON)
        #[arg(short, long)]
        request: PathBuf,

        /// Engine fixture file
        #[arg(long)]
        fixture: PathBuf,

        #[arg(short, long, value_enum, default_value = "plain")]
        mode: ModeArg,

        /// Also print the recorded engine calls
        #[arg(long)]
        calls: bool,
    },
}

/// Load the config and the directory relative paths in it resolve against.
fn load_config(path: Option<&Path>) -> Result<(TrendsConfig, PathBuf)> {
    match path {
        Some(path) => {
            let path = path
                .canonicalize()
                .map_err(|e| anyhow::anyhow!("config path '{}': {e}", path.display()))?;
            let config = TrendsConfig::load(&path)?;
            let base_dir = path
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| anyhow::anyhow!("config path has no parent directory"))?;
            Ok((config, base_dir))
        }
        None => Ok((TrendsConfig::default(), std::env::current_dir()?)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (config, base_dir) = load_config(cli.config.as_deref())?;
    let _guard = init_tracing(&config.logging, &base_dir)?;

    match cli.command {
        Commands::Explain {
            trend_function,
            start,
            end,
            field,
            query,
        } => {
            cmd_explain::run(&config, trend_function, start, end, field, query)?;
        }

        Commands::Replay {
            request,
            fixture,
            mode,
            calls,
        } => {
            cmd_replay::run(&config, &request, &fixture, mode.into(), calls).await?;
        }
    }

    Ok(())
}
