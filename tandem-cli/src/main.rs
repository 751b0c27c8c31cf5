//! Tandem CLI - drive the agent teams from the command line

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tandem_core::prelude::*;

#[derive(Parser)]
#[command(name = "tandem")]
#[command(about = "Multi-agent code analysis and debugging teams", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to tandem.toml + TANDEM_* env vars)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a codebase, optionally alongside a debug pass over an error
    Analyze {
        /// Path to analyze
        path: PathBuf,
        /// Error message to hand to the debug team
        #[arg(long)]
        error_message: Option<String>,
        /// Stack trace accompanying the error
        #[arg(long, requires = "error_message")]
        traceback: Option<String>,
        /// Code context accompanying the error
        #[arg(long, requires = "error_message")]
        context: Option<String>,
    },
    /// Research and validate a solution for a problem
    Solve {
        /// Problem description
        problem: String,
    },
    /// Design and validate a test plan for a feature
    TestPlan {
        /// Feature description
        feature: String,
    },
    /// Version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if matches!(cli.command, Commands::Version) {
        println!("tandem {}", env!("CARGO_PKG_VERSION"));
        println!("tandem-core {}", tandem_core::VERSION);
        return Ok(());
    }

    let config = match cli.config {
        Some(path) => TandemConfig::from_file(path)?,
        None => TandemConfig::load()?,
    };
    let manager = TeamManager::from_config(&config)?;

    match cli.command {
        Commands::Analyze {
            path,
            error_message,
            traceback,
            context,
        } => {
            let error_info = error_message.map(|message| {
                let mut info = ErrorInfo::new(message);
                if let Some(traceback) = traceback {
                    info = info.with_traceback(traceback);
                }
                if let Some(context) = context {
                    info = info.with_context(context);
                }
                info
            });

            let results = manager.analyze_and_improve(&path, error_info.as_ref()).await;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Commands::Solve { problem } => {
            let results = manager.solve_problem(&problem).await?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Commands::TestPlan { feature } => {
            let results = manager.improve_test_coverage(&feature).await?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Commands::Version => unreachable!(),
    }

    Ok(())
}
