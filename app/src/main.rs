#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

mod command;
mod presenter;

use clap::{Args, Parser, Subcommand};
use command::{
    AddStrategy, CommandStrategy, InfoStrategy, InitStrategy, ListStrategy, PageTarget,
    PatternInput, RemoveStrategy, ScanInput, ScanStrategy, VersionStrategy,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rxscan")]
#[command(about = "Scan a page and its scripts against saved regex patterns", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct ScriptArgs {
    /// Extra script URL to scan (repeatable)
    #[arg(short = 's', long = "script")]
    scripts: Vec<String>,

    /// Do not discover <script src> references on the page
    #[arg(long)]
    no_discover: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a page with the saved patterns
    Scan {
        /// Primary document URL
        url: String,

        #[command(flatten)]
        args: ScriptArgs,
    },
    /// Save a pattern, then rescan if a URL is given
    Add {
        /// Regular expression (matched case-insensitively)
        #[arg(allow_hyphen_values = true)]
        pattern: String,

        /// Page to rescan after saving
        #[arg(short = 'u', long)]
        url: Option<String>,

        #[command(flatten)]
        args: ScriptArgs,
    },
    /// Remove the first matching saved pattern, then rescan if a URL is given
    Remove {
        /// Exact pattern string to remove
        #[arg(allow_hyphen_values = true)]
        pattern: String,

        /// Page to rescan after removing
        #[arg(short = 'u', long)]
        url: Option<String>,

        #[command(flatten)]
        args: ScriptArgs,
    },
    /// List saved patterns
    List,
    /// Initialize configuration
    Init,
    /// Show configuration
    Info,
    /// Show version
    Version,
}

fn page_target(url: String, args: &ScriptArgs) -> PageTarget {
    PageTarget {
        url,
        scripts: args.scripts.clone(),
        no_discover: args.no_discover,
    }
}

fn pattern_input(pattern: String, url: Option<String>, args: &ScriptArgs) -> PatternInput {
    PatternInput {
        pattern,
        target: url.map(|url| page_target(url, args)),
        json: args.json,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan { url, args } => {
            ScanStrategy
                .execute(ScanInput {
                    target: page_target(url, &args),
                    json: args.json,
                })
                .await
        }
        Commands::Add { pattern, url, args } => {
            AddStrategy.execute(pattern_input(pattern, url, &args)).await
        }
        Commands::Remove { pattern, url, args } => {
            RemoveStrategy
                .execute(pattern_input(pattern, url, &args))
                .await
        }
        Commands::List => ListStrategy.execute(()).await,
        Commands::Init => InitStrategy.execute(()).await,
        Commands::Info => InfoStrategy.execute(()).await,
        Commands::Version => VersionStrategy.execute(()).await,
    }
}
