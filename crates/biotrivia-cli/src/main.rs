//! The biotrivia command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "biotrivia", version, about = "Biography trivia quiz")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play an interactive run
    Play {
        /// Seed for target selection (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Pool TOML file
        #[arg(long)]
        pools: Option<PathBuf>,

        /// Use built-in sample articles instead of the network
        #[arg(long)]
        offline: bool,

        /// Do not save the run summary
        #[arg(long)]
        no_save: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Fetch and print the hint tiers for a target
    Hints {
        /// Target name (e.g. "Marie Curie")
        target: String,

        /// Print only this tier: minimal, medium, full
        #[arg(long)]
        tier: Option<String>,

        /// Fetch lead-section wikitext instead of rendered HTML
        #[arg(long)]
        legacy: bool,

        /// Use built-in sample articles instead of the network
        #[arg(long)]
        offline: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check whether a guess names a target
    Check {
        /// The guess
        guess: String,

        /// The target name
        target: String,
    },

    /// Normalize markup from a file (or stdin) to plain text
    Normalize {
        /// Markup file; reads stdin when omitted
        file: Option<PathBuf>,

        /// Treat input as legacy wikitext
        #[arg(long)]
        legacy: bool,
    },

    /// Split rendered markup from a file (or stdin) into sections
    Sections {
        /// Markup file; reads stdin when omitted
        file: Option<PathBuf>,
    },

    /// Validate a pool TOML file
    Validate {
        /// Pool file; validates the built-in pools when omitted
        #[arg(long)]
        pools: Option<PathBuf>,
    },

    /// Show a saved run, or statistics across a directory of runs
    Summary {
        /// Saved run JSON
        #[arg(long, conflicts_with = "dir")]
        file: Option<PathBuf>,

        /// Directory of saved runs
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Create starter config and pool file
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("biotrivia=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            seed,
            pools,
            offline,
            no_save,
            config,
        } => commands::play::execute(seed, pools, offline, no_save, config).await,
        Commands::Hints {
            target,
            tier,
            legacy,
            offline,
            config,
        } => commands::hints::execute(target, tier, legacy, offline, config).await,
        Commands::Check { guess, target } => commands::check::execute(guess, target),
        Commands::Normalize { file, legacy } => commands::normalize::execute(file, legacy),
        Commands::Sections { file } => commands::normalize::execute_sections(file),
        Commands::Validate { pools } => commands::validate::execute(pools),
        Commands::Summary { file, dir, format } => commands::summary::execute(file, dir, format),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
