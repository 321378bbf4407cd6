use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "swrr",
    about = "Weighted candidate selection — config checks and pick simulation",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and validate a balancer config
    Check {
        /// Path to balancer.toml
        #[arg(short, long, default_value = "balancer.toml")]
        config: String,
    },
    /// Build the configured balancer and run a series of picks.
    ///
    /// Defaults to one full round, i.e. as many picks as the total weight.
    Simulate {
        /// Path to balancer.toml
        #[arg(short, long, default_value = "balancer.toml")]
        config: String,
        /// Number of picks to run
        #[arg(short, long)]
        picks: Option<usize>,
        /// Emit the result as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,swrr=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { config } => commands::check::check(&config),
        Commands::Simulate {
            config,
            picks,
            json,
        } => commands::simulate::simulate(&config, picks, json),
    }
}
