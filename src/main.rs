use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pulpo", about = "Inventory and task dashboard for El Pulpo Negro")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server (default)
    Hub,

    /// Show the resolved configuration
    Doctor,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Doctor) => pulpo_hub::doctor::run(),
        Some(Commands::Hub) | None => pulpo_hub::run_hub().await,
    }
}
