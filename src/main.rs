//! Fixflow CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fixflow::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init(args) => fixflow::cli::commands::init::execute(args, cli.json).await,
        Commands::Auth(args) => fixflow::cli::commands::auth::execute(args, cli.json).await,
        Commands::Sync(args) => fixflow::cli::commands::sync::execute(args, cli.json).await,
        Commands::Issues(args) => fixflow::cli::commands::issues::execute(args, cli.json).await,
        Commands::Fix(args) => fixflow::cli::commands::fix::execute(args, cli.json).await,
    };

    if let Err(err) = result {
        fixflow::cli::handle_error(err, cli.json);
    }
}
