use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use courtside::app::AppContext;
use courtside::cli::{commands, Cli, Commands};
use courtside::config::Config;
use courtside::poller::PollConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if let Commands::Watch {
        interval,
        iterations,
        ..
    } = &cli.command
    {
        if let Some(interval) = interval {
            let interval = PollConfig::parse_interval(interval).map_err(anyhow::Error::msg)?;
            config.poll.interval_ms = interval.as_millis() as u64;
        }
        if iterations.is_some() {
            config.poll.max_iterations = *iterations;
        }
    }

    let ctx = AppContext::new(cli.db, config)?;

    match cli.command {
        Commands::Watch { games, fresh, .. } => {
            commands::watch(&ctx, &games, fresh).await?;
        }
        Commands::Snapshot { games, json } => {
            commands::snapshot(&ctx, &games, json).await?;
        }
        Commands::Show { game, json } => {
            commands::show(&ctx, &game, json)?;
        }
        Commands::List => {
            commands::list_games(&ctx)?;
        }
        Commands::Remove { game } => {
            commands::remove_game(&ctx, &game)?;
        }
        Commands::Parse { file, kind } => {
            commands::parse_file(&ctx, &file, kind.as_deref())?;
        }
    }

    Ok(())
}
