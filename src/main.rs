use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use freshet::app::AppContext;
use freshet::cli::{commands, Cli, Commands};
use freshet::config::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;
    let ctx = AppContext::new(settings)?;

    match cli.command {
        Commands::Run => {
            commands::run(&ctx).await?;
        }
        Commands::Add { channel_id, url } => {
            commands::add_feed(&ctx, &channel_id, &url).await?;
        }
        Commands::Remove {
            channel_id,
            identifier,
        } => {
            commands::remove_feed(&ctx, &channel_id, &identifier)?;
        }
        Commands::List { channel_id } => {
            commands::list_feeds(&ctx, &channel_id)?;
        }
    }

    Ok(())
}
