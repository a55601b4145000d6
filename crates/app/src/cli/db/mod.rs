use clap::{Args, Subcommand};
use market_app::{context::AppContext, database};
use tracing::info;

#[derive(Debug, Args)]
pub(crate) struct DbCommand {
    #[command(subcommand)]
    command: DbSubcommand,
}

#[derive(Debug, Subcommand)]
enum DbSubcommand {
    /// Apply pending schema migrations
    Migrate,
}

pub(crate) async fn run(ctx: &AppContext, command: DbCommand) -> Result<(), String> {
    match command.command {
        DbSubcommand::Migrate => {
            database::migrate(ctx.db.pool())
                .await
                .map_err(|error| format!("failed to apply migrations: {error}"))?;

            info!("migrations applied");
            println!("migrations applied");

            Ok(())
        }
    }
}
