use clap::{Parser, Subcommand};
use market_app::{
    config::{CheckoutConfig, DatabaseConfig, LoggingConfig},
    context::AppContext,
};
use serde::Serialize;

mod cart;
mod db;
mod order;
mod product;

#[derive(Debug, Parser)]
#[command(name = "market-app", about = "Marketplace checkout CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    logging: LoggingConfig,

    #[command(flatten)]
    database: DatabaseConfig,

    #[command(flatten)]
    checkout: CheckoutConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
    Product(product::ProductCommand),
    Cart(cart::CartCommand),
    Order(order::OrderCommand),
}

impl Cli {
    pub(crate) fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    pub(crate) async fn run(self) -> Result<(), String> {
        let ctx = AppContext::connect(&self.database, &self.checkout)
            .await
            .map_err(|error| format!("{error}: {}", error_source(&error)))?;

        match self.command {
            Commands::Db(command) => db::run(&ctx, command).await,
            Commands::Product(command) => product::run(&ctx, command).await,
            Commands::Cart(command) => cart::run(&ctx, command).await,
            Commands::Order(command) => order::run(&ctx, command).await,
        }
    }
}

fn error_source(error: &dyn std::error::Error) -> String {
    error
        .source()
        .map_or_else(|| "no further detail".to_string(), ToString::to_string)
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|error| format!("failed to render output: {error}"))?;

    println!("{json}");

    Ok(())
}
