use clap::{Args, Subcommand};
use market_app::context::AppContext;

mod create;
mod manage;

#[derive(Debug, Args)]
pub(crate) struct ProductCommand {
    #[command(subcommand)]
    command: ProductSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductSubcommand {
    /// Create a product with a price and opening stock
    Create(create::CreateProductArgs),
    /// Show a live product
    Show(manage::ProductArgs),
    /// Add units to a product's stock
    Restock(manage::RestockArgs),
    /// Change a product's price
    SetPrice(manage::SetPriceArgs),
    /// Soft-delete a product
    Delete(manage::ProductArgs),
}

pub(crate) async fn run(ctx: &AppContext, command: ProductCommand) -> Result<(), String> {
    match command.command {
        ProductSubcommand::Create(args) => create::run(ctx, args).await,
        ProductSubcommand::Show(args) => manage::show(ctx, args).await,
        ProductSubcommand::Restock(args) => manage::restock(ctx, args).await,
        ProductSubcommand::SetPrice(args) => manage::set_price(ctx, args).await,
        ProductSubcommand::Delete(args) => manage::delete(ctx, args).await,
    }
}
