use clap::Args;
use market_app::{context::AppContext, domain::products::records::ProductUuid};
use uuid::Uuid;

use crate::cli::print_json;

#[derive(Debug, Args)]
pub(crate) struct ProductArgs {
    /// Product UUID
    #[arg(long)]
    product_uuid: Uuid,
}

#[derive(Debug, Args)]
pub(crate) struct RestockArgs {
    /// Product UUID
    #[arg(long)]
    product_uuid: Uuid,

    /// Units to add
    #[arg(long)]
    quantity: u32,
}

#[derive(Debug, Args)]
pub(crate) struct SetPriceArgs {
    /// Product UUID
    #[arg(long)]
    product_uuid: Uuid,

    /// New unit price in minor currency units
    #[arg(long)]
    price: u64,
}

pub(crate) async fn show(ctx: &AppContext, args: ProductArgs) -> Result<(), String> {
    let product = ctx
        .products
        .get_product(ProductUuid::from_uuid(args.product_uuid))
        .await
        .map_err(|error| format!("failed to load product: {error}"))?;

    print_json(&product)
}

pub(crate) async fn restock(ctx: &AppContext, args: RestockArgs) -> Result<(), String> {
    let product = ctx
        .products
        .restock(ProductUuid::from_uuid(args.product_uuid), args.quantity)
        .await
        .map_err(|error| format!("failed to restock product: {error}"))?;

    print_json(&product)
}

pub(crate) async fn set_price(ctx: &AppContext, args: SetPriceArgs) -> Result<(), String> {
    let product = ctx
        .products
        .update_price(ProductUuid::from_uuid(args.product_uuid), args.price)
        .await
        .map_err(|error| format!("failed to update price: {error}"))?;

    print_json(&product)
}

pub(crate) async fn delete(ctx: &AppContext, args: ProductArgs) -> Result<(), String> {
    ctx.products
        .delete_product(ProductUuid::from_uuid(args.product_uuid))
        .await
        .map_err(|error| format!("failed to delete product: {error}"))?;

    println!("deleted product {}", args.product_uuid);

    Ok(())
}
