use clap::Args;
use market_app::{
    context::AppContext,
    domain::products::{data::NewProduct, records::ProductUuid},
};
use uuid::Uuid;

use crate::cli::print_json;

#[derive(Debug, Args)]
pub(crate) struct CreateProductArgs {
    /// Unit price in minor currency units
    #[arg(long)]
    price: u64,

    /// Opening stock
    #[arg(long, default_value_t = 0)]
    stock: u32,

    /// Optional product UUID; generated when omitted
    #[arg(long)]
    product_uuid: Option<Uuid>,
}

pub(crate) async fn run(ctx: &AppContext, args: CreateProductArgs) -> Result<(), String> {
    let uuid = args
        .product_uuid
        .map_or_else(ProductUuid::new, ProductUuid::from_uuid);

    let product = ctx
        .products
        .create_product(NewProduct {
            uuid,
            price: args.price,
            stock: args.stock,
        })
        .await
        .map_err(|error| format!("failed to create product: {error}"))?;

    print_json(&product)
}
