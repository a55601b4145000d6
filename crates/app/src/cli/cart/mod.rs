use clap::{Args, Subcommand};
use market_app::{
    context::AppContext,
    domain::{
        carts::{
            data::NewCartItem,
            records::{CartItemUuid, Variant},
        },
        products::records::ProductUuid,
        users::UserUuid,
    },
};
use uuid::Uuid;

use crate::cli::print_json;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Add a product to a user's cart, merging with a matching line
    Add(AddItemArgs),
    /// Show a user's cart with current prices
    Show(UserArgs),
    /// Set the quantity on a cart line
    SetQuantity(SetQuantityArgs),
    /// Remove a line from a user's cart
    Remove(RemoveItemArgs),
    /// Remove every line from a user's cart
    Clear(UserArgs),
}

#[derive(Debug, Args)]
struct UserArgs {
    /// User UUID
    #[arg(long)]
    user_uuid: Uuid,
}

#[derive(Debug, Args)]
struct AddItemArgs {
    /// User UUID
    #[arg(long)]
    user_uuid: Uuid,

    /// Product UUID
    #[arg(long)]
    product_uuid: Uuid,

    /// Units to add
    #[arg(long, default_value_t = 1)]
    quantity: u32,

    /// Size variant
    #[arg(long, default_value = "")]
    size: String,

    /// Color variant
    #[arg(long, default_value = "")]
    color: String,
}

#[derive(Debug, Args)]
struct SetQuantityArgs {
    /// User UUID
    #[arg(long)]
    user_uuid: Uuid,

    /// Cart item UUID
    #[arg(long)]
    item_uuid: Uuid,

    /// Replacement quantity
    #[arg(long)]
    quantity: u32,
}

#[derive(Debug, Args)]
struct RemoveItemArgs {
    /// User UUID
    #[arg(long)]
    user_uuid: Uuid,

    /// Cart item UUID
    #[arg(long)]
    item_uuid: Uuid,
}

pub(crate) async fn run(ctx: &AppContext, command: CartCommand) -> Result<(), String> {
    match command.command {
        CartSubcommand::Add(args) => {
            let item = ctx
                .carts
                .add_item(
                    UserUuid::from_uuid(args.user_uuid),
                    NewCartItem {
                        uuid: CartItemUuid::new(),
                        product_uuid: ProductUuid::from_uuid(args.product_uuid),
                        quantity: args.quantity,
                        variant: Variant::new(args.size, args.color),
                    },
                )
                .await
                .map_err(|error| format!("failed to add item: {error}"))?;

            print_json(&item)
        }
        CartSubcommand::Show(args) => {
            let cart = ctx
                .carts
                .get_cart(UserUuid::from_uuid(args.user_uuid))
                .await
                .map_err(|error| format!("failed to load cart: {error}"))?;

            print_json(&cart)
        }
        CartSubcommand::SetQuantity(args) => {
            let item = ctx
                .carts
                .update_item_quantity(
                    UserUuid::from_uuid(args.user_uuid),
                    CartItemUuid::from_uuid(args.item_uuid),
                    args.quantity,
                )
                .await
                .map_err(|error| format!("failed to update item: {error}"))?;

            print_json(&item)
        }
        CartSubcommand::Remove(args) => {
            ctx.carts
                .remove_item(
                    UserUuid::from_uuid(args.user_uuid),
                    CartItemUuid::from_uuid(args.item_uuid),
                )
                .await
                .map_err(|error| format!("failed to remove item: {error}"))?;

            println!("removed item {}", args.item_uuid);

            Ok(())
        }
        CartSubcommand::Clear(args) => {
            let cleared = ctx
                .carts
                .clear_cart(UserUuid::from_uuid(args.user_uuid))
                .await
                .map_err(|error| format!("failed to clear cart: {error}"))?;

            println!("removed {cleared} item(s)");

            Ok(())
        }
    }
}
