use clap::{Args, Subcommand};
use market_app::{
    context::AppContext,
    domain::{
        orders::{
            OrdersServiceError,
            data::{NewOrder, Page},
            records::OrderUuid,
        },
        users::UserUuid,
    },
};
use tracing::error;
use uuid::Uuid;

use crate::cli::print_json;

#[derive(Debug, Args)]
pub(crate) struct OrderCommand {
    #[command(subcommand)]
    command: OrderSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrderSubcommand {
    /// Check out a user's entire cart
    Place(PlaceOrderArgs),
    /// Show one of a user's orders
    Show(ShowOrderArgs),
    /// List a user's orders, newest first
    List(ListOrdersArgs),
}

#[derive(Debug, Args)]
struct PlaceOrderArgs {
    /// User UUID
    #[arg(long)]
    user_uuid: Uuid,

    /// Payment method label, e.g. "card"
    #[arg(long)]
    payment_method: String,

    /// Delivery address
    #[arg(long)]
    delivery_address: String,

    /// Optional order UUID; generated when omitted
    #[arg(long)]
    order_uuid: Option<Uuid>,
}

#[derive(Debug, Args)]
struct ShowOrderArgs {
    /// User UUID
    #[arg(long)]
    user_uuid: Uuid,

    /// Order UUID
    #[arg(long)]
    order_uuid: Uuid,
}

#[derive(Debug, Args)]
struct ListOrdersArgs {
    /// User UUID
    #[arg(long)]
    user_uuid: Uuid,

    /// Page size (1-100)
    #[arg(long, default_value_t = 20)]
    limit: u32,

    /// Orders to skip
    #[arg(long, default_value_t = 0)]
    offset: u32,
}

pub(crate) async fn run(ctx: &AppContext, command: OrderCommand) -> Result<(), String> {
    match command.command {
        OrderSubcommand::Place(args) => {
            let order = ctx
                .orders
                .place_order(
                    UserUuid::from_uuid(args.user_uuid),
                    NewOrder {
                        uuid: args
                            .order_uuid
                            .map_or_else(OrderUuid::new, OrderUuid::from_uuid),
                        payment_method: args.payment_method,
                        delivery_address: args.delivery_address,
                    },
                )
                .await
                .map_err(|error| describe("failed to place order", &error))?;

            print_json(&order)
        }
        OrderSubcommand::Show(args) => {
            let order = ctx
                .orders
                .get_order(
                    UserUuid::from_uuid(args.user_uuid),
                    OrderUuid::from_uuid(args.order_uuid),
                )
                .await
                .map_err(|error| describe("failed to load order", &error))?;

            print_json(&order)
        }
        OrderSubcommand::List(args) => {
            let page = ctx
                .orders
                .list_orders(
                    UserUuid::from_uuid(args.user_uuid),
                    Page::new(args.limit, args.offset),
                )
                .await
                .map_err(|error| describe("failed to list orders", &error))?;

            print_json(&page)
        }
    }
}

/// Internal failures are logged in full and reported without detail.
fn describe(action: &str, error: &OrdersServiceError) -> String {
    if error.is_internal() {
        error!(?error, "{action}");

        return format!("{action}: internal error");
    }

    format!("{action}: {error}")
}
