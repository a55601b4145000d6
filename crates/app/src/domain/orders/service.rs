//! Orders service.

use async_trait::async_trait;
use mockall::automock;
use tracing::{error, info, warn};

use crate::{
    database::Db,
    domain::{
        carts::repository::PgCartItemsRepository,
        orders::{
            checkout::{self, CheckoutPlan},
            data::{NewOrder, Page},
            errors::OrdersServiceError,
            records::{OrderPage, OrderRecord, OrderUuid},
            repository::PgOrdersRepository,
        },
        products::repository::PgProductsRepository,
        users::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    cart_items: PgCartItemsRepository,
    products: PgProductsRepository,
    orders: PgOrdersRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            cart_items: PgCartItemsRepository::new(),
            products: PgProductsRepository::new(),
            orders: PgOrdersRepository::new(),
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.place_order",
        skip(self, order),
        fields(
            user_uuid = %user,
            order_uuid = %order.uuid,
            line_count = tracing::field::Empty,
            product_count = tracing::field::Empty,
            total_amount = tracing::field::Empty
        ),
        err
    )]
    async fn place_order(
        &self,
        user: UserUuid,
        order: NewOrder,
    ) -> Result<OrderRecord, OrdersServiceError> {
        if !order.has_required_data() {
            return Err(OrdersServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin_transaction().await?;

        let lines = self.cart_items.get_lines_with_pricing(&mut tx, user).await?;

        if lines.is_empty() {
            warn!("checkout attempted with empty cart");

            return Err(OrdersServiceError::EmptyCart);
        }

        let lock_order = checkout::lock_order(&lines);

        let span = tracing::Span::current();
        span.record("line_count", lines.len());
        span.record("product_count", lock_order.len());

        let locked = self.products.lock_products(&mut tx, &lock_order).await?;

        let CheckoutPlan {
            lines,
            total_amount,
            deductions,
        } = checkout::plan_checkout(lines, &locked).inspect_err(|error| {
            warn!(%error, "checkout validation failed");
        })?;

        span.record("total_amount", total_amount);

        let mut created = self
            .orders
            .create_order(&mut tx, user, &order, total_amount)
            .await?;

        created.items = self
            .orders
            .create_order_items(&mut tx, created.uuid, lines)
            .await?;

        for deduction in deductions {
            let rows_affected = self
                .products
                .decrement_stock(&mut tx, deduction.product_uuid, deduction.quantity)
                .await?;

            if rows_affected != 1 {
                error!(
                    product_uuid = %deduction.product_uuid,
                    quantity = deduction.quantity,
                    rows_affected,
                    "stock decrement affected an unexpected number of rows"
                );

                return Err(OrdersServiceError::StockInvariantViolated {
                    product: deduction.product_uuid,
                    requested: deduction.quantity,
                });
            }
        }

        self.cart_items.clear_cart(&mut tx, user).await?;

        tx.commit().await?;

        info!(
            order_uuid = %created.uuid,
            total_amount = created.total_amount,
            item_count = created.items.len(),
            "placed order"
        );

        Ok(created)
    }

    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let order = self.orders.get_order(&mut tx, user, order).await?;

        tx.commit().await?;

        Ok(order)
    }

    async fn list_orders(
        &self,
        user: UserUuid,
        page: Page,
    ) -> Result<OrderPage, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let total = self.orders.count_orders(&mut tx, user).await?;
        let orders = self.orders.list_orders(&mut tx, user, page).await?;

        tx.commit().await?;

        Ok(OrderPage {
            orders,
            total,
            limit: page.limit(),
            offset: page.offset(),
        })
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Convert the user's entire cart into an order.
    ///
    /// Either everything happens (order and items written, stock decremented, cart
    /// cleared) or nothing does. Dropping the returned future before it completes
    /// rolls the transaction back.
    async fn place_order(
        &self,
        user: UserUuid,
        order: NewOrder,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Retrieve one of the user's orders with its items.
    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// List the user's orders, newest first, with the total count for paging.
    async fn list_orders(
        &self,
        user: UserUuid,
        page: Page,
    ) -> Result<OrderPage, OrdersServiceError>;
}
