//! Test context for service-level integration tests.

use std::time::Duration;

use crate::{
    database::Db,
    domain::{
        carts::{
            CartsService, CartsServiceError, PgCartsService,
            data::NewCartItem,
            records::{CartItemRecord, CartItemUuid, Variant},
        },
        orders::{
            OrdersService, OrdersServiceError, PgOrdersService, data::NewOrder,
            records::{OrderRecord, OrderUuid},
        },
        products::{
            PgProductsService, ProductsService,
            data::NewProduct,
            records::{ProductRecord, ProductUuid},
        },
        users::UserUuid,
    },
};

use super::db::TestDb;

pub(crate) struct TestContext {
    pub db: TestDb,
    pub products: PgProductsService,
    pub carts: PgCartsService,
    pub orders: PgOrdersService,
}

impl TestContext {
    pub(crate) async fn new() -> Self {
        let test_db = TestDb::new().await;
        let db = Db::new(test_db.pool().clone());

        Self {
            products: PgProductsService::new(db.clone()),
            carts: PgCartsService::new(db.clone()),
            orders: PgOrdersService::new(db),
            db: test_db,
        }
    }

    /// Create a live product with a fresh UUID.
    pub(crate) async fn create_product(&self, price: u64, stock: u32) -> ProductRecord {
        self.products
            .create_product(NewProduct {
                uuid: ProductUuid::new(),
                price,
                stock,
            })
            .await
            .expect("Failed to create test product")
    }

    /// An orders service whose transactions give up waiting on row locks after `timeout`.
    pub(crate) fn orders_with_lock_timeout(&self, timeout: Duration) -> PgOrdersService {
        PgOrdersService::new(Db::new(self.db.pool().clone()).with_lock_timeout(Some(timeout)))
    }

    /// Row count of one of the schema's tables.
    pub(crate) async fn count_rows(&self, table: &'static str) -> Result<i64, sqlx::Error> {
        let sql = format!("SELECT COUNT(*) FROM {table}");

        sqlx::query_scalar(&sql)
            .fetch_one(self.db.pool())
            .await
    }

    pub(crate) async fn add_to_cart(
        &self,
        user: UserUuid,
        product: ProductUuid,
        quantity: u32,
        variant: Variant,
    ) -> Result<CartItemRecord, CartsServiceError> {
        self.carts
            .add_item(
                user,
                NewCartItem {
                    uuid: CartItemUuid::new(),
                    product_uuid: product,
                    quantity,
                    variant,
                },
            )
            .await
    }

    /// Check out the user's cart with placeholder payment and delivery details.
    pub(crate) async fn place_order(&self, user: UserUuid) -> Result<OrderRecord, OrdersServiceError> {
        self.orders
            .place_order(
                user,
                NewOrder {
                    uuid: OrderUuid::new(),
                    payment_method: "card".to_string(),
                    delivery_address: "1 Main St".to_string(),
                },
            )
            .await
    }
}
