//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    config::{CheckoutConfig, DatabaseConfig},
    database::{self, Db},
    domain::{
        carts::{CartsService, PgCartsService},
        orders::{OrdersService, PgOrdersService},
        products::{PgProductsService, ProductsService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub db: Db,
    pub products: Arc<dyn ProductsService>,
    pub carts: Arc<dyn CartsService>,
    pub orders: Arc<dyn OrdersService>,
}

impl AppContext {
    /// Wire the services over an existing database handle.
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            products: Arc::new(PgProductsService::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(db.clone())),
            db,
        }
    }

    /// Build application context from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn connect(
        database: &DatabaseConfig,
        checkout: &CheckoutConfig,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(&database.database_url, database.max_connections)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool).with_lock_timeout(checkout.lock_timeout());

        Ok(Self::new(db))
    }
}
