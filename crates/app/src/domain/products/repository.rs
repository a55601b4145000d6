//! Products Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use tracing::debug;
use uuid::Uuid;

use crate::{
    database::{encode_amount, encode_count, try_get_amount, try_get_count},
    domain::products::{
        data::NewProduct,
        records::{LockedProductRecord, ProductRecord, ProductUuid},
    },
};

const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const UPDATE_PRODUCT_PRICE_SQL: &str = include_str!("sql/update_product_price.sql");
const RESTOCK_PRODUCT_SQL: &str = include_str!("sql/restock_product.sql");
const DELETE_PRODUCT_SQL: &str = include_str!("sql/delete_product.sql");
const LOCK_PRODUCTS_SQL: &str = include_str!("sql/lock_products.sql");
const DECREMENT_STOCK_SQL: &str = include_str!("sql/decrement_stock.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: NewProduct,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(CREATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(encode_amount(product.price)?)
            .bind(encode_count(product.stock)?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_price(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        price: u64,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(UPDATE_PRODUCT_PRICE_SQL)
            .bind(product.into_uuid())
            .bind(encode_amount(price)?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn restock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(RESTOCK_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(encode_count(quantity)?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Take exclusive row locks on the given live products.
    ///
    /// `products` must already be sorted ascending and de-duplicated; the query
    /// locks in the same order. Missing or soft-deleted products are simply absent
    /// from the result.
    #[tracing::instrument(
        name = "products.repository.lock_products",
        skip(self, tx, products),
        fields(requested_count = products.len(), locked_count = tracing::field::Empty),
        err
    )]
    pub(crate) async fn lock_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        products: &[ProductUuid],
    ) -> Result<Vec<LockedProductRecord>, sqlx::Error> {
        let uuids: Vec<Uuid> = products.iter().copied().map(Into::into).collect();

        let locked = query_as::<Postgres, LockedProductRecord>(LOCK_PRODUCTS_SQL)
            .bind(&uuids)
            .fetch_all(&mut **tx)
            .await?;

        let locked_count = locked.len();

        tracing::Span::current().record("locked_count", locked_count);

        debug!(locked_count, "locked products");

        Ok(locked)
    }

    /// Conditionally remove `quantity` units of stock, returning the number of rows
    /// updated (zero when the stock no longer covers the quantity).
    pub(crate) async fn decrement_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DECREMENT_STOCK_SQL)
            .bind(product.into_uuid())
            .bind(encode_count(quantity)?)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            price: try_get_amount(row, "price")?,
            stock: try_get_count(row, "stock")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for LockedProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            price: try_get_amount(row, "price")?,
            stock: try_get_count(row, "stock")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestDb;

    use super::*;

    async fn insert(
        repository: &PgProductsRepository,
        tx: &mut Transaction<'_, Postgres>,
        stock: u32,
    ) -> Result<ProductUuid, sqlx::Error> {
        let product = repository
            .create_product(
                tx,
                NewProduct {
                    uuid: ProductUuid::new(),
                    price: 10_00,
                    stock,
                },
            )
            .await?;

        Ok(product.uuid)
    }

    #[tokio::test]
    async fn lock_products_returns_live_rows_in_ascending_order() -> TestResult {
        let db = TestDb::new().await;
        let repository = PgProductsRepository::new();
        let mut tx = db.begin_test_transaction().await;

        let a = insert(&repository, &mut tx, 1).await?;
        let b = insert(&repository, &mut tx, 1).await?;
        let deleted = insert(&repository, &mut tx, 1).await?;

        repository.delete_product(&mut tx, deleted).await?;

        let mut requested = vec![b, deleted, a, ProductUuid::new()];
        requested.sort_unstable();

        let locked = repository.lock_products(&mut tx, &requested).await?;
        let uuids: Vec<ProductUuid> = locked.iter().map(|product| product.uuid).collect();

        let mut expected = vec![a, b];
        expected.sort_unstable();

        assert_eq!(uuids, expected);

        Ok(())
    }

    #[tokio::test]
    async fn decrement_stock_never_goes_negative() -> TestResult {
        let db = TestDb::new().await;
        let repository = PgProductsRepository::new();
        let mut tx = db.begin_test_transaction().await;

        let product = insert(&repository, &mut tx, 2).await?;

        assert_eq!(repository.decrement_stock(&mut tx, product, 3).await?, 0);
        assert_eq!(repository.decrement_stock(&mut tx, product, 2).await?, 1);
        assert_eq!(repository.get_product(&mut tx, product).await?.stock, 0);

        Ok(())
    }
}
