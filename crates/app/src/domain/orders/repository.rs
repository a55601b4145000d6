//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rustc_hash::FxHashMap;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    database::{encode_amount, encode_count, try_get_amount, try_get_count},
    domain::{
        carts::records::Variant,
        orders::{
            checkout::PlannedLine,
            data::{NewOrder, Page},
            records::{OrderItemRecord, OrderItemUuid, OrderRecord, OrderUuid},
        },
        products::records::ProductUuid,
        users::UserUuid,
    },
};

const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const CREATE_ORDER_ITEMS_SQL: &str = include_str!("sql/create_order_items.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const LIST_ORDER_ITEMS_SQL: &str = include_str!("sql/list_order_items.sql");
const COUNT_ORDERS_SQL: &str = include_str!("sql/count_orders.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Insert the order header. The returned record has no items yet.
    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        order: &NewOrder,
        total_amount: u64,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(user.into_uuid())
            .bind(encode_amount(total_amount)?)
            .bind(&order.payment_method)
            .bind(&order.delivery_address)
            .fetch_one(&mut **tx)
            .await
    }

    /// Insert every line of an order in one statement.
    #[tracing::instrument(
        name = "orders.repository.create_order_items",
        skip(self, tx, lines),
        fields(order_uuid = %order, item_count = lines.len()),
        err
    )]
    pub(crate) async fn create_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        lines: Vec<PlannedLine>,
    ) -> Result<Vec<OrderItemRecord>, sqlx::Error> {
        let mut uuids: Vec<Uuid> = Vec::with_capacity(lines.len());
        let mut product_uuids: Vec<Uuid> = Vec::with_capacity(lines.len());
        let mut quantities: Vec<i32> = Vec::with_capacity(lines.len());
        let mut sizes: Vec<String> = Vec::with_capacity(lines.len());
        let mut colors: Vec<String> = Vec::with_capacity(lines.len());
        let mut unit_prices: Vec<i64> = Vec::with_capacity(lines.len());

        for line in lines {
            uuids.push(OrderItemUuid::new().into_uuid());
            product_uuids.push(line.product_uuid.into_uuid());
            quantities.push(encode_count(line.quantity)?);
            sizes.push(line.variant.size);
            colors.push(line.variant.color);
            unit_prices.push(encode_amount(line.unit_price)?);
        }

        let mut items = query_as::<Postgres, OrderItemRecord>(CREATE_ORDER_ITEMS_SQL)
            .bind(order.into_uuid())
            .bind(&uuids)
            .bind(&product_uuids)
            .bind(&quantities)
            .bind(&sizes)
            .bind(&colors)
            .bind(&unit_prices)
            .fetch_all(&mut **tx)
            .await?;

        items.sort_by_key(|item| item.uuid);

        Ok(items)
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        let mut order = query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        order.items = self.list_order_items(tx, &[order.uuid]).await?;

        Ok(order)
    }

    /// A page of the user's orders, newest first, each with its items.
    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        page: Page,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        let mut orders = query_as::<Postgres, OrderRecord>(LIST_ORDERS_SQL)
            .bind(user.into_uuid())
            .bind(i64::from(page.limit()))
            .bind(i64::from(page.offset()))
            .fetch_all(&mut **tx)
            .await?;

        if orders.is_empty() {
            return Ok(orders);
        }

        let order_uuids: Vec<OrderUuid> = orders.iter().map(|order| order.uuid).collect();
        let items = self.list_order_items(tx, &order_uuids).await?;

        let positions: FxHashMap<OrderUuid, usize> = order_uuids
            .iter()
            .enumerate()
            .map(|(position, uuid)| (*uuid, position))
            .collect();

        for item in items {
            if let Some(order) = positions
                .get(&item.order_uuid)
                .and_then(|&position| orders.get_mut(position))
            {
                order.items.push(item);
            }
        }

        Ok(orders)
    }

    /// Number of orders the user has placed, across all pages.
    pub(crate) async fn count_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<u64, sqlx::Error> {
        let total: i64 = query_scalar(COUNT_ORDERS_SQL)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        u64::try_from(total).map_err(|e| sqlx::Error::ColumnDecode {
            index: "total".to_string(),
            source: Box::new(e),
        })
    }

    async fn list_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &[OrderUuid],
    ) -> Result<Vec<OrderItemRecord>, sqlx::Error> {
        let uuids: Vec<Uuid> = orders.iter().copied().map(Into::into).collect();

        query_as::<Postgres, OrderItemRecord>(LIST_ORDER_ITEMS_SQL)
            .bind(&uuids)
            .fetch_all(&mut **tx)
            .await
    }
}

fn try_get_status<T>(row: &PgRow, col: &str) -> Result<T, sqlx::Error>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value: String = row.try_get(col)?;

    value.parse().map_err(|e: T::Err| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            total_amount: try_get_amount(row, "total_amount")?,
            status: try_get_status(row, "status")?,
            payment_method: row.try_get("payment_method")?,
            payment_status: try_get_status(row, "payment_status")?,
            delivery_address: row.try_get("delivery_address")?,
            items: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderItemUuid::from_uuid(row.try_get("uuid")?),
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            quantity: try_get_count(row, "quantity")?,
            variant: Variant {
                size: row.try_get("size")?,
                color: row.try_get("color")?,
            },
            unit_price: try_get_amount(row, "unit_price")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
