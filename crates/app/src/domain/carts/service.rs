//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use tracing::debug;

use crate::{
    database::Db,
    domain::{
        carts::{
            data::{MAX_QUANTITY, NewCartItem},
            errors::CartsServiceError,
            records::{CartItemRecord, CartItemUuid, CartRecord},
            repository::PgCartItemsRepository,
        },
        users::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    items_repository: PgCartItemsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            items_repository: PgCartItemsRepository::new(),
        }
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    #[tracing::instrument(
        name = "carts.service.add_item",
        skip(self, item),
        fields(
            user_uuid = %user,
            product_uuid = %item.product_uuid,
            quantity = item.quantity
        ),
        err
    )]
    async fn add_item(
        &self,
        user: UserUuid,
        item: NewCartItem,
    ) -> Result<CartItemRecord, CartsServiceError> {
        validate_quantity(item.quantity)?;

        let mut tx = self.db.begin_transaction().await?;

        let item = self
            .items_repository
            .add_item(&mut tx, user, item)
            .await
            .map_err(|error| match error {
                sqlx::Error::RowNotFound => CartsServiceError::ProductNotFound,
                error => error.into(),
            })?;

        tx.commit().await?;

        debug!(cart_item_uuid = %item.uuid, quantity = item.quantity, "upserted cart item");

        Ok(item)
    }

    async fn get_cart(&self, user: UserUuid) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let lines = self
            .items_repository
            .get_lines_with_pricing(&mut tx, user)
            .await?;

        tx.commit().await?;

        CartRecord::from_lines(user, lines).ok_or(CartsServiceError::AmountOverflow)
    }

    async fn update_item_quantity(
        &self,
        user: UserUuid,
        item: CartItemUuid,
        quantity: u32,
    ) -> Result<CartItemRecord, CartsServiceError> {
        validate_quantity(quantity)?;

        let mut tx = self.db.begin_transaction().await?;

        let item = self
            .items_repository
            .update_quantity(&mut tx, user, item, quantity)
            .await?;

        tx.commit().await?;

        Ok(item)
    }

    async fn remove_item(&self, user: UserUuid, item: CartItemUuid) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = self.items_repository.delete_item(&mut tx, user, item).await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn clear_cart(&self, user: UserUuid) -> Result<u64, CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let cleared = self.items_repository.clear_cart(&mut tx, user).await?;

        tx.commit().await?;

        Ok(cleared)
    }
}

fn validate_quantity(quantity: u32) -> Result<(), CartsServiceError> {
    if quantity == 0 || quantity > MAX_QUANTITY {
        return Err(CartsServiceError::InvalidQuantity);
    }

    Ok(())
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Add a product to the user's cart, merging with an existing line for the same
    /// product and variant.
    async fn add_item(
        &self,
        user: UserUuid,
        item: NewCartItem,
    ) -> Result<CartItemRecord, CartsServiceError>;

    /// Retrieve the user's cart lines with current product pricing.
    async fn get_cart(&self, user: UserUuid) -> Result<CartRecord, CartsServiceError>;

    /// Replace the quantity on one of the user's cart lines.
    async fn update_item_quantity(
        &self,
        user: UserUuid,
        item: CartItemUuid,
        quantity: u32,
    ) -> Result<CartItemRecord, CartsServiceError>;

    /// Remove one line from the user's cart.
    async fn remove_item(&self, user: UserUuid, item: CartItemUuid) -> Result<(), CartsServiceError>;

    /// Remove every line from the user's cart, returning how many were removed.
    async fn clear_cart(&self, user: UserUuid) -> Result<u64, CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::{
            carts::records::Variant,
            products::{ProductsService, records::ProductUuid},
        },
        test::TestContext,
    };

    use super::*;

    #[tokio::test]
    async fn adding_item_to_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = ctx.create_product(10_00, 5).await;
        let uuid = CartItemUuid::new();

        let item = ctx
            .carts
            .add_item(
                user,
                NewCartItem {
                    uuid,
                    product_uuid: product.uuid,
                    quantity: 2,
                    variant: Variant::new("M", "red"),
                },
            )
            .await?;

        assert_eq!(item.uuid, uuid);
        assert_eq!(item.user_uuid, user);
        assert_eq!(item.product_uuid, product.uuid);
        assert_eq!(item.quantity, 2);
        assert_eq!(item.variant, Variant::new("M", "red"));

        Ok(())
    }

    #[tokio::test]
    async fn adding_same_product_and_variant_twice_merges_quantities() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = ctx.create_product(10_00, 5).await;

        let first = ctx.add_to_cart(user, product.uuid, 2, Variant::new("M", "")).await?;
        let second = ctx.add_to_cart(user, product.uuid, 3, Variant::new("M", "")).await?;

        assert_eq!(first.uuid, second.uuid, "repeat add should reuse the line");
        assert_eq!(second.quantity, 5);

        let cart = ctx.carts.get_cart(user).await?;

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines.first().map(|line| line.quantity), Some(5));

        Ok(())
    }

    #[tokio::test]
    async fn different_variants_create_distinct_lines() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = ctx.create_product(10_00, 5).await;

        let small = ctx.add_to_cart(user, product.uuid, 1, Variant::new("S", "")).await?;
        let large = ctx.add_to_cart(user, product.uuid, 1, Variant::new("L", "")).await?;

        assert_ne!(small.uuid, large.uuid);

        let cart = ctx.carts.get_cart(user).await?;

        assert_eq!(cart.lines.len(), 2);
        assert_eq!(cart.subtotal, 20_00);

        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_adds_merge_without_losing_updates() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = ctx.create_product(10_00, 5).await;

        let (a, b) = tokio::join!(
            ctx.add_to_cart(user, product.uuid, 2, Variant::default()),
            ctx.add_to_cart(user, product.uuid, 3, Variant::default()),
        );

        a?;
        b?;

        let cart = ctx.carts.get_cart(user).await?;

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines.first().map(|line| line.quantity), Some(5));

        Ok(())
    }

    #[tokio::test]
    async fn carts_are_scoped_per_user() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product(10_00, 5).await;
        let alice = UserUuid::new();
        let bob = UserUuid::new();

        ctx.add_to_cart(alice, product.uuid, 1, Variant::default()).await?;

        let cart = ctx.carts.get_cart(bob).await?;

        assert!(cart.lines.is_empty());
        assert_eq!(cart.subtotal, 0);

        Ok(())
    }

    #[tokio::test]
    async fn adding_zero_quantity_is_rejected() {
        let ctx = TestContext::new().await;
        let product = ctx.create_product(10_00, 5).await;

        let result = ctx
            .add_to_cart(UserUuid::new(), product.uuid, 0, Variant::default())
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidQuantity)),
            "expected InvalidQuantity, got {result:?}"
        );
    }

    #[tokio::test]
    async fn adding_unknown_product_returns_product_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .add_to_cart(UserUuid::new(), ProductUuid::new(), 1, Variant::default())
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::ProductNotFound)),
            "expected ProductNotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn adding_deleted_product_returns_product_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product(10_00, 5).await;

        ctx.products.delete_product(product.uuid).await?;

        let result = ctx
            .add_to_cart(UserUuid::new(), product.uuid, 1, Variant::default())
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::ProductNotFound)),
            "expected ProductNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_item_quantity_replaces_quantity() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = ctx.create_product(10_00, 5).await;

        let item = ctx.add_to_cart(user, product.uuid, 2, Variant::default()).await?;

        let updated = ctx.carts.update_item_quantity(user, item.uuid, 4).await?;

        assert_eq!(updated.quantity, 4);

        let result = ctx.carts.update_item_quantity(user, item.uuid, 0).await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidQuantity)),
            "expected InvalidQuantity, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn removing_another_users_item_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = UserUuid::new();
        let product = ctx.create_product(10_00, 5).await;

        let item = ctx.add_to_cart(owner, product.uuid, 1, Variant::default()).await?;

        let result = ctx.carts.remove_item(UserUuid::new(), item.uuid).await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        ctx.carts.remove_item(owner, item.uuid).await?;

        assert!(ctx.carts.get_cart(owner).await?.lines.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn clear_cart_removes_every_line() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let a = ctx.create_product(10_00, 5).await;
        let b = ctx.create_product(20_00, 5).await;

        ctx.add_to_cart(user, a.uuid, 1, Variant::default()).await?;
        ctx.add_to_cart(user, b.uuid, 1, Variant::default()).await?;

        let cleared = ctx.carts.clear_cart(user).await?;

        assert_eq!(cleared, 2);
        assert!(ctx.carts.get_cart(user).await?.lines.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn quantity_beyond_column_range_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = ctx.create_product(1, 5).await;

        let result = ctx
            .add_to_cart(user, product.uuid, MAX_QUANTITY + 1, Variant::default())
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidQuantity)),
            "expected InvalidQuantity, got {result:?}"
        );

        let item = ctx
            .add_to_cart(user, product.uuid, MAX_QUANTITY, Variant::default())
            .await?;

        let result = ctx.add_to_cart(user, product.uuid, 1, Variant::default()).await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidQuantity)),
            "expected InvalidQuantity on merge overflow, got {result:?}"
        );

        let result = ctx.carts.update_item_quantity(user, item.uuid, u32::MAX).await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidQuantity)),
            "expected InvalidQuantity, got {result:?}"
        );

        let cart = ctx.carts.get_cart(user).await?;

        assert_eq!(cart.lines.first().map(|line| line.quantity), Some(MAX_QUANTITY));

        Ok(())
    }
}
