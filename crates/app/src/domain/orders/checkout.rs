//! Checkout planning.
//!
//! Everything here is pure: the service locks rows and persists, these functions
//! decide what the lock set is and whether the locked stock covers the cart.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::domain::{
    carts::records::{CartLineRecord, Variant},
    money,
    orders::errors::OrdersServiceError,
    products::records::{LockedProductRecord, ProductUuid},
};

/// Product ids in lock-acquisition order.
pub(crate) type LockOrder = SmallVec<[ProductUuid; 8]>;

/// One order line as it will be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlannedLine {
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub variant: Variant,
    pub unit_price: u64,
}

/// Stock to remove from a single product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StockDeduction {
    pub product_uuid: ProductUuid,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CheckoutPlan {
    pub lines: Vec<PlannedLine>,
    pub total_amount: u64,
    /// One entry per distinct product, ascending by product id.
    pub deductions: Vec<StockDeduction>,
}

/// The distinct products referenced by `lines`, sorted ascending.
///
/// Every checkout locks in this order, so two checkouts sharing products always
/// contend on the lowest shared id first and cannot deadlock.
pub(crate) fn lock_order(lines: &[CartLineRecord]) -> LockOrder {
    let mut products: LockOrder = lines.iter().map(|line| line.product_uuid).collect();

    products.sort_unstable();
    products.dedup();

    products
}

/// Validate the cart against the locked product rows and build the order.
///
/// Quantities for the same product are summed across variants before being
/// compared with stock. Unit prices come from the locked rows, not from the cart
/// read, so the snapshot matches the price at commit time.
///
/// # Errors
///
/// Returns the first failure in ascending product order:
/// [`OrdersServiceError::ProductNotFound`] when a product was not locked (missing or
/// deleted), [`OrdersServiceError::InsufficientStock`] when the summed quantity
/// exceeds stock, or [`OrdersServiceError::AmountOverflow`] when the total does not
/// fit.
pub(crate) fn plan_checkout(
    lines: Vec<CartLineRecord>,
    locked: &[LockedProductRecord],
) -> Result<CheckoutPlan, OrdersServiceError> {
    let locked: FxHashMap<ProductUuid, LockedProductRecord> =
        locked.iter().map(|product| (product.uuid, *product)).collect();

    let mut requested: BTreeMap<ProductUuid, u32> = BTreeMap::new();

    for line in &lines {
        let quantity = requested.entry(line.product_uuid).or_default();
        *quantity = quantity.saturating_add(line.quantity);
    }

    let mut deductions = Vec::with_capacity(requested.len());

    for (&product_uuid, &quantity) in &requested {
        let Some(product) = locked.get(&product_uuid) else {
            return Err(OrdersServiceError::ProductNotFound(product_uuid));
        };

        if quantity > product.stock {
            return Err(OrdersServiceError::InsufficientStock {
                product: product_uuid,
                requested: quantity,
                available: product.stock,
            });
        }

        deductions.push(StockDeduction {
            product_uuid,
            quantity,
        });
    }

    let lines: Vec<PlannedLine> = lines
        .into_iter()
        .filter_map(|line| {
            locked.get(&line.product_uuid).map(|product| PlannedLine {
                product_uuid: line.product_uuid,
                quantity: line.quantity,
                variant: line.variant,
                unit_price: product.price,
            })
        })
        .collect();

    let total_amount =
        money::sum_line_totals(lines.iter().map(|line| (line.quantity, line.unit_price)))
            .ok_or(OrdersServiceError::AmountOverflow)?;

    Ok(CheckoutPlan {
        lines,
        total_amount,
        deductions,
    })
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use crate::domain::carts::records::CartItemUuid;

    use super::*;

    fn cart_line(product_uuid: ProductUuid, quantity: u32, variant: Variant) -> CartLineRecord {
        CartLineRecord {
            uuid: CartItemUuid::new(),
            product_uuid,
            quantity,
            variant,
            unit_price: 0,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    fn locked(uuid: ProductUuid, price: u64, stock: u32) -> LockedProductRecord {
        LockedProductRecord { uuid, price, stock }
    }

    #[test]
    fn lock_order_is_sorted_and_distinct() {
        let a = ProductUuid::new();
        let b = ProductUuid::new();
        let c = ProductUuid::new();

        let lines = vec![
            cart_line(c, 1, Variant::default()),
            cart_line(a, 1, Variant::default()),
            cart_line(c, 2, Variant::new("L", "")),
            cart_line(b, 1, Variant::default()),
        ];

        let order = lock_order(&lines);

        assert_eq!(order.as_slice(), &[a, b, c]);
    }

    #[test]
    fn plan_totals_lines_at_locked_prices() -> Result<(), OrdersServiceError> {
        let x = ProductUuid::new();
        let y = ProductUuid::new();

        let plan = plan_checkout(
            vec![
                cart_line(x, 2, Variant::default()),
                cart_line(y, 1, Variant::default()),
            ],
            &[locked(x, 25_00, 5), locked(y, 50_00, 1)],
        )?;

        assert_eq!(plan.total_amount, 100_00);
        assert_eq!(plan.lines.len(), 2);
        assert_eq!(plan.deductions.len(), 2);
        assert!(
            plan.deductions
                .windows(2)
                .all(|pair| pair[0].product_uuid < pair[1].product_uuid)
        );

        Ok(())
    }

    #[test]
    fn plan_rejects_shortfall_with_detail() {
        let z = ProductUuid::new();

        let result = plan_checkout(
            vec![cart_line(z, 3, Variant::default())],
            &[locked(z, 10_00, 2)],
        );

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::InsufficientStock {
                    product,
                    requested: 3,
                    available: 2,
                }) if product == z
            ),
            "expected InsufficientStock, got {result:?}"
        );
    }

    #[test]
    fn variants_of_one_product_share_its_stock() {
        let shirt = ProductUuid::new();

        let result = plan_checkout(
            vec![
                cart_line(shirt, 2, Variant::new("S", "")),
                cart_line(shirt, 2, Variant::new("M", "")),
            ],
            &[locked(shirt, 15_00, 3)],
        );

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::InsufficientStock {
                    requested: 4,
                    available: 3,
                    ..
                })
            ),
            "expected InsufficientStock, got {result:?}"
        );
    }

    #[test]
    fn variants_keep_separate_lines_but_one_deduction() -> Result<(), OrdersServiceError> {
        let shirt = ProductUuid::new();

        let plan = plan_checkout(
            vec![
                cart_line(shirt, 1, Variant::new("S", "")),
                cart_line(shirt, 2, Variant::new("M", "")),
            ],
            &[locked(shirt, 15_00, 3)],
        )?;

        assert_eq!(plan.lines.len(), 2);
        assert_eq!(
            plan.deductions,
            vec![StockDeduction {
                product_uuid: shirt,
                quantity: 3,
            }]
        );
        assert_eq!(plan.total_amount, 45_00);

        Ok(())
    }

    #[test]
    fn unlocked_product_is_not_found() {
        let live = ProductUuid::new();
        let gone = ProductUuid::new();

        let result = plan_checkout(
            vec![
                cart_line(live, 1, Variant::default()),
                cart_line(gone, 1, Variant::default()),
            ],
            &[locked(live, 10_00, 5)],
        );

        assert!(
            matches!(result, Err(OrdersServiceError::ProductNotFound(product)) if product == gone),
            "expected ProductNotFound, got {result:?}"
        );
    }

    #[test]
    fn total_overflow_is_reported() {
        let product = ProductUuid::new();

        let result = plan_checkout(
            vec![cart_line(product, 2, Variant::default())],
            &[locked(product, u64::MAX, 5)],
        );

        assert!(
            matches!(result, Err(OrdersServiceError::AmountOverflow)),
            "expected AmountOverflow, got {result:?}"
        );
    }
}
