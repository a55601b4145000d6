//! Cart Records

use jiff::Timestamp;
use serde::Serialize;

use crate::{
    domain::{money, products::records::ProductUuid, users::UserUuid},
    uuids::TypedUuid,
};

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItemRecord>;

/// Attributes distinguishing otherwise identical selections of a product. Empty
/// strings mean "not specified".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Variant {
    pub size: String,
    pub color: String,
}

impl Variant {
    #[must_use]
    pub fn new(size: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            size: size.into(),
            color: color.into(),
        }
    }
}

/// Cart Item Record
#[derive(Debug, Clone, Serialize)]
pub struct CartItemRecord {
    pub uuid: CartItemUuid,
    pub user_uuid: UserUuid,
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub variant: Variant,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A cart line joined with its product's current price.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineRecord {
    pub uuid: CartItemUuid,
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub variant: Variant,
    pub unit_price: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Cart Record
#[derive(Debug, Clone, Serialize)]
pub struct CartRecord {
    pub user_uuid: UserUuid,
    pub subtotal: u64,
    pub lines: Vec<CartLineRecord>,
}

impl CartRecord {
    /// Build a cart from its priced lines, or `None` if the subtotal overflows.
    pub(crate) fn from_lines(user_uuid: UserUuid, lines: Vec<CartLineRecord>) -> Option<Self> {
        let subtotal =
            money::sum_line_totals(lines.iter().map(|line| (line.quantity, line.unit_price)))?;

        Some(Self {
            user_uuid,
            subtotal,
            lines,
        })
    }
}
