//! Cart Data

use crate::domain::{
    carts::records::{CartItemUuid, Variant},
    products::records::ProductUuid,
};

/// Largest quantity a single cart line can hold (the `INTEGER` column limit).
pub const MAX_QUANTITY: u32 = i32::MAX as u32;

/// New Cart Item Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItem {
    /// UUID used when the add creates a new line; ignored when it merges.
    pub uuid: CartItemUuid,
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub variant: Variant,
}
