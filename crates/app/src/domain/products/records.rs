//! Product Records

use jiff::Timestamp;
use serde::Serialize;

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Product Record
#[derive(Debug, Clone, Serialize)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    /// Unit price in minor currency units.
    pub price: u64,
    /// Units currently available for sale.
    pub stock: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// A product row read while holding its exclusive row lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockedProductRecord {
    pub uuid: ProductUuid,
    pub price: u64,
    pub stock: u32,
}
