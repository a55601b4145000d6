//! Orders
//!
//! Checkout turns a user's cart into a persisted order in one transaction. Product
//! rows are locked in ascending UUID order and stock is validated under those
//! locks. The order, its lines, the stock decrements and the cart clear then commit
//! or roll back together.

pub(crate) mod checkout;
pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repository;
pub mod service;

pub use errors::{OrderErrorKind, OrdersServiceError};
pub use service::*;
