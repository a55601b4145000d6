//! Marketplace Domain Concerns

pub mod carts;
pub(crate) mod money;
pub mod orders;
pub mod products;
pub mod users;
