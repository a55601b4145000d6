//! Runtime configuration groups, parsed from CLI flags and environment.

mod checkout;
mod db;
mod logging;

pub use checkout::CheckoutConfig;
pub use db::DatabaseConfig;
pub use logging::{LogFormat, LoggingConfig};
