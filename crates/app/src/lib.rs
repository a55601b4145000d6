//! Marketplace cart, inventory and checkout core.

pub mod config;
pub mod context;
pub mod database;
pub mod domain;
pub mod logging;
pub mod uuids;

#[cfg(test)]
mod test;
