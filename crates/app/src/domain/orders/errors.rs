//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::products::records::ProductUuid;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("cart is empty")]
    EmptyCart,

    #[error(
        "insufficient stock for product {product}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        product: ProductUuid,
        requested: u32,
        available: u32,
    },

    #[error("product {0} not found")]
    ProductNotFound(ProductUuid),

    #[error("order not found")]
    NotFound,

    #[error("order already exists")]
    AlreadyExists,

    #[error("missing required data")]
    MissingRequiredData,

    /// The conditional stock decrement matched no row even though the product was
    /// locked and validated.
    #[error("stock decrement for product {product} (quantity {requested}) affected no rows")]
    StockInvariantViolated { product: ProductUuid, requested: u32 },

    #[error("order total overflow")]
    AmountOverflow,

    #[error("storage error")]
    Sql(#[source] Error),
}

/// Caller-facing classification of an [`OrdersServiceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderErrorKind {
    /// Nothing to order.
    EmptyCart,
    /// The request itself is unusable (blank fields, reused order UUID).
    InvalidRequest,
    /// A line asks for more than the product's current stock.
    InsufficientStock,
    /// A cart line references a product that no longer exists.
    ProductNotFound,
    /// The requested order does not exist for this user.
    NotFound,
    /// Persistence, locking or invariant failure. Details must not reach end users.
    Internal,
}

impl OrdersServiceError {
    #[must_use]
    pub fn kind(&self) -> OrderErrorKind {
        match self {
            Self::EmptyCart => OrderErrorKind::EmptyCart,
            Self::MissingRequiredData | Self::AlreadyExists => OrderErrorKind::InvalidRequest,
            Self::InsufficientStock { .. } => OrderErrorKind::InsufficientStock,
            Self::ProductNotFound(_) => OrderErrorKind::ProductNotFound,
            Self::NotFound => OrderErrorKind::NotFound,
            Self::StockInvariantViolated { .. }
            | Self::AmountOverflow
            | Self::Sql(_) => OrderErrorKind::Internal,
        }
    }

    #[must_use]
    pub fn is_internal(&self) -> bool {
        self.kind() == OrderErrorKind::Internal
    }
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
