//! Order Data

use crate::domain::orders::records::OrderUuid;

const DEFAULT_PAGE_LIMIT: u32 = 20;
const MAX_PAGE_LIMIT: u32 = 100;

/// Checkout request for the current contents of a user's cart.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub payment_method: String,
    pub delivery_address: String,
}

impl NewOrder {
    pub(crate) fn has_required_data(&self) -> bool {
        !self.payment_method.trim().is_empty() && !self.delivery_address.trim().is_empty()
    }
}

/// Offset pagination for order listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    limit: u32,
    offset: u32,
}

impl Page {
    /// Build a page, clamping `limit` into `1..=100`.
    #[must_use]
    pub fn new(limit: u32, offset: u32) -> Self {
        Self {
            limit: limit.clamp(1, MAX_PAGE_LIMIT),
            offset,
        }
    }

    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    #[must_use]
    pub fn offset(&self) -> u32 {
        self.offset
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_LIMIT, 0)
    }
}
