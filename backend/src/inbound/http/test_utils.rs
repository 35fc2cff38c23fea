//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;

use crate::domain::ports::{MockAskKuber, MockGoldPurchase, MockHoldingsQuery};
use crate::inbound::http::state::HttpState;

/// Handler state built from mocks; ports left at `::new()` panic if called.
#[derive(Default)]
pub(crate) struct MockPorts {
    pub advisor: MockAskKuber,
    pub purchases: MockGoldPurchase,
    pub holdings: MockHoldingsQuery,
}

impl MockPorts {
    pub(crate) fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(
            Arc::new(self.advisor),
            Arc::new(self.purchases),
            Arc::new(self.holdings),
        ))
    }
}
