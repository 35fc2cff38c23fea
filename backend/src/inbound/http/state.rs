//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AskKuber, GoldPurchase, HoldingsQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub advisor: Arc<dyn AskKuber>,
    pub purchases: Arc<dyn GoldPurchase>,
    pub holdings: Arc<dyn HoldingsQuery>,
}

impl HttpState {
    /// Bundle the driving ports used by the handlers.
    pub fn new(
        advisor: Arc<dyn AskKuber>,
        purchases: Arc<dyn GoldPurchase>,
        holdings: Arc<dyn HoldingsQuery>,
    ) -> Self {
        Self {
            advisor,
            purchases,
            holdings,
        }
    }
}
