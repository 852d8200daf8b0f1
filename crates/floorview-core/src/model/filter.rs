// ── Filter state ──

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::unit::{UnitRecord, UnitStatus};

/// Upper bound of the price-ceiling control and the default ceiling.
pub const PRICE_MAX: f64 = 100_000.0;

/// Which records are visible: status membership plus an inclusive price ceiling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub statuses: BTreeSet<UnitStatus>,
    pub price_ceiling: f64,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            statuses: UnitStatus::ALL.into_iter().collect(),
            price_ceiling: PRICE_MAX,
        }
    }
}

impl FilterState {
    pub fn new(statuses: impl IntoIterator<Item = UnitStatus>, price_ceiling: f64) -> Self {
        Self {
            statuses: statuses.into_iter().collect(),
            price_ceiling,
        }
    }

    /// Visibility predicate for a matched region.
    pub fn admits(&self, record: &UnitRecord) -> bool {
        self.statuses.contains(&record.status) && record.price <= self.price_ceiling
    }

    pub fn contains(&self, status: UnitStatus) -> bool {
        self.statuses.contains(&status)
    }

    /// Flip membership of `status`. Returns the new membership.
    ///
    /// An empty status set is a valid state: every region is hidden.
    pub fn toggle_status(&mut self, status: UnitStatus) -> bool {
        if self.statuses.remove(&status) {
            false
        } else {
            self.statuses.insert(status);
            true
        }
    }

    /// Replace the ceiling. Bounds are the caller's control's business.
    pub fn set_price_ceiling(&mut self, ceiling: f64) {
        self.price_ceiling = ceiling;
    }
}
