// ── Unit records ──

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoStaticStr};

use crate::format;

/// Sale status of a unit.
///
/// The wire format (JSON records, CLI flags, `aria-label` text) uses the
/// lowercase name; [`UnitStatus::label`] gives the capitalized display form.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum UnitStatus {
    Available,
    Reserved,
    Sold,
}

impl UnitStatus {
    /// Every status, in filter-control order.
    pub const ALL: [UnitStatus; 3] = [Self::Available, Self::Reserved, Self::Sold];

    /// Lowercase name used by the record source.
    pub fn wire_name(self) -> &'static str {
        self.into()
    }

    /// Capitalized label for tooltips and tables.
    pub fn label(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Reserved => "Reserved",
            Self::Sold => "Sold",
        }
    }
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Join key between a diagram region and a [`UnitRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitCode(u32);

impl UnitCode {
    pub const fn new(code: u32) -> Self {
        Self(code)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// Parse a region's code attribute. Surrounding whitespace is ignored;
    /// anything else that is not a plain unsigned integer yields `None`.
    pub fn parse_attr(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        trimmed.parse().ok().map(Self)
    }
}

impl fmt::Display for UnitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UnitCode {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl From<u32> for UnitCode {
    fn from(code: u32) -> Self {
        Self(code)
    }
}

/// A sellable unit: immutable for the whole session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub code: UnitCode,
    pub status: UnitStatus,
    pub price: f64,
}

impl UnitRecord {
    pub fn new(code: u32, status: UnitStatus, price: f64) -> Self {
        Self {
            code: UnitCode(code),
            status,
            price,
        }
    }

    /// Assistive-technology description, e.g. `Unit 101 - available - $50,000`.
    pub fn description(&self) -> String {
        format!(
            "Unit {} - {} - {}",
            self.code,
            self.status.wire_name(),
            format::format_price(self.price)
        )
    }

    /// Whether the price is usable for filtering (finite, non-negative).
    pub fn has_valid_price(&self) -> bool {
        self.price.is_finite() && self.price >= 0.0
    }
}
