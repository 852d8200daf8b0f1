//! Unit registry — the read-only `code → record` table.
//!
//! Loaded once from the record source and never mutated afterwards. Lookups
//! have no error path: an unknown code is simply `None`.

use std::collections::BTreeMap;
use std::io::Read;

use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::{UnitCode, UnitRecord, UnitStatus};

/// Immutable record table, in source order.
#[derive(Debug, Clone, Default)]
pub struct UnitRegistry {
    records: IndexMap<UnitCode, UnitRecord>,
}

impl UnitRegistry {
    /// Build from already-parsed records.
    ///
    /// The first record for a code wins; records with a negative or
    /// non-finite price are dropped. Both cases are logged.
    pub fn new(records: impl IntoIterator<Item = UnitRecord>) -> Self {
        let mut map = IndexMap::new();
        for record in records {
            if !record.has_valid_price() {
                warn!(code = %record.code, price = record.price, "skipping unit with invalid price");
                continue;
            }
            match map.entry(record.code) {
                Entry::Occupied(_) => {
                    warn!(code = %record.code, "duplicate unit code, keeping first record");
                }
                Entry::Vacant(slot) => {
                    slot.insert(record);
                }
            }
        }
        Self { records: map }
    }

    /// Parse the record source: a JSON array of `{code, status, price}`.
    ///
    /// Fails only when the payload is not a JSON array. Individual entries
    /// that do not describe a valid record are skipped.
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        let entries: Vec<serde_json::Value> =
            serde_json::from_str(json).map_err(|e| CoreError::RegistryParse {
                message: e.to_string(),
            })?;
        Ok(Self::from_entries(entries))
    }

    pub fn from_json_reader(reader: impl Read) -> Result<Self, CoreError> {
        let entries: Vec<serde_json::Value> =
            serde_json::from_reader(reader).map_err(|e| CoreError::RegistryParse {
                message: e.to_string(),
            })?;
        Ok(Self::from_entries(entries))
    }

    fn from_entries(entries: Vec<serde_json::Value>) -> Self {
        let total = entries.len();
        let records = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value::<UnitRecord>(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(index, error = %e, "skipping malformed unit entry");
                    None
                }
            })
            .collect::<Vec<_>>();
        let registry = Self::new(records);
        debug!(total, loaded = registry.len(), "unit registry loaded");
        registry
    }

    pub fn lookup(&self, code: UnitCode) -> Option<&UnitRecord> {
        self.records.get(&code)
    }

    /// Records in source order.
    pub fn iter(&self) -> impl Iterator<Item = &UnitRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Highest price in the table, if any.
    pub fn max_price(&self) -> Option<f64> {
        self.records.values().map(|r| r.price).reduce(f64::max)
    }

    /// Record count per status; every status is present, possibly zero.
    pub fn count_by_status(&self) -> BTreeMap<UnitStatus, usize> {
        let mut counts: BTreeMap<UnitStatus, usize> =
            UnitStatus::ALL.into_iter().map(|s| (s, 0)).collect();
        for record in self.records.values() {
            *counts.entry(record.status).or_default() += 1;
        }
        counts
    }
}

impl FromIterator<UnitRecord> for UnitRegistry {
    fn from_iter<I: IntoIterator<Item = UnitRecord>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"[
        {"code": 101, "status": "available", "price": 50000},
        {"code": 102, "status": "sold", "price": 90000},
        {"code": 103, "status": "reserved", "price": 72500.5}
    ]"#;

    #[test]
    fn lookup_hits_and_misses() {
        let registry = UnitRegistry::from_json_str(SOURCE).unwrap();
        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.lookup(UnitCode::new(102)).unwrap().status,
            UnitStatus::Sold
        );
        assert!(registry.lookup(UnitCode::new(999)).is_none());
    }

    #[test]
    fn preserves_source_order() {
        let registry = UnitRegistry::from_json_str(SOURCE).unwrap();
        let codes: Vec<u32> = registry.iter().map(|r| r.code.get()).collect();
        assert_eq!(codes, vec![101, 102, 103]);
    }

    #[test]
    fn first_duplicate_wins() {
        let registry = UnitRegistry::new([
            UnitRecord::new(1, UnitStatus::Available, 10.0),
            UnitRecord::new(1, UnitStatus::Sold, 20.0),
        ]);
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.lookup(UnitCode::new(1)).unwrap().status,
            UnitStatus::Available
        );
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let registry = UnitRegistry::from_json_str(
            r#"[
                {"code": 1, "status": "available", "price": 10},
                {"code": 2, "status": "demolished", "price": 10},
                {"code": "x", "status": "sold", "price": 10},
                {"code": 4, "status": "sold", "price": -5},
                {"code": 5, "status": "sold"}
            ]"#,
        )
        .unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.lookup(UnitCode::new(1)).is_some());
    }

    #[test]
    fn non_array_payload_is_an_error() {
        let err = UnitRegistry::from_json_str(r#"{"code": 1}"#).unwrap_err();
        assert!(matches!(err, CoreError::RegistryParse { .. }));
    }

    #[test]
    fn counts_and_max_price() {
        let registry = UnitRegistry::from_json_str(SOURCE).unwrap();
        let counts = registry.count_by_status();
        assert_eq!(counts[&UnitStatus::Available], 1);
        assert_eq!(counts[&UnitStatus::Reserved], 1);
        assert_eq!(counts[&UnitStatus::Sold], 1);
        assert_eq!(registry.max_price(), Some(90_000.0));
        assert_eq!(UnitRegistry::default().max_price(), None);
    }
}
