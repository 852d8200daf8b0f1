// ── Core error types ──
//
// Errors only surface while loading inputs or serializing output. Once a
// document and a registry exist, reconciliation itself cannot fail: lookup
// misses and malformed region codes degrade to inert regions instead.

use thiserror::Error;

use crate::model::UnitCode;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Diagram errors ───────────────────────────────────────────────
    #[error("Malformed diagram document at byte {position}: {message}")]
    DocumentParse { position: u64, message: String },

    #[error("Diagram document has no <svg> root element")]
    MissingRoot,

    #[error("Failed to write diagram: {message}")]
    DocumentWrite { message: String },

    // ── Record errors ────────────────────────────────────────────────
    #[error("Invalid unit data: {message}")]
    RegistryParse { message: String },

    #[error("Unit not found: {code}")]
    UnitNotFound { code: UnitCode },

    // ── IO errors ────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
