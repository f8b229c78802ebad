//! Error taxonomy for the intake engine
//!
//! Per-field validation failures are *values* ([`crate::validator::FieldResult`]),
//! not errors: they are recoverable and surfaced inline. The enums here cover
//! programming errors caught at rule-table construction, infrastructure
//! failures from the record store, and failures of the submission machinery
//! itself. [`IntakeError`] is the crate-level roll-up for callers that want a
//! single error type.

use thiserror::Error;

/// Programming errors in rule-table construction or lookup.
///
/// These abort construction of a [`crate::rules::RuleSet`] rather than
/// failing silently at runtime.
#[derive(Error, Debug)]
pub enum RuleSetError {
    #[error("unknown field '{field}'")]
    UnknownField { field: String },

    #[error("field '{field}' is declared more than once")]
    DuplicateField { field: String },

    #[error("field '{field}' declares no checks")]
    EmptyField { field: String },

    #[error("invalid pattern for field '{field}': {source}")]
    BadPattern {
        field: String,
        #[source]
        source: regex::Error,
    },
}

/// Infrastructure failures from a record store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failures of the submission machinery.
///
/// A rejected form, a duplicate record, and the simulated transient failure
/// are all [`crate::submit::Outcome`] branches, not errors.
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("submission cancelled before completion")]
    Cancelled,

    #[error("submission task failed: {0}")]
    Background(String),
}

/// Malformed environment configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Crate-level roll-up error.
#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("rule set error: {0}")]
    RuleSet(#[from] RuleSetError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("submission error: {0}")]
    Submit(#[from] SubmitError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
