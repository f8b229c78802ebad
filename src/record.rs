//! Persisted registration records

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A successfully submitted entity. Created only on simulated success, never
/// mutated, deleted only by a bulk clear of its partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Generated registration id, e.g. `CKT483920`.
    pub id: String,
    pub submitted_at: DateTime<Utc>,
    /// All raw field values as submitted.
    pub fields: BTreeMap<String, String>,
}

impl Record {
    pub fn new(id_prefix: &str, fields: BTreeMap<String, String>) -> Self {
        Self {
            id: generate_id(id_prefix),
            submitted_at: Utc::now(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Registration id: form-specific prefix plus the last six digits of the
/// current millisecond timestamp. Not globally unique; collisions are
/// improbable, not impossible.
pub fn generate_id(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis().to_string();
    let tail = &millis[millis.len().saturating_sub(6)..];
    format!("{prefix}{tail}")
}
