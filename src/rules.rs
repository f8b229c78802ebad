//! Declarative validation rules
//!
//! A [`RuleSet`] maps field names to an ordered list of [`Check`]s, each
//! carrying its own human-readable message. The table is configuration, not
//! mutable state: it is built once through [`RuleSetBuilder`], which rejects
//! programmer errors (duplicate fields, empty fields, uncompilable patterns,
//! cross-field references to undeclared fields) instead of letting them
//! surface at validation time.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::error::RuleSetError;
use crate::input::FieldHandle;

/// Predicate for [`Check::Custom`]. Receives the trimmed value plus a handle
/// to the original field for checks that depend on non-string state such as
/// attachment type or size.
pub type CustomCheckFn = dyn Fn(&str, &FieldHandle) -> bool + Send + Sync;

/// One validation check, tagged by kind, with its failure message.
#[derive(Clone)]
pub enum Check {
    /// Trimmed value must be non-empty.
    Required { message: String },
    /// Trimmed value must match the pattern.
    Pattern { regex: Regex, message: String },
    /// Trimmed value must be at least `min` characters.
    MinLength { min: usize, message: String },
    /// Trimmed value must equal the raw value of another field.
    MatchField { other: String, message: String },
    /// Arbitrary predicate over the trimmed value and the field handle.
    Custom {
        predicate: Arc<CustomCheckFn>,
        message: String,
    },
}

impl Check {
    pub fn message(&self) -> &str {
        match self {
            Check::Required { message }
            | Check::Pattern { message, .. }
            | Check::MinLength { message, .. }
            | Check::MatchField { message, .. }
            | Check::Custom { message, .. } => message,
        }
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::Required { message } => {
                f.debug_struct("Required").field("message", message).finish()
            }
            Check::Pattern { regex, message } => f
                .debug_struct("Pattern")
                .field("regex", &regex.as_str())
                .field("message", message)
                .finish(),
            Check::MinLength { min, message } => f
                .debug_struct("MinLength")
                .field("min", min)
                .field("message", message)
                .finish(),
            Check::MatchField { other, message } => f
                .debug_struct("MatchField")
                .field("other", other)
                .field("message", message)
                .finish(),
            Check::Custom { message, .. } => f
                .debug_struct("Custom")
                .field("message", message)
                .finish_non_exhaustive(),
        }
    }
}

/// The checks declared for one field, in declaration order.
#[derive(Debug, Clone)]
pub struct FieldRules {
    name: String,
    label: String,
    checks: Vec<Check>,
}

impl FieldRules {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display label used in default messages and UI projection.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    pub fn is_required(&self) -> bool {
        self.checks
            .iter()
            .any(|c| matches!(c, Check::Required { .. }))
    }
}

/// Immutable mapping from field name to [`FieldRules`].
#[derive(Debug, Clone)]
pub struct RuleSet {
    order: Vec<String>,
    fields: HashMap<String, FieldRules>,
}

impl RuleSet {
    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder::new()
    }

    /// Look up the rules for one field.
    pub fn get(&self, field: &str) -> Result<&FieldRules, RuleSetError> {
        self.fields.get(field).ok_or_else(|| RuleSetError::UnknownField {
            field: field.to_string(),
        })
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Builder for [`RuleSet`]. Construction fails on programmer error rather
/// than deferring to validation time.
#[derive(Default)]
pub struct RuleSetBuilder {
    fields: Vec<PendingField>,
}

struct PendingField {
    name: String,
    label: String,
    checks: Vec<PendingCheck>,
}

enum PendingCheck {
    Required { message: Option<String> },
    Pattern { source: String, message: String },
    MinLength { min: usize, message: String },
    MatchField { other: String, message: String },
    Custom { predicate: Arc<CustomCheckFn>, message: String },
}

impl RuleSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare one field and its checks. Checks are appended in the order the
    /// closure declares them; evaluation short-circuits in that order.
    pub fn field<F>(mut self, name: &str, label: &str, configure: F) -> Self
    where
        F: FnOnce(FieldBuilder) -> FieldBuilder,
    {
        let builder = configure(FieldBuilder::new(name, label));
        self.fields.push(builder.pending);
        self
    }

    pub fn build(self) -> Result<RuleSet, RuleSetError> {
        let declared: HashSet<String> =
            self.fields.iter().map(|f| f.name.clone()).collect();

        let mut order = Vec::with_capacity(self.fields.len());
        let mut fields = HashMap::with_capacity(self.fields.len());

        for pending in self.fields {
            if fields.contains_key(&pending.name) {
                return Err(RuleSetError::DuplicateField { field: pending.name });
            }
            if pending.checks.is_empty() {
                return Err(RuleSetError::EmptyField { field: pending.name });
            }

            let mut checks = Vec::with_capacity(pending.checks.len());
            for check in pending.checks {
                checks.push(match check {
                    PendingCheck::Required { message } => Check::Required {
                        message: message
                            .unwrap_or_else(|| format!("{} is required", pending.label)),
                    },
                    PendingCheck::Pattern { source, message } => Check::Pattern {
                        regex: Regex::new(&source).map_err(|source| {
                            RuleSetError::BadPattern {
                                field: pending.name.clone(),
                                source,
                            }
                        })?,
                        message,
                    },
                    PendingCheck::MinLength { min, message } => {
                        Check::MinLength { min, message }
                    }
                    PendingCheck::MatchField { other, message } => {
                        if !declared.contains(other.as_str()) {
                            return Err(RuleSetError::UnknownField { field: other });
                        }
                        Check::MatchField { other, message }
                    }
                    PendingCheck::Custom { predicate, message } => {
                        Check::Custom { predicate, message }
                    }
                });
            }

            order.push(pending.name.clone());
            fields.insert(
                pending.name.clone(),
                FieldRules {
                    name: pending.name,
                    label: pending.label,
                    checks,
                },
            );
        }

        Ok(RuleSet { order, fields })
    }
}

/// Per-field builder used inside [`RuleSetBuilder::field`].
pub struct FieldBuilder {
    pending: PendingField,
}

impl FieldBuilder {
    fn new(name: &str, label: &str) -> Self {
        Self {
            pending: PendingField {
                name: name.to_string(),
                label: label.to_string(),
                checks: Vec::new(),
            },
        }
    }

    /// Require a non-empty value; the message defaults to
    /// "`<label>` is required".
    pub fn required(mut self) -> Self {
        self.pending.checks.push(PendingCheck::Required { message: None });
        self
    }

    /// Require a non-empty value with an explicit message.
    pub fn required_with(mut self, message: &str) -> Self {
        self.pending.checks.push(PendingCheck::Required {
            message: Some(message.to_string()),
        });
        self
    }

    pub fn pattern(mut self, source: &str, message: &str) -> Self {
        self.pending.checks.push(PendingCheck::Pattern {
            source: source.to_string(),
            message: message.to_string(),
        });
        self
    }

    pub fn min_length(mut self, min: usize, message: &str) -> Self {
        self.pending.checks.push(PendingCheck::MinLength {
            min,
            message: message.to_string(),
        });
        self
    }

    /// Value must equal the raw value of `other` (confirm-password style).
    pub fn matches(mut self, other: &str, message: &str) -> Self {
        self.pending.checks.push(PendingCheck::MatchField {
            other: other.to_string(),
            message: message.to_string(),
        });
        self
    }

    pub fn custom<F>(mut self, predicate: F, message: &str) -> Self
    where
        F: Fn(&str, &FieldHandle) -> bool + Send + Sync + 'static,
    {
        self.pending.checks.push(PendingCheck::Custom {
            predicate: Arc::new(predicate),
            message: message.to_string(),
        });
        self
    }
}
