//! Field and form evaluation
//!
//! Evaluation is a fold over a field's declared checks with short-circuit on
//! the first failure; the order of declared checks decides which message
//! surfaces. Required and length checks operate on the trimmed value; a
//! `MatchField` check compares against the referenced field's raw value, and
//! custom checks additionally receive a handle to the original field.

use serde::Serialize;

use crate::error::RuleSetError;
use crate::input::FormInput;
use crate::rules::{Check, FieldRules, RuleSet};

/// Outcome of validating one field. Transient, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldResult {
    pub valid: bool,
    pub message: Option<String>,
}

impl FieldResult {
    pub fn pass() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    pub fn fail(message: &str) -> Self {
        Self {
            valid: false,
            message: Some(message.to_string()),
        }
    }
}

/// One entry per declared field, in declaration order, for the caller to
/// project onto UI as clear-error or show-error signals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormReport {
    entries: Vec<(String, FieldResult)>,
}

impl FormReport {
    pub fn is_valid(&self) -> bool {
        self.entries.iter().all(|(_, r)| r.valid)
    }

    pub fn entries(&self) -> &[(String, FieldResult)] {
        &self.entries
    }

    /// Only the failing fields.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &FieldResult)> {
        self.entries
            .iter()
            .filter(|(_, r)| !r.valid)
            .map(|(name, r)| (name.as_str(), r))
    }

    /// The failure message for one field, if it failed.
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .and_then(|(_, r)| r.message.as_deref())
    }
}

impl RuleSet {
    /// Validate one field's current value against its declared checks.
    ///
    /// The only error is `UnknownField`; a failing check is a passing call
    /// that returns an invalid [`FieldResult`].
    pub fn validate_field(
        &self,
        field: &str,
        input: &FormInput,
    ) -> Result<FieldResult, RuleSetError> {
        let rules = self.get(field)?;
        Ok(evaluate(rules, input))
    }

    /// Validate every declared field, reporting all failures at once so one
    /// invalid field does not hide the others.
    pub fn validate_all(&self, input: &FormInput) -> FormReport {
        let entries = self
            .field_names()
            .map(|name| {
                // Names come from the table itself, so the lookup cannot fail.
                let rules = match self.get(name) {
                    Ok(rules) => rules,
                    Err(_) => unreachable!("declared field missing from table"),
                };
                (name.to_string(), evaluate(rules, input))
            })
            .collect();
        FormReport { entries }
    }
}

fn evaluate(rules: &FieldRules, input: &FormInput) -> FieldResult {
    let raw = input.value(rules.name());
    let trimmed = raw.trim();

    // An empty value fails only the Required check; every other check is
    // skipped so optional fields validate trivially when left blank.
    if trimmed.is_empty() {
        for check in rules.checks() {
            if let Check::Required { message } = check {
                return FieldResult::fail(message);
            }
        }
        return FieldResult::pass();
    }

    for check in rules.checks() {
        match check {
            Check::Required { .. } => {}
            Check::Pattern { regex, message } => {
                if !regex.is_match(trimmed) {
                    return FieldResult::fail(message);
                }
            }
            Check::MinLength { min, message } => {
                if trimmed.chars().count() < *min {
                    return FieldResult::fail(message);
                }
            }
            Check::MatchField { other, message } => {
                if trimmed != input.value(other) {
                    return FieldResult::fail(message);
                }
            }
            Check::Custom { predicate, message } => {
                if !predicate(trimmed, &input.handle(rules.name())) {
                    return FieldResult::fail(message);
                }
            }
        }
    }

    FieldResult::pass()
}
