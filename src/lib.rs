//! Registration intake engine
//!
//! A declarative field-validation engine with the thin collaborators it needs
//! to be a complete, testable system: a simulated submission pipeline and a
//! partitioned record store.
//!
//! The flow mirrors a client-side registration form without any UI coupling:
//!
//! ```text
//! FormInput -> RuleSet::validate_all -> FormReport
//!                     |
//!              SubmissionPipeline::submit
//!                     |
//!        Outcome (Rejected | DuplicateFound | Succeeded | Failed)
//!                     |
//!              RecordStore (memory or JSON file)
//! ```
//!
//! Rule tables are built once through [`rules::RuleSetBuilder`] and are
//! immutable afterwards; the three built-in form catalogs live in [`forms`].
//! The submission pipeline isolates the simulated backend behind a single
//! seam ([`submit::SubmissionPipeline::submit`]) so a real transport can
//! replace the latency window and success draw without touching validation.

pub mod config;
pub mod error;
pub mod forms;
pub mod input;
pub mod phone;
pub mod record;
pub mod rules;
pub mod store;
pub mod submit;
pub mod validator;

pub use config::IntakeConfig;
pub use error::{ConfigError, IntakeError, RuleSetError, StoreError, SubmitError};
pub use forms::{FormSpec, FormVariant};
pub use input::{Attachment, FieldHandle, FormInput};
pub use record::Record;
pub use rules::{Check, FieldBuilder, FieldRules, RuleSet, RuleSetBuilder};
pub use store::{AppendOutcome, JsonFileStore, MemoryStore, RecordStore};
pub use submit::{Outcome, PendingSubmission, SubmissionPipeline};
pub use validator::{FieldResult, FormReport};
