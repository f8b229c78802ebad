//! Submission pipeline
//!
//! A simulation stand-in for a real backend call, kept behind the single
//! seam [`SubmissionPipeline::submit`]: validate, wait out a latency window,
//! look up the duplicate key, then draw for success. A real transport would
//! replace the latency and the draw without touching validation.
//!
//! States per attempt:
//!
//! ```text
//! Idle -> Validating -> Rejected
//!                    -> Pending -> DuplicateFound
//!                               -> Succeeded
//!                               -> Failed
//! ```
//!
//! The final append re-checks uniqueness atomically, so two concurrent
//! submissions with the same key produce at most one `Succeeded`.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::IntakeConfig;
use crate::error::SubmitError;
use crate::forms::FormSpec;
use crate::input::FormInput;
use crate::phone;
use crate::record::Record;
use crate::store::{AppendOutcome, RecordStore};
use crate::validator::FormReport;

const FAILED_MESSAGE: &str = "Registration failed due to server error. Please try again.";

/// Terminal state of one submission attempt.
#[derive(Debug, Clone, Serialize)]
pub enum Outcome {
    /// Validation failed; no latency, no store access.
    Rejected(FormReport),
    /// The partition already holds a record under this key; carries the
    /// pre-existing record for summary rendering.
    DuplicateFound(Record),
    /// The record was appended to the store.
    Succeeded(Record),
    /// The simulated transient failure; retryable.
    Failed { message: String },
}

/// Validates input and drives it through the simulated backend.
pub struct SubmissionPipeline {
    spec: FormSpec,
    store: Arc<dyn RecordStore>,
    config: IntakeConfig,
    rng: Mutex<StdRng>,
}

impl SubmissionPipeline {
    pub fn new(spec: FormSpec, store: Arc<dyn RecordStore>, config: IntakeConfig) -> Self {
        Self::with_rng(spec, store, config, StdRng::from_entropy())
    }

    /// Pipeline with an explicit RNG, for deterministic tests.
    pub fn with_rng(
        spec: FormSpec,
        store: Arc<dyn RecordStore>,
        config: IntakeConfig,
        rng: StdRng,
    ) -> Self {
        Self {
            spec,
            store,
            config,
            rng: Mutex::new(rng),
        }
    }

    pub fn spec(&self) -> &FormSpec {
        &self.spec
    }

    /// Drive one attempt to a terminal [`Outcome`].
    pub async fn submit(&self, input: &FormInput) -> Result<Outcome, SubmitError> {
        let attempt = Uuid::new_v4();
        if let Some(rejected) = self.validate_and_wait(attempt, input).await {
            return Ok(rejected);
        }
        self.commit(attempt, input).await
    }

    /// Validation plus the latency window. Returns the early `Rejected`
    /// outcome, or `None` when the attempt is clear to hit the store.
    async fn validate_and_wait(&self, attempt: Uuid, input: &FormInput) -> Option<Outcome> {
        let variant = self.spec.variant;
        debug!(%attempt, ?variant, "validating submission");

        let report = self.spec.rules.validate_all(input);
        if !report.is_valid() {
            let failed = report.failures().count();
            info!(%attempt, ?variant, failed, "submission rejected by validation");
            return Some(Outcome::Rejected(report));
        }

        debug!(%attempt, ?variant, latency = ?self.config.latency, "pending");
        tokio::time::sleep(self.config.latency).await;
        None
    }

    /// The store phase: duplicate lookup, success draw, atomic append.
    async fn commit(&self, attempt: Uuid, input: &FormInput) -> Result<Outcome, SubmitError> {
        let variant = self.spec.variant;
        let partition = variant.partition();
        let key = phone::canonical_key(input.value(variant.unique_key_field()));
        if let Some(existing) = self.store.find_by_key(partition, &key).await? {
            info!(%attempt, ?variant, id = %existing.id, "duplicate registration");
            return Ok(Outcome::DuplicateFound(existing));
        }

        let draw: f64 = self.rng.lock().await.gen();
        if draw >= self.config.success_rate {
            warn!(%attempt, ?variant, "simulated transient failure");
            return Ok(Outcome::Failed {
                message: FAILED_MESSAGE.to_string(),
            });
        }

        let record = Record::new(variant.id_prefix(), input.values().clone());
        match self.store.append_unique(partition, &key, record.clone()).await? {
            AppendOutcome::Appended => {
                info!(%attempt, ?variant, id = %record.id, "registration succeeded");
                Ok(Outcome::Succeeded(record))
            }
            // A concurrent attempt with the same key won the append race
            // during our latency window.
            AppendOutcome::Duplicate(existing) => {
                info!(%attempt, ?variant, id = %existing.id, "duplicate registration");
                Ok(Outcome::DuplicateFound(existing))
            }
        }
    }

    /// Start an attempt on a background task and hand back a cancellable
    /// handle. A cancel that wins the race yields no store write; once the
    /// store phase has begun, the attempt runs to completion and the cancel
    /// loses.
    pub fn spawn(self: &Arc<Self>, input: FormInput) -> PendingSubmission {
        let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();
        let pipeline = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let attempt = Uuid::new_v4();
            // Cancellation races only validation and the latency window.
            // The store phase is never dropped mid-append, so a cancelled
            // caller cannot observe a half-applied write.
            tokio::select! {
                biased;
                early = pipeline.validate_and_wait(attempt, &input) => {
                    if let Some(outcome) = early {
                        return Ok(outcome);
                    }
                }
                _ = &mut cancel_rx => return Err(SubmitError::Cancelled),
            }
            pipeline.commit(attempt, &input).await
        });
        PendingSubmission {
            cancel: Some(cancel_tx),
            handle,
        }
    }
}

/// Handle to an in-flight submission. Dropping the handle without awaiting
/// [`PendingSubmission::outcome`] also cancels the attempt.
pub struct PendingSubmission {
    cancel: Option<oneshot::Sender<()>>,
    handle: JoinHandle<Result<Outcome, SubmitError>>,
}

impl PendingSubmission {
    /// Cancel the attempt. The background task yields
    /// [`SubmitError::Cancelled`] unless it had already entered the store
    /// phase or completed.
    pub fn cancel(&mut self) {
        if let Some(tx) = self.cancel.take() {
            let _ = tx.send(());
        }
    }

    /// Wait for the terminal result.
    pub async fn outcome(self) -> Result<Outcome, SubmitError> {
        let PendingSubmission { cancel, handle } = self;
        let joined = handle.await;
        // Keep the cancel sender alive until the task has finished, so that
        // awaiting the outcome is not itself a cancellation.
        drop(cancel);
        joined.map_err(|err| SubmitError::Background(err.to_string()))?
    }
}
