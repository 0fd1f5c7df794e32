use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use super::{AcquireError, AcquisitionRequest, Fetcher, HttpFetcher, Job, validate};
use crate::document::Document;

/// Result of a finished acquisition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Loaded(Document),
    Rejected(AcquireError),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AcquireState {
    #[default]
    Idle,
    Validating {
        generation: u64,
        label: String,
    },
}

type Report = (u64, Result<Document, AcquireError>);

/// Runs acquisitions off the UI thread, one live request at a time.
///
/// Every started job carries a generation number. Starting a new job
/// supersedes the previous one: its result is dropped when it arrives.
pub struct Acquirer {
    fetcher: Arc<dyn Fetcher>,
    tx: Sender<Report>,
    rx: Receiver<Report>,
    generation: u64,
    state: AcquireState,
}

impl Acquirer {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            fetcher,
            tx,
            rx,
            generation: 0,
            state: AcquireState::Idle,
        }
    }

    pub fn with_http() -> Self {
        Self::new(Arc::new(HttpFetcher::new()))
    }

    pub const fn state(&self) -> &AcquireState {
        &self.state
    }

    pub const fn is_loading(&self) -> bool {
        matches!(self.state, AcquireState::Validating { .. })
    }

    /// Validate `request` and start its job on a worker thread.
    ///
    /// Returns the generation of the started job, or `None` when the request
    /// had nothing to load. A request that fails validation leaves any
    /// in-flight job untouched.
    ///
    /// # Errors
    /// Returns the validation error (for example
    /// [`AcquireError::InvalidFileType`]) without starting anything.
    pub fn begin(&mut self, request: AcquisitionRequest) -> Result<Option<u64>, AcquireError> {
        let Some(job) = validate(request).inspect_err(|err| {
            tracing::warn!(error = %err, "acquisition rejected during validation");
        })?
        else {
            return Ok(None);
        };
        Ok(Some(self.spawn(job)))
    }

    fn spawn(&mut self, job: Job) -> u64 {
        self.generation += 1;
        let generation = self.generation;
        let label = job.label().to_string();
        if let AcquireState::Validating {
            generation: previous,
            ..
        } = &self.state
        {
            tracing::debug!(previous, generation, "superseding in-flight acquisition");
        }
        tracing::info!(generation, source = %label, "acquisition started");
        self.state = AcquireState::Validating { generation, label };

        let tx = self.tx.clone();
        let fetcher = Arc::clone(&self.fetcher);
        std::thread::spawn(move || {
            let result = job.run(fetcher.as_ref());
            let _ = tx.send((generation, result));
        });
        generation
    }

    /// Collect the result of the current job if it has finished.
    pub fn poll(&mut self) -> Option<Outcome> {
        while let Ok(report) = self.rx.try_recv() {
            if let Some(outcome) = self.accept(report) {
                return Some(outcome);
            }
        }
        None
    }

    /// Block until the current job finishes or `timeout` passes.
    pub fn wait(&mut self, timeout: Duration) -> Option<Outcome> {
        let deadline = Instant::now() + timeout;
        while self.is_loading() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(report) => {
                    if let Some(outcome) = self.accept(report) {
                        return Some(outcome);
                    }
                }
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => return None,
            }
        }
        None
    }

    fn accept(&mut self, (generation, result): Report) -> Option<Outcome> {
        let current = match &self.state {
            AcquireState::Validating { generation, .. } => Some(*generation),
            AcquireState::Idle => None,
        };
        if current != Some(generation) {
            tracing::debug!(generation, ?current, "discarding superseded acquisition result");
            return None;
        }
        self.state = AcquireState::Idle;
        Some(match result {
            Ok(document) => {
                tracing::info!(generation, name = %document.name, "acquisition loaded");
                Outcome::Loaded(document)
            }
            Err(err) => {
                tracing::warn!(generation, error = %err, "acquisition failed");
                Outcome::Rejected(err)
            }
        })
    }
}

impl std::fmt::Debug for Acquirer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Acquirer")
            .field("generation", &self.generation)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
