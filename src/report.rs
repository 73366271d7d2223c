use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::path::PathBuf;

use crate::error::{IngestError, IngestResult};
use crate::ingest::IngestionSpec;

/// What a single ingestion call did to its destination table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IngestOutcome {
    /// The table already existed and was left untouched.
    Skipped,
    /// The table was created from the source file and now holds `rows` rows
    /// (`None` when the load succeeded but counting afterwards did not).
    Loaded { rows: Option<u64> },
}

impl IngestOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, IngestOutcome::Loaded { .. })
    }
}

/// One row of the run summary printed by the binary.
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub source: PathBuf,
    pub schema: String,
    pub table: String,
    pub outcome: IngestOutcome,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl IngestReport {
    /// Time `f` and record its outcome against `spec`.
    pub fn run<F>(spec: &IngestionSpec, f: F) -> IngestResult<Self>
    where
        F: FnOnce() -> IngestResult<IngestOutcome>,
    {
        let started_at = Utc::now();
        let outcome = f()?;
        let finished_at = Utc::now();
        Ok(Self {
            source: spec.source_path().to_path_buf(),
            schema: spec.schema().to_string(),
            table: spec.table().to_string(),
            outcome,
            started_at,
            finished_at,
        })
    }

    pub fn elapsed(&self) -> Duration {
        self.finished_at - self.started_at
    }
}

/// A job that did not produce an `IngestReport`.
#[derive(Debug, Clone, Serialize)]
pub struct FailedJob {
    pub source: PathBuf,
    pub schema: String,
    pub table: String,
    pub error: String,
}

/// One entry of the run summary, successful or not.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum JobSummary {
    Finished(IngestReport),
    Failed(FailedJob),
}

impl JobSummary {
    /// Record `err` (with its full cause chain) against `spec`.
    pub fn failed(spec: &IngestionSpec, err: &IngestError) -> Self {
        let mut error = err.to_string();
        let mut cause = std::error::Error::source(err);
        while let Some(c) = cause {
            error.push_str(": ");
            error.push_str(&c.to_string());
            cause = std::error::Error::source(c);
        }
        JobSummary::Failed(FailedJob {
            source: spec.source_path().to_path_buf(),
            schema: spec.schema().to_string(),
            table: spec.table().to_string(),
            error,
        })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, JobSummary::Failed(_))
    }
}
