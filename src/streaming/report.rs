use std::time::Duration;

use serde::Serialize;

use crate::io::LineError;

/// Aggregate outcome of one ingestion run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    /// Valid lines written across all batches
    pub processed_count: usize,
    /// Existing transactions whose stored values changed
    pub modified_count: usize,
    pub inserted_count: usize,
    pub batches: usize,
    pub execution_time: Duration,
    /// Rejected lines in input order
    pub line_errors: Vec<LineError>,
}

impl IngestReport {
    /// Wall-clock time as `"{seconds} seconds"` with millisecond precision
    pub fn execution_time_display(&self) -> String {
        format!("{:.3} seconds", self.execution_time.as_secs_f64())
    }

    /// Caller-facing summary
    pub fn summary(&self) -> IngestSummary {
        IngestSummary {
            processed_count: self.processed_count,
            modified_count: self.modified_count,
            execution_time: self.execution_time_display(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestSummary {
    pub processed_count: usize,
    pub modified_count: usize,
    pub execution_time: String,
}
