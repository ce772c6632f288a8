use tracing::warn;

use crate::io::LineError;

/// Policy for reporting rejected input lines
///
/// Rejected lines never stop the stream; the policy only decides how they
/// are reported. Every rejected line is also returned in the ingest report.
pub trait LineErrorPolicy: Send + Sync {
    /// Called once per rejected line, in input order
    fn on_line_error(&self, error: &LineError);

    /// Called once after the input is exhausted
    fn on_complete(&self, _errors: &[LineError]) {}
}

/// Log each rejected line as a warning, plus a summary (default)
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAndSkip;

impl LineErrorPolicy for LogAndSkip {
    fn on_line_error(&self, error: &LineError) {
        warn!(
            line = error.line,
            missing = ?error.missing,
            text = %error.text,
            "Skipping invalid line"
        );
    }

    fn on_complete(&self, errors: &[LineError]) {
        if !errors.is_empty() {
            warn!(line_errors = errors.len(), "Processed with line errors");
        }
    }
}

/// Skip rejected lines without logging
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSkip;

impl LineErrorPolicy for SilentSkip {
    fn on_line_error(&self, _error: &LineError) {}
}
