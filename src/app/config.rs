//! Pipeline settings resolved from flags and environment variables

use tracing::info;

/// Default ceiling on input file size (500 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 500 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Valid lines per batch
    pub batch_size: usize,
    /// Bound on in-flight batches; `None` is unbounded
    pub max_concurrent_batches: Option<usize>,
    /// Files larger than this are refused before reading
    pub max_upload_bytes: u64,
}

impl Config {
    /// Record the effective settings
    pub fn log_loaded(&self) {
        info!(
            batch_size = self.batch_size,
            max_concurrent_batches = ?self.max_concurrent_batches,
            max_upload_bytes = self.max_upload_bytes,
            "Configuration loaded"
        );
    }
}
