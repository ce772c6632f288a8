use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use futures::io::AsyncRead;
use futures::{Stream, StreamExt};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use super::error::IngestError;
use super::policy::LineErrorPolicy;
use super::report::IngestReport;
use crate::domain::BulkWriteResult;
use crate::engine::{Batch, BatchAccumulator, BatchProcessor, EngineError};
use crate::io::{IoError, LineOutcome, LineRecordStream};
use crate::storage::{ClientStore, TransactionStore};

type BatchHandle = JoinHandle<Result<BulkWriteResult, EngineError>>;

/// Primary API for ingesting a line stream into the stores
///
/// Lines are read sequentially and grouped into batches; each full batch is
/// handed to its own tokio task (client reconciliation, then transaction
/// upsert) without waiting for earlier batches. Batches carry no ordering
/// guarantee relative to each other.
pub struct IngestPipeline<P>
where
    P: LineErrorPolicy,
{
    processor: BatchProcessor,
    error_policy: P,
    batch_size: usize,
    max_concurrent_batches: Option<usize>,
}

impl<P> IngestPipeline<P>
where
    P: LineErrorPolicy,
{
    /// Create a new pipeline over shared stores
    ///
    /// # Example
    /// ```rust,ignore
    /// let clients = Arc::new(ConcurrentClientStore::new());
    /// let transactions = Arc::new(ConcurrentTransactionStore::new(clients.clone()));
    ///
    /// let report = IngestPipeline::new(clients, transactions, LogAndSkip)
    ///     .ingest_file("transactions.txt")
    ///     .await?;
    /// ```
    pub fn new(
        clients: Arc<dyn ClientStore>,
        transactions: Arc<dyn TransactionStore>,
        error_policy: P,
    ) -> Self {
        Self {
            processor: BatchProcessor::new(clients, transactions),
            error_policy,
            batch_size: BatchAccumulator::DEFAULT_BATCH_SIZE,
            max_concurrent_batches: None,
        }
    }

    /// Set the number of valid lines per batch (defaults to 100,000)
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Bound the number of batches in flight (defaults to unbounded)
    ///
    /// When the bound is reached, reading pauses until a batch finishes.
    pub fn with_max_concurrent_batches(mut self, limit: Option<usize>) -> Self {
        self.max_concurrent_batches = limit.map(|n| n.max(1));
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Ingest a file by path
    pub async fn ingest_file(&self, path: impl AsRef<Path>) -> Result<IngestReport, IngestError> {
        let stream = LineRecordStream::from_file(path).await?;
        self.ingest(stream).await
    }

    /// Ingest raw bytes from an async reader
    pub async fn ingest_reader<R>(&self, reader: R) -> Result<IngestReport, IngestError>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        self.ingest(LineRecordStream::new(reader)).await
    }

    /// Ingest a stream of parsed lines
    ///
    /// Fails on the first read error, or after every dispatched batch has
    /// finished if any batch failed (the earliest dispatched failure wins).
    pub async fn ingest<S>(&self, mut stream: S) -> Result<IngestReport, IngestError>
    where
        S: Stream<Item = Result<LineOutcome, IoError>> + Unpin,
    {
        let started = Instant::now();
        let limiter = self
            .max_concurrent_batches
            .map(|n| Arc::new(Semaphore::new(n)));

        let mut accumulator = BatchAccumulator::new(self.batch_size);
        let mut handles: Vec<(usize, BatchHandle)> = Vec::new();
        let mut line_errors = Vec::new();
        let mut prepared = Instant::now();

        while let Some(item) = stream.next().await {
            match item? {
                LineOutcome::Valid(record) => {
                    if let Some(batch) = accumulator.push(record) {
                        debug!(
                            sequence = batch.sequence,
                            lines = batch.len(),
                            elapsed_ms = prepared.elapsed().as_millis() as u64,
                            "Batch prepared"
                        );
                        handles.push(self.dispatch(batch, limiter.as_ref()).await);
                        prepared = Instant::now();
                    }
                }
                LineOutcome::Invalid(line_error) => {
                    self.error_policy.on_line_error(&line_error);
                    line_errors.push(line_error);
                }
            }
        }

        if let Some(batch) = accumulator.finish() {
            debug!(
                sequence = batch.sequence,
                lines = batch.len(),
                elapsed_ms = prepared.elapsed().as_millis() as u64,
                "Final batch prepared"
            );
            handles.push(self.dispatch(batch, limiter.as_ref()).await);
        }

        self.error_policy.on_complete(&line_errors);

        let batches = handles.len();
        let mut totals = BulkWriteResult::default();
        let mut first_failure: Option<IngestError> = None;

        // Await every batch, even after a failure, so none is left running
        for (sequence, handle) in handles {
            let outcome = match handle.await {
                Ok(result) => result,
                Err(join_error) => Err(EngineError::BatchTask(join_error.to_string())),
            };
            match outcome {
                Ok(result) => totals = totals.merge(result),
                Err(source) => {
                    error!(sequence, error = %source, "Batch failed");
                    first_failure.get_or_insert(IngestError::Batch { sequence, source });
                }
            }
        }

        if let Some(failure) = first_failure {
            return Err(failure);
        }

        let report = IngestReport {
            processed_count: totals.total_processed,
            modified_count: totals.modified_count,
            inserted_count: totals.inserted_count,
            batches,
            execution_time: started.elapsed(),
            line_errors,
        };
        info!(
            processed = report.processed_count,
            inserted = report.inserted_count,
            modified = report.modified_count,
            batches = report.batches,
            line_errors = report.line_errors.len(),
            execution_time = %report.execution_time_display(),
            "Ingestion complete"
        );
        Ok(report)
    }

    /// Spawn one batch, waiting for a slot first when concurrency is bounded
    async fn dispatch(&self, batch: Batch, limiter: Option<&Arc<Semaphore>>) -> (usize, BatchHandle) {
        // The semaphore is never closed, so acquisition only fails if it is
        let permit = match limiter {
            Some(semaphore) => Arc::clone(semaphore).acquire_owned().await.ok(),
            None => None,
        };

        let sequence = batch.sequence;
        let processor = self.processor.clone();
        let handle = tokio::spawn(async move {
            let _permit = permit;
            processor.process(batch).await
        });

        (sequence, handle)
    }
}
