use std::path::Path;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::io::AsyncRead;
use futures::{Stream, StreamExt};
use tokio::fs::File;
use tokio_util::codec::{FramedRead, LinesCodec};
use tokio_util::compat::FuturesAsyncReadCompatExt;

use super::error::IoError;
use super::parse::{LineError, RawTransactionRecord, ValidatedTransaction};

/// Result of parsing one non-blank input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Valid(ValidatedTransaction),
    Invalid(LineError),
}

/// Async stream of parsed lines from `key:value;...` input
///
/// Yields one [`LineOutcome`] per non-blank line, in input order. An `Err`
/// item means the underlying source failed and the stream should be abandoned.
pub struct LineRecordStream {
    inner: Pin<Box<dyn Stream<Item = Result<LineOutcome, IoError>> + Send>>,
}

impl LineRecordStream {
    /// Create a new line stream from an async reader
    pub fn new<R>(reader: R) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        Self::from_tokio_reader(reader.compat())
    }

    /// Create a new line stream from a file path
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let file = File::open(path.as_ref()).await?;
        Ok(Self::from_tokio_reader(file))
    }

    /// Like [`from_file`](Self::from_file), but refuses files larger than `max_bytes`
    pub async fn from_file_limited(
        path: impl AsRef<Path>,
        max_bytes: u64,
    ) -> Result<Self, IoError> {
        let file = File::open(path.as_ref()).await?;
        let size = file.metadata().await?.len();
        if size > max_bytes {
            return Err(IoError::TooLarge {
                size,
                limit: max_bytes,
            });
        }
        Ok(Self::from_tokio_reader(file))
    }

    fn from_tokio_reader<R>(reader: R) -> Self
    where
        R: tokio::io::AsyncRead + Unpin + Send + 'static,
    {
        // Every physical line is framed, blank ones included, so the index is the line number
        let stream = FramedRead::new(reader, LinesCodec::new())
            .enumerate()
            .filter_map(|(index, result)| async move {
                match result {
                    Ok(text) => classify(index as u64 + 1, text).map(Ok),
                    Err(e) => Some(Err(IoError::from(e))),
                }
            });

        Self {
            inner: Box::pin(stream),
        }
    }
}

/// Parse one physical line; `None` for blank lines
fn classify(line: u64, text: String) -> Option<LineOutcome> {
    if text.trim().is_empty() {
        return None;
    }

    let raw = RawTransactionRecord::parse_line(&text);
    let missing = raw.missing_fields();
    let outcome = match raw.validate() {
        Ok(validated) => LineOutcome::Valid(validated),
        Err(_) => LineOutcome::Invalid(LineError {
            line,
            text,
            missing,
        }),
    };
    Some(outcome)
}

impl Stream for LineRecordStream {
    type Item = Result<LineOutcome, IoError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}
