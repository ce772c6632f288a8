use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::info;

use ingest::prelude::*;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    CliApp::new("ingest")
        .run(|stdout| run_ingestion(stdout, args))
        .await
}

/// Ingest every file in order into one store pair, then optionally query it
async fn run_ingestion<W>(mut stdout: W, args: CliArgs) -> Result<(), AppError>
where
    W: AsyncWrite + Unpin,
{
    setup_logging()?;
    let config = args.config();
    config.log_loaded();

    let clients = Arc::new(ConcurrentClientStore::new());
    let transactions = Arc::new(ConcurrentTransactionStore::new(clients.clone()));

    let pipeline = IngestPipeline::new(clients.clone(), transactions.clone(), LogAndSkip)
        .with_batch_size(config.batch_size)
        .with_max_concurrent_batches(config.max_concurrent_batches);

    for file in &args.files {
        let stream = LineRecordStream::from_file_limited(file, config.max_upload_bytes)
            .await
            .map_err(|e| match e {
                IoError::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
                    AppError::FileNotFound(file.display().to_string())
                }
                other => AppError::from(other),
            })?;

        info!(file = %file.display(), "Ingesting file");
        let report = pipeline.ingest(stream).await?;

        write_json_line(&mut stdout, &report.summary()).await?;
    }

    if let Some((filter, pagination)) = args.query.request() {
        let page = transactions.paginate(&filter, &pagination).await?;
        write_json_line(&mut stdout, &page).await?;
    }

    stdout.flush().await?;
    Ok(())
}

async fn write_json_line<W, T>(out: &mut W, value: &T) -> Result<(), AppError>
where
    W: AsyncWrite + Unpin,
    T: serde::Serialize,
{
    let mut line = serde_json::to_vec(value)?;
    line.push(b'\n');
    out.write_all(&line).await?;
    Ok(())
}
