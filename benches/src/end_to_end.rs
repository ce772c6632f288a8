mod common;

use std::hint::black_box;

use common::{generate_dataset, setup_stores};
use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use futures::StreamExt;
use futures::io::Cursor;
use ingest::prelude::*;
use tokio::runtime::Runtime;

/// Benchmark the complete pipeline with different dataset sizes
fn bench_pipeline_dataset_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_sizes");
    let runtime = Runtime::new().unwrap();

    for (size_name, num_lines, num_clients) in [
        ("small_1k", 1_000, 100),
        ("medium_10k", 10_000, 1_000),
        ("large_100k", 100_000, 10_000),
    ] {
        group.bench_with_input(
            BenchmarkId::from_parameter(size_name),
            &(num_lines, num_clients),
            |b, &(num_lines, num_clients)| {
                b.to_async(&runtime).iter_batched(
                    || generate_dataset(num_lines, num_clients, 0),
                    |data| async move {
                        let (clients, transactions) = setup_stores();
                        let report = IngestPipeline::new(clients, transactions, SilentSkip)
                            .ingest_reader(Cursor::new(data))
                            .await
                            .unwrap();
                        black_box(report);
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

/// Benchmark batch size against concurrency on a fixed dataset
fn bench_batch_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_sizes");
    let runtime = Runtime::new().unwrap();
    let num_lines = 50_000;

    for (name, batch_size, max_concurrent) in [
        ("single_batch", 100_000, None),
        ("batches_of_5k_unbounded", 5_000, None),
        ("batches_of_5k_bounded_2", 5_000, Some(2)),
        ("batches_of_500_unbounded", 500, None),
    ] {
        group.bench_function(name, |b| {
            b.to_async(&runtime).iter_batched(
                || generate_dataset(num_lines, 1_000, 0),
                |data| async move {
                    let (clients, transactions) = setup_stores();
                    let report = IngestPipeline::new(clients, transactions, SilentSkip)
                        .with_batch_size(batch_size)
                        .with_max_concurrent_batches(max_concurrent)
                        .ingest_reader(Cursor::new(data))
                        .await
                        .unwrap();
                    black_box(report);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Benchmark re-ingesting an already stored dataset
fn bench_idempotent_reingest(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();
    let data = generate_dataset(10_000, 1_000, 0);

    c.bench_function("reingest_10k", |b| {
        b.to_async(&runtime).iter_batched(
            || {
                let (clients, transactions) = setup_stores();
                let pipeline = IngestPipeline::new(clients, transactions, SilentSkip);
                (pipeline, data.clone())
            },
            |(pipeline, data)| async move {
                pipeline.ingest_reader(Cursor::new(data.clone())).await.unwrap();
                black_box(pipeline.ingest_reader(Cursor::new(data)).await.unwrap());
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark parsing alone against the full pipeline
fn bench_parsing_vs_processing(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();
    let num_lines = 10_000;

    c.bench_function("parsing_only", |b| {
        b.to_async(&runtime).iter_batched(
            || generate_dataset(num_lines, 1_000, 10),
            |data| async move {
                let mut stream = LineRecordStream::new(Cursor::new(data));
                let mut count = 0;
                while let Some(outcome) = stream.next().await {
                    black_box(outcome.unwrap());
                    count += 1;
                }
                black_box(count);
            },
            BatchSize::SmallInput,
        );
    });

    c.bench_function("parse_and_store", |b| {
        b.to_async(&runtime).iter_batched(
            || generate_dataset(num_lines, 1_000, 10),
            |data| async move {
                let (clients, transactions) = setup_stores();
                let report = IngestPipeline::new(clients, transactions, SilentSkip)
                    .ingest_reader(Cursor::new(data))
                    .await
                    .unwrap();
                black_box(report);
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_pipeline_dataset_sizes,
    bench_batch_sizes,
    bench_idempotent_reingest,
    bench_parsing_vs_processing,
);

criterion_main!(benches);
