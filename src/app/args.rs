use std::path::PathBuf;

use clap::builder::RangedU64ValueParser;
use clap::{Args, Parser, ValueEnum};

use super::config::{Config, DEFAULT_MAX_UPLOAD_BYTES};
use crate::engine::BatchAccumulator;
use crate::storage::{Pagination, Sort, SortField, SortOrder, TransactionFilter};

/// Bulk transaction file ingestion
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "ingest")]
#[command(about = "Ingest key:value transaction files into the client and transaction stores")]
#[command(version)]
pub struct CliArgs {
    /// Input files, ingested in order
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Valid lines per batch
    #[arg(
        long,
        env = "INGEST_BATCH_SIZE",
        default_value_t = BatchAccumulator::DEFAULT_BATCH_SIZE,
        value_parser = positive()
    )]
    pub batch_size: usize,

    /// Maximum batches in flight (unbounded when unset)
    #[arg(long = "max-concurrent", env = "INGEST_MAX_CONCURRENT_BATCHES", value_parser = positive())]
    pub max_concurrent_batches: Option<usize>,

    /// Refuse input files larger than this many bytes
    #[arg(
        long,
        env = "INGEST_MAX_UPLOAD_BYTES",
        default_value_t = DEFAULT_MAX_UPLOAD_BYTES,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub max_upload_bytes: u64,

    #[command(flatten)]
    pub query: QueryArgs,
}

/// Read-path request issued after ingestion
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryArgs {
    /// Print one page of stored transactions after ingesting
    #[arg(long)]
    pub query: bool,

    /// Case-insensitive regular expression on the client name
    #[arg(long, requires = "query")]
    pub name: Option<String>,

    /// Inclusive lower date bound (YYYY-MM-DD or RFC 3339)
    #[arg(long, requires = "query")]
    pub start_date: Option<String>,

    /// Inclusive upper date bound (YYYY-MM-DD or RFC 3339)
    #[arg(long, requires = "query")]
    pub end_date: Option<String>,

    /// Page number, starting at 1 [default: 1]
    #[arg(long, requires = "query", value_parser = positive())]
    pub page: Option<usize>,

    /// Transactions per page [default: 10]
    #[arg(long, requires = "query", value_parser = positive())]
    pub limit: Option<usize>,

    /// Sort field [default: date]
    #[arg(long, value_enum, requires = "query")]
    pub sort: Option<SortKey>,

    /// Sort direction [default: desc]
    #[arg(long, value_enum, requires = "query")]
    pub order: Option<Direction>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Date,
    Amount,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl From<SortKey> for SortField {
    fn from(key: SortKey) -> Self {
        match key {
            SortKey::Date => SortField::Date,
            SortKey::Amount => SortField::Amount,
        }
    }
}

impl From<Direction> for SortOrder {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Asc => SortOrder::Asc,
            Direction::Desc => SortOrder::Desc,
        }
    }
}

impl CliArgs {
    /// Pipeline settings, with flags taking precedence over the environment
    pub fn config(&self) -> Config {
        Config {
            batch_size: self.batch_size,
            max_concurrent_batches: self.max_concurrent_batches,
            max_upload_bytes: self.max_upload_bytes,
        }
    }
}

impl QueryArgs {
    /// Filter and page to read, or `None` without `--query`
    pub fn request(&self) -> Option<(TransactionFilter, Pagination)> {
        if !self.query {
            return None;
        }

        let filter = TransactionFilter {
            name: self.name.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
        };

        let defaults = Pagination::default();
        let sort = Sort {
            field: self.sort.map_or(defaults.sort.field, SortField::from),
            order: self.order.map_or(defaults.sort.order, SortOrder::from),
        };
        let pagination = Pagination::new(
            self.page.unwrap_or(defaults.page),
            self.limit.unwrap_or(defaults.limit),
        )
        .with_sort(sort);

        Some((filter, pagination))
    }
}

fn positive() -> RangedU64ValueParser<usize> {
    RangedU64ValueParser::new().range(1..)
}
