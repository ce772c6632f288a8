//! Bulk ingestion of `key:value;...` transaction files
//!
//! Lines are parsed and validated, grouped into fixed-size batches, and each
//! batch is written concurrently: clients are upserted by document first,
//! then transactions are upserted by id with the resolved client reference.

pub mod app;
pub mod domain;
pub mod engine;
pub mod io;
pub mod prelude;
pub mod storage;
pub mod streaming;
