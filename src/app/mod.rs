pub mod args;
pub mod cli;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types
pub use args::{CliArgs, QueryArgs};
pub use cli::CliApp;
pub use config::Config;
pub use error::AppError;
pub use telemetry::setup_logging;
