//! `aicron-core` — configuration and shared error types.
//!
//! Everything under `~/.aicron/` belongs to aicron: the SQLite database,
//! the optional `aicron.toml` config file, and the cron log the installed
//! crontab lines redirect into.

pub mod config;
pub mod error;

pub use config::AicronConfig;
pub use error::{AicronError, Result};
