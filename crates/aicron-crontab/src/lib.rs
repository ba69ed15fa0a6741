//! `aicron-crontab` — keeps the user's crontab in sync with the job
//! registry through idempotent marker-tagged entries.
//!
//! Each managed job owns exactly one two-line block in the crontab:
//!
//! ```text
//! # aicron:job:7
//! 0 9 * * * PATH=… HOME=… /path/to/aicron run 7 >> ~/.aicron/cron.log 2>&1
//! ```
//!
//! All other lines — foreign cron entries, comments, blanks — pass through
//! byte-for-byte in their original order. The table is edited as a whole:
//! read via `crontab -l`, transformed in memory, written back in one
//! `crontab -` invocation. A snapshot hash taken at first read is checked
//! against a re-read just before writing so a concurrent edit fails loudly
//! instead of being silently overwritten.

pub mod error;
pub mod sync;
pub mod table;

pub use error::{CrontabError, Result};
