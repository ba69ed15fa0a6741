//! `aicron-runner` — executes one job's prompt through a configurable
//! command under a hard timeout and records the outcome exactly once.
//!
//! The configured command string (default `claude -p`) is tokenized with
//! quote-aware splitting and resolved on PATH before any run record
//! exists; from the moment a run row is created, every path — normal
//! exit, spawn failure, timeout, output-collection failure — ends in a
//! single `finish_run` call, so no run is left permanently in flight.

pub mod command;
pub mod error;
pub mod runner;

pub use command::{resolve, tokenize, ResolvedCommand};
pub use error::{Result, RunnerError};
pub use runner::{execute, RunOutcome, FAULT_EXIT_CODE};
