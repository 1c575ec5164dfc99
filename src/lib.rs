//! docket library.
//!
//! Tracks source files an AI coding agent touched and reminds it to document
//! them when it stops.

pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod heuristics;
pub mod ledger;
pub mod lock;
pub mod observer;
pub mod prompt;
pub mod reminder;
pub mod state;

#[cfg(test)]
mod testutil;

pub use classify::Classifier;
pub use config::Config;
pub use error::Error;
pub use ledger::{filter_existing, PendingLedger};
pub use observer::GitObserver;
