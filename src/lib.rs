//! Load generator for the job tracker web app.
//!
//! Each user profile becomes a goose scenario: simulated users run its
//! weighted transactions, one GET request each, and pause for a random wait
//! between them. The resolved configuration drives the goose attack and the
//! final metrics are condensed into a run summary.

pub mod attack;
pub mod cli;
pub mod config;
pub mod error;
pub mod profiles;
pub mod report;
pub mod telemetry;

pub use error::LoadTestError;
