//! # User Profiles
//!
//! The simulated-user classes this tool ships with, each built as a goose
//! [`Scenario`]:
//! - `job-tracker`: public pages of the job tracker app plus a read-heavy
//!   Supabase REST query
//! - `app-tracking`: landing page of the hosted deployment

pub mod app_tracking;
pub mod job_tracker;

use goose::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::config::Config;
use crate::error::LoadTestError;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ProfileKind {
    JobTracker,
    AppTracking,
}

impl ProfileKind {
    pub fn build(self, cfg: &Config) -> Result<Scenario, LoadTestError> {
        match self {
            ProfileKind::JobTracker => job_tracker::scenario(cfg),
            ProfileKind::AppTracking => app_tracking::scenario(),
        }
    }

    pub fn all() -> Vec<ProfileKind> {
        ProfileKind::iter().collect()
    }
}

/// Build every profile selected in `run.profiles`, ignoring duplicates.
pub fn build_selected(cfg: &Config) -> Result<Vec<Scenario>, LoadTestError> {
    let mut seen = Vec::new();
    for kind in &cfg.run.profiles {
        if !seen.contains(kind) {
            seen.push(*kind);
        }
    }
    if seen.is_empty() {
        return Err(LoadTestError::NoProfiles);
    }
    seen.into_iter().map(|kind| kind.build(cfg)).collect()
}

/// A fixed page fetched with a plain GET relative to the scenario host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub name: &'static str,
    pub path: &'static str,
    pub weight: usize,
}

impl Page {
    pub const fn new(name: &'static str, path: &'static str, weight: usize) -> Self {
        Self { name, path, weight }
    }
}

/// Transaction named after the page that requests its path once per run.
pub fn page_transaction(page: &Page) -> Result<Transaction, GooseError> {
    let path = page.path;
    let function: TransactionFunction = Arc::new(move |user| {
        Box::pin(async move {
            let _goose = user.get(path).await?;

            Ok(())
        })
    });

    Transaction::new(function)
        .set_name(page.name)
        .set_weight(page.weight)
}

/// Uniform wait between `min_secs` and `max_secs` after each transaction.
pub(crate) fn with_wait_secs(
    scenario: Scenario,
    min_secs: u64,
    max_secs: u64,
) -> Result<Scenario, GooseError> {
    scenario.set_wait_time(
        Duration::from_secs(min_secs),
        Duration::from_secs(max_secs),
    )
}
