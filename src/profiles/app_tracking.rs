//! Hosted deployment smoke load: only the landing page, fixed host.

use goose::prelude::*;

use super::{page_transaction, with_wait_secs, Page};
use crate::error::LoadTestError;

pub const PROFILE_NAME: &str = "app-tracking";
pub const HOST: &str = "https://app-tracking-laboral-sf.onrender.com";

const LANDING: Page = Page::new("GET /", "/", 1);

/// The scenario host wins over the attack-wide host, so neither
/// configuration nor `--host` moves these users.
pub fn scenario() -> Result<Scenario, LoadTestError> {
    let scenario = with_wait_secs(scenario!(PROFILE_NAME).set_host(HOST), 2, 5)?;
    Ok(scenario.register_transaction(page_transaction(&LANDING)?))
}
