//! Job tracker web app: landing, auth pages, dashboard shell and a
//! snapshot of the jobs table through Supabase REST.

use goose::prelude::*;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use std::sync::Arc;
use tracing::debug;

use super::{page_transaction, with_wait_secs, Page};
use crate::config::{Config, SupabaseConfig};
use crate::error::LoadTestError;

pub const PROFILE_NAME: &str = "job-tracker";
pub const JOBS_SNAPSHOT_TASK: &str = "supabase jobs list";
pub const JOBS_SNAPSHOT_WEIGHT: usize = 1;
pub const JOBS_SNAPSHOT_PATH: &str = "/jobs?select=id,date,status&order=date.desc&limit=50";

const APIKEY: &str = "apikey";

pub const PAGES: [Page; 4] = [
    Page::new("landing", "/", 3),
    Page::new("login", "/login", 2),
    Page::new("register", "/register", 2),
    Page::new("dashboard shell", "/app/dashboard", 1),
];

/// No scenario host: users target the attack-wide host, which comes from
/// `web.host` (`LOCUST_WEB_HOST`, `--host`).
pub fn scenario(cfg: &Config) -> Result<Scenario, LoadTestError> {
    let mut scenario = with_wait_secs(scenario!(PROFILE_NAME), 1, 3)?;
    for page in &PAGES {
        scenario = scenario.register_transaction(page_transaction(page)?);
    }
    Ok(scenario.register_transaction(jobs_snapshot(&cfg.supabase)?))
}

/// `{url}/rest/v1` with trailing slashes of `url` removed, when a URL is set.
pub fn supabase_rest_url(supabase: &SupabaseConfig) -> Option<String> {
    supabase
        .url()
        .map(|url| format!("{}/rest/v1", url.trim_end_matches('/')))
}

/// `apikey` and `Authorization: Bearer` for the anon key; empty without a key.
pub fn supabase_headers(supabase: &SupabaseConfig) -> Result<HeaderMap, LoadTestError> {
    let mut headers = HeaderMap::new();
    let Some(key) = supabase.anon_key() else {
        return Ok(headers);
    };

    let mut apikey =
        HeaderValue::from_str(key).map_err(|_| LoadTestError::InvalidHeader(APIKEY))?;
    apikey.set_sensitive(true);
    let mut bearer = HeaderValue::from_str(&format!("Bearer {key}"))
        .map_err(|_| LoadTestError::InvalidHeader("authorization"))?;
    bearer.set_sensitive(true);

    headers.insert(APIKEY, apikey);
    headers.insert(AUTHORIZATION, bearer);
    Ok(headers)
}

pub fn jobs_snapshot(supabase: &SupabaseConfig) -> Result<Transaction, LoadTestError> {
    let snapshot = Arc::new(JobsSnapshot::new(supabase)?);
    let function: TransactionFunction = Arc::new(move |user| {
        let snapshot = Arc::clone(&snapshot);
        Box::pin(async move { snapshot.send(user).await })
    });

    Ok(Transaction::new(function)
        .set_name(JOBS_SNAPSHOT_TASK)
        .set_weight(JOBS_SNAPSHOT_WEIGHT)?)
}

/// Latest 50 jobs through Supabase REST. Sends nothing unless both the URL
/// and the anon key are configured.
#[derive(Debug, Clone)]
pub struct JobsSnapshot {
    url: Option<String>,
    headers: HeaderMap,
}

impl JobsSnapshot {
    pub fn new(supabase: &SupabaseConfig) -> Result<Self, LoadTestError> {
        match (supabase_rest_url(supabase), supabase.anon_key()) {
            (Some(rest), Some(_)) => Ok(Self {
                url: Some(format!("{rest}{JOBS_SNAPSHOT_PATH}")),
                headers: supabase_headers(supabase)?,
            }),
            _ => Ok(Self {
                url: None,
                headers: HeaderMap::new(),
            }),
        }
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    async fn send(&self, user: &mut GooseUser) -> TransactionResult {
        let Some(url) = self.url.as_deref() else {
            debug!(task = JOBS_SNAPSHOT_TASK, "Supabase not configured, skipping");
            return Ok(());
        };

        let mut request_builder = user.get_request_builder(&GooseMethod::Get, url)?;
        for (name, value) in &self.headers {
            request_builder = request_builder.header(name.as_str(), value.as_bytes());
        }
        let goose_request = GooseRequest::builder()
            .method(GooseMethod::Get)
            .path(url)
            .name(JOBS_SNAPSHOT_TASK)
            .set_request_builder(request_builder)
            .build();
        let _goose = user.request(goose_request).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::time::Duration;

    fn supabase(url: Option<&str>, key: Option<&str>) -> SupabaseConfig {
        SupabaseConfig {
            url: url.map(str::to_string),
            anon_key: key.map(str::to_string),
        }
    }

    #[test]
    fn test_scenario_shape() {
        let scenario = scenario(&Config::default()).unwrap();
        assert_eq!(scenario.name, "job-tracker");
        assert!(scenario.host.is_none());
        assert_eq!(
            scenario.transaction_wait,
            Some((Duration::from_secs(1), Duration::from_secs(3)))
        );
    }

    #[test]
    fn test_transaction_weights() {
        let scenario = scenario(&Config::default()).unwrap();
        let weights: Vec<(&str, usize)> = scenario
            .transactions
            .iter()
            .map(|t| (t.name.as_str(), t.weight))
            .collect();
        assert_eq!(
            weights,
            vec![
                ("landing", 3),
                ("login", 2),
                ("register", 2),
                ("dashboard shell", 1),
                ("supabase jobs list", 1),
            ]
        );
    }

    #[test]
    fn test_page_paths() {
        let paths: Vec<&str> = PAGES.iter().map(|p| p.path).collect();
        assert_eq!(paths, vec!["/", "/login", "/register", "/app/dashboard"]);
    }

    #[test]
    fn test_no_supabase_url_skips() {
        let snapshot = JobsSnapshot::new(&supabase(None, Some("key"))).unwrap();
        assert!(snapshot.url().is_none());
        assert!(snapshot.headers().is_empty());
    }

    #[test]
    fn test_no_anon_key_skips() {
        let snapshot = JobsSnapshot::new(&supabase(Some("https://abc.supabase.co"), None)).unwrap();
        assert!(snapshot.url().is_none());
    }

    #[test]
    fn test_snapshot_url_and_headers() {
        let snapshot = JobsSnapshot::new(&supabase(
            Some("https://abc.supabase.co//"),
            Some("anon-key"),
        ))
        .unwrap();

        assert_eq!(
            snapshot.url(),
            Some("https://abc.supabase.co/rest/v1/jobs?select=id,date,status&order=date.desc&limit=50")
        );
        let headers = snapshot.headers();
        assert_eq!(headers.get("apikey").unwrap(), "anon-key");
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer anon-key");
        assert!(headers.get("apikey").unwrap().is_sensitive());
    }

    #[test]
    fn test_headers_empty_without_key() {
        let headers = supabase_headers(&supabase(Some("https://abc.supabase.co"), None)).unwrap();
        assert!(headers.is_empty());
        assert!(headers.get("apikey").is_none());
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_rest_url_trims_trailing_slash() {
        assert_eq!(
            supabase_rest_url(&supabase(Some("https://abc.supabase.co/"), None)).as_deref(),
            Some("https://abc.supabase.co/rest/v1")
        );
        assert!(supabase_rest_url(&supabase(None, None)).is_none());
    }

    #[test]
    fn test_invalid_key_is_rejected() {
        let cfg = supabase(Some("https://abc.supabase.co"), Some("bad\nkey"));
        let err = JobsSnapshot::new(&cfg).unwrap_err();
        assert!(matches!(err, LoadTestError::InvalidHeader("apikey")));
    }

    #[test]
    fn test_invalid_key_without_url_still_builds() {
        let mut cfg = Config::default();
        cfg.supabase = supabase(None, Some("bad\nkey"));

        let scenario = scenario(&cfg).unwrap();
        assert_eq!(scenario.transactions.len(), 5);

        let snapshot = JobsSnapshot::new(&cfg.supabase).unwrap();
        assert!(snapshot.url().is_none());
        assert!(snapshot.headers().is_empty());
    }

    proptest! {
        #[test]
        fn test_rest_url_never_doubles_slashes(slashes in 0usize..8) {
            let url = format!("https://abc.supabase.co{}", "/".repeat(slashes));
            let rest = supabase_rest_url(&supabase(Some(&url), None)).unwrap();
            prop_assert_eq!(rest, "https://abc.supabase.co/rest/v1");
        }
    }
}
