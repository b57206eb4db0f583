use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{de::Error as _, Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::LoadTestError;
use crate::profiles::ProfileKind;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const ENV_PREFIX: &str = "LOCUST_";
pub const DEFAULT_WEB_HOST: &str = "http://localhost:3000";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub web: WebConfig,
    pub supabase: SupabaseConfig,
    pub run: RunConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub host: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_WEB_HOST.to_string(),
        }
    }
}

/// Optional Supabase REST backend. Empty values count as unset.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SupabaseConfig {
    pub url: Option<String>,
    pub anon_key: Option<String>,
}

impl SupabaseConfig {
    pub fn url(&self) -> Option<&str> {
        non_empty(self.url.as_deref())
    }

    pub fn anon_key(&self) -> Option<&str> {
        non_empty(self.anon_key.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub users: usize,
    pub spawn_rate: f64,
    /// Seconds (number) or a humantime string such as `"5m"`.
    #[serde(deserialize_with = "deserialize_opt_duration")]
    pub time: Option<Duration>,
    /// Stop each user after this many passes over its transactions.
    pub iterations: Option<usize>,
    pub request_timeout_seconds: u64,
    /// 0 disables the periodic running metrics.
    pub stats_interval_seconds: u64,
    pub profiles: Vec<ProfileKind>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            users: 1,
            spawn_rate: 1.0,
            time: None,
            iterations: None,
            request_timeout_seconds: 60,
            stats_interval_seconds: 10,
            profiles: vec![ProfileKind::JobTracker],
        }
    }
}

impl RunConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Running metrics period, `None` when disabled.
    pub fn stats_interval(&self) -> Option<Duration> {
        (self.stats_interval_seconds > 0)
            .then(|| Duration::from_secs(self.stats_interval_seconds))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub json_path: Option<PathBuf>,
    /// goose HTML report.
    pub html_path: Option<PathBuf>,
    /// Process exit code when at least one request failed.
    pub fail_exit_code: i32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            json_path: None,
            html_path: None,
            fail_exit_code: 1,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDuration {
    Seconds(u64),
    Text(String),
}

fn deserialize_opt_duration<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawDuration>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawDuration::Seconds(secs)) => Ok(Some(Duration::from_secs(secs))),
        Some(RawDuration::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(RawDuration::Text(text)) => humantime::parse_duration(text.trim())
            .map(Some)
            .map_err(D::Error::custom),
    }
}

impl Config {
    /// Built-in defaults, then `config/default.toml` if present, then `LOCUST_*`.
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, figment::Error> {
        Self::figment(path.as_ref()).extract()
    }

    /// `LOCUST_<SECTION>_<KEY>` maps onto `<section>.<key>`, so
    /// `LOCUST_SUPABASE_ANON_KEY` lands in `supabase.anon_key`.
    pub fn figment(path: &Path) -> Figment {
        Figment::new().merge(Toml::file(path)).merge(
            Env::prefixed(ENV_PREFIX).map(|key| key.as_str().replacen('_', ".", 1).into()),
        )
    }

    pub fn validate(&self) -> Result<(), LoadTestError> {
        let host = self.web.host.trim();
        if !(host.starts_with("http://") || host.starts_with("https://")) {
            return Err(LoadTestError::InvalidConfig(format!(
                "web.host must be an http(s) URL, got `{host}`"
            )));
        }
        if let Some(url) = self.supabase.url() {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(LoadTestError::InvalidConfig(format!(
                    "supabase.url must be an http(s) URL, got `{url}`"
                )));
            }
        }
        if self.run.request_timeout_seconds == 0 {
            return Err(LoadTestError::InvalidConfig(
                "run.request_timeout_seconds must be positive".to_string(),
            ));
        }
        if self.run.users == 0 {
            return Err(LoadTestError::InvalidConfig(
                "run.users must be at least 1".to_string(),
            ));
        }
        if !self.run.spawn_rate.is_finite() || self.run.spawn_rate <= 0.0 {
            return Err(LoadTestError::InvalidSpawnRate(self.run.spawn_rate));
        }
        if matches!(self.run.time, Some(time) if time.as_secs() == 0) {
            return Err(LoadTestError::InvalidConfig(
                "run.time must be at least one second".to_string(),
            ));
        }
        if self.run.iterations == Some(0) {
            return Err(LoadTestError::InvalidConfig(
                "run.iterations must be at least 1".to_string(),
            ));
        }
        if self.run.profiles.is_empty() {
            return Err(LoadTestError::NoProfiles);
        }
        Ok(())
    }
}
