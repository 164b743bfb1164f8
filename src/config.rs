use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use chrono::Utc;
use serde::{Deserialize, de::DeserializeOwned};

/// Prefix shared by every env var the scraper reads, e.g. `BANNER_BASE_URL`.
pub const ENV_PREFIX: &str = "BANNER_";

/// Where to scrape from and where to put the results.
///
/// Every field can be overridden through the environment (or a `.env` file);
/// the defaults point at the SUNY Poly Banner schedule pages.
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapingConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_start_path")]
    pub start_path: String,
    #[serde(default = "default_disciplines_path")]
    pub disciplines_path: String,
    #[serde(default = "default_schedule_path")]
    pub schedule_path: String,
    #[serde(default = "default_output_filename")]
    pub output_filename: String,
    #[serde(default)]
    pub json_output: Option<String>,
    /// Zero disables the timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

fn default_base_url() -> String {
    "https://banner.sunypoly.edu".to_string()
}

fn default_start_path() -> String {
    "/pls/prod/swssschd.P_SelDefSchTerm".to_string()
}

fn default_disciplines_path() -> String {
    "/pls/prod/swssschd.P_SelDisc".to_string()
}

fn default_schedule_path() -> String {
    "/pls/prod/swssschd.P_ShowSchd".to_string()
}

fn default_output_filename() -> String {
    "course_schedule.xlsx".to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl ScrapingConfig {
    pub fn new() -> anyhow::Result<Self> {
        Self::load_from_env(ENV_PREFIX)
    }

    /// Builds a config from explicit `(NAME, value)` pairs instead of the
    /// process environment. Names carry the [`ENV_PREFIX`].
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX)
            .from_iter::<_, Self>(vars)
            .context("failed to load variables into config struct")
    }

    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(fill_date_placeholder(&self.output_filename))
    }

    pub fn json_output_path(&self) -> Option<PathBuf> {
        self.json_output
            .as_deref()
            .filter(|path| !path.trim().is_empty())
            .map(|path| PathBuf::from(fill_date_placeholder(path)))
    }
}

/// Replaces every `{date}` in a filename with today's UTC date.
pub fn fill_date_placeholder(filename: &str) -> String {
    let today = Utc::now().format("%Y-%m-%d").to_string();
    replace_date_placeholder(filename, &today)
}

fn replace_date_placeholder(filename: &str, date: &str) -> String {
    filename.replace("{date}", date)
}

// Extension trait.
pub trait LoadFromEnv: DeserializeOwned {
    fn load_from_env(prefix: &str) -> anyhow::Result<Self> {
        // Don't throw an error if .env file doesn't exist.
        let _ = dotenv::dotenv();
        let config = envy::prefixed(prefix)
            .from_env::<Self>()
            .context("failed to load env variables into config struct")?;
        Ok(config)
    }
}

impl<T: DeserializeOwned> LoadFromEnv for T {}
