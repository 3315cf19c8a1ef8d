use std::env;
use std::time::Duration;

use crate::fetcher::DEFAULT_CONSTRUCTORS_URL;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub constructors_url: String,
    pub request_timeout_secs: Option<u64>,
    pub fetch_interval_minutes: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            constructors_url: DEFAULT_CONSTRUCTORS_URL.to_string(),
            request_timeout_secs: None,
            fetch_interval_minutes: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup. Unparseable numbers
    /// fall back to "unset".
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Config {
            constructors_url: lookup("CONSTRUCTORS_URL")
                .unwrap_or_else(|| DEFAULT_CONSTRUCTORS_URL.to_string()),
            request_timeout_secs: lookup("REQUEST_TIMEOUT_SECS").and_then(|v| v.parse().ok()),
            fetch_interval_minutes: lookup("FETCH_INTERVAL_MINUTES")
                .and_then(|v| v.parse().ok())
                .and_then(valid_interval_minutes),
        }
    }

    /// Set the poll interval, dropping values that cannot be a period.
    pub fn set_fetch_interval_minutes(&mut self, minutes: u64) {
        self.fetch_interval_minutes = valid_interval_minutes(minutes);
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn fetch_interval(&self) -> Option<Duration> {
        self.fetch_interval_minutes
            .and_then(|minutes| minutes.checked_mul(60))
            .map(Duration::from_secs)
    }
}

// Non-zero and small enough to express in seconds.
fn valid_interval_minutes(minutes: u64) -> Option<u64> {
    (minutes > 0 && minutes.checked_mul(60).is_some()).then_some(minutes)
}
