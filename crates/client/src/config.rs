//! Client configuration from the environment.

use std::path::PathBuf;
use std::time::Duration;

/// Quiet period before a search box triggers a fetch.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

pub const DEFAULT_API_URL: &str = "http://localhost:8080";

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    /// `None` means the platform default (`<data dir>/cardportal/token`).
    pub token_path: Option<PathBuf>,
    pub search_debounce: Duration,
    pub http_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token_path: None,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Read `CARDPORTAL_*` variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, with an injectable lookup for tests.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let api_url = lookup("CARDPORTAL_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.api_url);

        let token_path = lookup("CARDPORTAL_TOKEN_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let search_debounce = number(&lookup, "CARDPORTAL_SEARCH_DEBOUNCE_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.search_debounce);

        let http_timeout = number(&lookup, "CARDPORTAL_HTTP_TIMEOUT_SECS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.http_timeout);

        Self {
            api_url,
            token_path,
            search_debounce,
            http_timeout,
        }
    }
}

fn number(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(v) => Some(v),
        Err(err) => {
            tracing::warn!(key, value = %raw, error = %err, "ignoring invalid numeric setting");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> ClientConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(config(&[]), ClientConfig::default());
        assert_eq!(ClientConfig::default().search_debounce, Duration::from_millis(500));
    }

    #[test]
    fn reads_overrides() {
        let cfg = config(&[
            ("CARDPORTAL_API_URL", "https://cards.example.com/api"),
            ("CARDPORTAL_TOKEN_PATH", "/tmp/tok"),
            ("CARDPORTAL_SEARCH_DEBOUNCE_MS", "250"),
            ("CARDPORTAL_HTTP_TIMEOUT_SECS", "5"),
        ]);
        assert_eq!(cfg.api_url, "https://cards.example.com/api");
        assert_eq!(cfg.token_path, Some(PathBuf::from("/tmp/tok")));
        assert_eq!(cfg.search_debounce, Duration::from_millis(250));
        assert_eq!(cfg.http_timeout, Duration::from_secs(5));
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let cfg = config(&[("CARDPORTAL_SEARCH_DEBOUNCE_MS", "soon")]);
        assert_eq!(cfg.search_debounce, DEFAULT_SEARCH_DEBOUNCE);
    }
}
