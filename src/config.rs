use std::fmt;
use std::time::Duration;

pub const DEFAULT_RAWG_BASE_URL: &str = "https://api.rawg.io/api";
pub const DEFAULT_SELECTION_DELAY: Duration = Duration::from_millis(300);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Runtime settings, read from the environment (and `.env`) at startup.
/// The telegram token is not here, `Bot::from_env` picks up `TELOXIDE_TOKEN`.
#[derive(Clone)]
pub struct Config {
    /// Missing key is not fatal, every search then fails with `MissingCredential`.
    pub rawg_api_key: Option<String>,
    pub rawg_base_url: String,
    /// Pause between an answer and the next question so the pressed button
    /// can be seen. Zero turns it off.
    pub selection_delay: Duration,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rawg_api_key: None,
            rawg_base_url: DEFAULT_RAWG_BASE_URL.to_string(),
            selection_delay: DEFAULT_SELECTION_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let rawg_api_key = lookup("RAWG_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        if rawg_api_key.is_none() {
            log::warn!("RAWG_API_KEY is not set, recommendations will not be available");
        }

        let rawg_base_url = lookup("RAWG_BASE_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(defaults.rawg_base_url);

        let selection_delay = parse_number(&lookup, "GAME_FINDER_SELECTION_DELAY_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.selection_delay);
        // Unlike the delay, a zero timeout would fail every request.
        let request_timeout = parse_number(&lookup, "RAWG_TIMEOUT_SECS")
            .filter(|secs| {
                if *secs == 0 {
                    log::warn!("Ignoring RAWG_TIMEOUT_SECS=0, the timeout must be positive");
                }
                *secs > 0
            })
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        Self {
            rawg_api_key,
            rawg_base_url,
            selection_delay,
            request_timeout,
        }
    }
}

fn parse_number(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<u64> {
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring {}={:?}, expected a whole number", name, raw);
            None
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("rawg_api_key", &self.rawg_api_key.as_ref().map(|_| "<redacted>"))
            .field("rawg_base_url", &self.rawg_base_url)
            .field("selection_delay", &self.selection_delay)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]);
        assert_eq!(config.rawg_api_key, None);
        assert_eq!(config.rawg_base_url, DEFAULT_RAWG_BASE_URL);
        assert_eq!(config.selection_delay, DEFAULT_SELECTION_DELAY);
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn reads_every_variable() {
        let config = config_from(&[
            ("RAWG_API_KEY", "abc123"),
            ("RAWG_BASE_URL", "http://localhost:9000/api"),
            ("GAME_FINDER_SELECTION_DELAY_MS", "0"),
            ("RAWG_TIMEOUT_SECS", "3"),
        ]);
        assert_eq!(config.rawg_api_key.as_deref(), Some("abc123"));
        assert_eq!(config.rawg_base_url, "http://localhost:9000/api");
        assert_eq!(config.selection_delay, Duration::ZERO);
        assert_eq!(config.request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let config = config_from(&[("RAWG_API_KEY", "   ")]);
        assert_eq!(config.rawg_api_key, None);
    }

    #[test]
    fn malformed_numbers_fall_back() {
        let config = config_from(&[
            ("GAME_FINDER_SELECTION_DELAY_MS", "soon"),
            ("RAWG_TIMEOUT_SECS", "-1"),
        ]);
        assert_eq!(config.selection_delay, DEFAULT_SELECTION_DELAY);
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn zero_timeout_falls_back_but_zero_delay_is_kept() {
        let config = config_from(&[
            ("GAME_FINDER_SELECTION_DELAY_MS", "0"),
            ("RAWG_TIMEOUT_SECS", "0"),
        ]);
        assert_eq!(config.selection_delay, Duration::ZERO);
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn debug_redacts_the_key() {
        let config = config_from(&[("RAWG_API_KEY", "abc123")]);
        assert!(!format!("{config:?}").contains("abc123"));
    }
}
