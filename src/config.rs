// src/config.rs

use std::{env, fmt, str::FromStr};

use tracing::info;
use url::Url;

use crate::error::SyncError;

pub const HOST_VAR: &str = "MEILISEARCH_HOST";
pub const MASTER_KEY_VAR: &str = "MEILISEARCH_MASTER_KEY";
pub const SHEET_URL_VAR: &str = "SHEET_URL";
pub const SETTINGS_POLICY_VAR: &str = "SETTINGS_FAILURE_POLICY";

/// What a rejected settings patch does to the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SettingsFailurePolicy {
    /// Abort the run with a non-zero exit, like every other publisher step.
    #[default]
    Fatal,
    /// Log the failure and finish the run successfully.
    Warn,
}

impl FromStr for SettingsFailurePolicy {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fatal" => Ok(Self::Fatal),
            "warn" => Ok(Self::Warn),
            other => Err(SyncError::config(format!(
                "{} must be `fatal` or `warn`, got `{}`",
                SETTINGS_POLICY_VAR, other
            ))),
        }
    }
}

/// Run configuration, read once at startup and handed to each stage.
#[derive(Clone)]
pub struct Config {
    /// Base URL of the search service, e.g. `https://search.example.com`.
    pub host: Url,
    /// Bearer token sent with every search-service request.
    pub master_key: String,
    /// Published CSV export of the spreadsheet.
    pub sheet_url: Url,
    pub settings_policy: SettingsFailurePolicy,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host.as_str())
            .field("master_key", &"<redacted>")
            .field("sheet_url", &self.sheet_url.as_str())
            .field("settings_policy", &self.settings_policy)
            .finish()
    }
}

impl Config {
    /// Load `.env` (if any) and read the process environment.
    pub fn from_env() -> Result<Self, SyncError> {
        if let Ok(path) = dotenv::dotenv() {
            info!(path = %path.display(), "loaded .env");
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup; `from_env` passes `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SyncError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String, SyncError> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| SyncError::config(format!("{} is not set", key)))
        };

        let host = parse_url(HOST_VAR, &required(HOST_VAR)?)?;
        let master_key = required(MASTER_KEY_VAR)?;
        let sheet_url = parse_url(SHEET_URL_VAR, &required(SHEET_URL_VAR)?)?;
        let settings_policy = match lookup(SETTINGS_POLICY_VAR) {
            Some(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => SettingsFailurePolicy::default(),
        };

        Ok(Self {
            host,
            master_key,
            sheet_url,
            settings_policy,
        })
    }
}

fn parse_url(key: &str, raw: &str) -> Result<Url, SyncError> {
    Url::parse(raw).map_err(|e| SyncError::config(format!("{} is not a valid URL: {}", key, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const BASE: &[(&str, &str)] = &[
        (HOST_VAR, "http://localhost:7700"),
        (MASTER_KEY_VAR, "secret"),
        (SHEET_URL_VAR, "https://docs.example.com/sheet.csv"),
    ];

    #[test]
    fn reads_required_values_with_fatal_default() {
        let cfg = Config::from_lookup(lookup_from(BASE)).unwrap();
        assert_eq!(cfg.host.as_str(), "http://localhost:7700/");
        assert_eq!(cfg.master_key, "secret");
        assert_eq!(cfg.sheet_url.as_str(), "https://docs.example.com/sheet.csv");
        assert_eq!(cfg.settings_policy, SettingsFailurePolicy::Fatal);
    }

    #[test]
    fn missing_or_blank_variable_is_config_error() {
        let err = Config::from_lookup(lookup_from(&BASE[..2])).unwrap_err();
        assert!(matches!(err, SyncError::Config(ref m) if m.contains(SHEET_URL_VAR)));

        let mut blank = BASE.to_vec();
        blank[1] = (MASTER_KEY_VAR, "   ");
        let err = Config::from_lookup(lookup_from(&blank)).unwrap_err();
        assert!(matches!(err, SyncError::Config(ref m) if m.contains(MASTER_KEY_VAR)));
    }

    #[test]
    fn rejects_malformed_url() {
        let mut pairs = BASE.to_vec();
        pairs[0] = (HOST_VAR, "not a url");
        let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, SyncError::Config(ref m) if m.contains(HOST_VAR)));
    }

    #[test]
    fn parses_settings_policy() {
        let mut pairs = BASE.to_vec();
        pairs.push((SETTINGS_POLICY_VAR, " WARN "));
        let cfg = Config::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(cfg.settings_policy, SettingsFailurePolicy::Warn);

        pairs.pop();
        pairs.push((SETTINGS_POLICY_VAR, "sometimes"));
        assert!(Config::from_lookup(lookup_from(&pairs)).is_err());
    }

    #[test]
    fn debug_output_hides_master_key() {
        let cfg = Config::from_lookup(lookup_from(BASE)).unwrap();
        let shown = format!("{:?}", cfg);
        assert!(!shown.contains("secret"));
        assert!(shown.contains("<redacted>"));
    }
}
