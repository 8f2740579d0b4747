use std::env;
use std::time::Duration;

use crate::error::ClientError;
use crate::services::monitor::RefreshPeriods;

pub const DEFAULT_DASHBOARD_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone)]
pub struct Settings {
    pub dashboard_url: String,
    /// Registered automatically at startup when present.
    pub riot_api_key: Option<String>,
    pub refresh: RefreshPeriods,
}

impl Settings {
    pub fn from_env() -> Result<Self, ClientError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let dashboard_url = lookup("DASHBOARD_URL")
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_DASHBOARD_URL.to_string());

        if !dashboard_url.starts_with("http://") && !dashboard_url.starts_with("https://") {
            return Err(ClientError::Config(format!(
                "DASHBOARD_URL must be an http(s) URL, got {}",
                dashboard_url
            )));
        }

        let riot_api_key = lookup("RIOT_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let defaults = RefreshPeriods::default();
        let refresh = RefreshPeriods {
            status: seconds(&lookup, "STATUS_REFRESH_SECS", defaults.status)?,
            ambient: seconds(&lookup, "AMBIENT_REFRESH_SECS", defaults.ambient)?,
        };

        Ok(Self {
            dashboard_url,
            riot_api_key,
            refresh,
        })
    }
}

fn seconds<F>(lookup: &F, key: &str, default: Duration) -> Result<Duration, ClientError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };

    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ClientError::Config(format!("{} must be at least 1", key))),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(_) => Err(ClientError::Config(format!(
            "{} must be a whole number of seconds",
            key
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ClientError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.dashboard_url, DEFAULT_DASHBOARD_URL);
        assert!(s.riot_api_key.is_none());
        assert_eq!(s.refresh, RefreshPeriods::default());
    }

    #[test]
    fn values_are_read_and_trimmed() {
        let s = settings(&[
            ("DASHBOARD_URL", " https://dash.example.com "),
            ("RIOT_API_KEY", " RGAPI-1234 "),
            ("STATUS_REFRESH_SECS", "3"),
            ("AMBIENT_REFRESH_SECS", "30"),
        ])
        .unwrap();
        assert_eq!(s.dashboard_url, "https://dash.example.com");
        assert_eq!(s.riot_api_key.as_deref(), Some("RGAPI-1234"));
        assert_eq!(s.refresh.status, Duration::from_secs(3));
        assert_eq!(s.refresh.ambient, Duration::from_secs(30));
    }

    #[test]
    fn blank_api_key_is_ignored() {
        let s = settings(&[("RIOT_API_KEY", "   ")]).unwrap();
        assert!(s.riot_api_key.is_none());
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(matches!(
            settings(&[("STATUS_REFRESH_SECS", "five")]),
            Err(ClientError::Config(_))
        ));
        assert!(matches!(
            settings(&[("AMBIENT_REFRESH_SECS", "0")]),
            Err(ClientError::Config(_))
        ));
        assert!(matches!(
            settings(&[("DASHBOARD_URL", "localhost:5000")]),
            Err(ClientError::Config(_))
        ));
    }
}
