#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::time::Duration;

use typed_builder::TypedBuilder;

use crate::{
    error::{ClientError, Result},
    transport::DEFAULT_TIMEOUT,
};

/// Web application that handles collaborator invitations.
pub const DEFAULT_APP_URL: &str = "https://autograder-nchs.vercel.app";

/// Backend location, credentials and transport tuning.
#[derive(Debug, Clone, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct ClientConfig {
    /// Base URL of the backend (relational, storage and auth APIs).
    supabase_url: String,
    /// Project anonymous key.
    anon_key:     String,
    /// Base URL of the companion web application.
    #[builder(default = DEFAULT_APP_URL.to_string())]
    app_url:      String,
    /// Per-request timeout.
    #[builder(default = DEFAULT_TIMEOUT)]
    timeout:      Duration,
}

impl ClientConfig {
    /// Reads configuration from the process environment.
    ///
    /// * `SUPABASE_URL`, `SUPABASE_ANON_KEY`: required.
    /// * `AUTOGRADER_APP_URL`: optional, defaults to [`DEFAULT_APP_URL`].
    /// * `AUTOGRADER_TIMEOUT_SECS`: optional, defaults to 30.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ClientError::Config(format!("{key} must be set")))
        };

        let supabase_url = required("SUPABASE_URL")?;
        let anon_key = required("SUPABASE_ANON_KEY")?;
        let app_url = lookup("AUTOGRADER_APP_URL")
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_APP_URL.to_string());
        let timeout = read_timeout_secs(lookup("AUTOGRADER_TIMEOUT_SECS"), DEFAULT_TIMEOUT);

        Ok(Self {
            supabase_url: supabase_url.trim_end_matches('/').to_string(),
            anon_key,
            app_url: app_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Base URL of the backend.
    pub fn supabase_url(&self) -> &str {
        &self.supabase_url
    }

    /// Project anonymous key.
    pub fn anon_key(&self) -> &str {
        &self.anon_key
    }

    /// Base URL of the companion web application.
    pub fn app_url(&self) -> &str {
        &self.app_url
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Parses a seconds value into a `Duration`, falling back to `default` when
/// missing or unparsable.
fn read_timeout_secs(value: Option<String>, default: Duration) -> Duration {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn reads_required_and_defaults() {
        let cfg = ClientConfig::from_lookup(lookup(&[
            ("SUPABASE_URL", "https://proj.supabase.co/"),
            ("SUPABASE_ANON_KEY", "anon"),
        ]))
        .expect("config");

        assert_eq!(cfg.supabase_url(), "https://proj.supabase.co");
        assert_eq!(cfg.anon_key(), "anon");
        assert_eq!(cfg.app_url(), DEFAULT_APP_URL);
        assert_eq!(cfg.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn missing_key_is_a_config_error() {
        let err = ClientConfig::from_lookup(lookup(&[("SUPABASE_URL", "https://x")])).unwrap_err();
        assert!(matches!(err, ClientError::Config(msg) if msg.contains("SUPABASE_ANON_KEY")));
    }

    #[test]
    fn timeout_override_and_fallback() {
        let cfg = ClientConfig::from_lookup(lookup(&[
            ("SUPABASE_URL", "https://x"),
            ("SUPABASE_ANON_KEY", "k"),
            ("AUTOGRADER_TIMEOUT_SECS", "5"),
        ]))
        .expect("config");
        assert_eq!(cfg.timeout(), Duration::from_secs(5));

        assert_eq!(read_timeout_secs(Some("soon".into()), DEFAULT_TIMEOUT), DEFAULT_TIMEOUT);
    }

    #[test]
    fn builder_applies_defaults() {
        let cfg = ClientConfig::builder()
            .supabase_url("http://localhost:54321")
            .anon_key("anon")
            .build();
        assert_eq!(cfg.app_url(), DEFAULT_APP_URL);
        assert_eq!(cfg.timeout(), DEFAULT_TIMEOUT);
    }
}
