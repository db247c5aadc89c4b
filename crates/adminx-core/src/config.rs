//! Console configuration
//!
//! Loaded from TOML; every section has defaults so an empty file is valid.
//!
//! ```toml
//! [mutation]
//! overlap = "reject"
//! remote_timeout_ms = 10000
//!
//! [latency]
//! update_ms = 800
//!
//! [generation]
//! model = "gemini-3-flash-preview"
//! api_key_env = "API_KEY"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;

/// How overlapping mutations on the same resource and action are handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Reject the second call while the first is in flight
    #[default]
    Reject,
    /// Allow overlapping toggles; the latest dispatched call wins
    LastCallWins,
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Mutation protocol settings
    pub mutation: MutationConfig,
    /// Simulated store latency
    pub latency: LatencyProfile,
    /// Text generation client
    pub generation: GenerationConfig,
    /// Notice board
    pub notices: NoticeConfig,
}

impl ConsoleConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With overlap policy
    #[inline]
    #[must_use]
    pub fn with_overlap(mut self, overlap: OverlapPolicy) -> Self {
        self.mutation.overlap = overlap;
        self
    }

    /// With remote timeout (`None` or a zero duration waits forever)
    #[inline]
    #[must_use]
    pub fn with_remote_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.mutation.remote_timeout_ms = timeout
            .filter(|d| !d.is_zero())
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX).max(1));
        self
    }

    /// With simulated latency
    #[inline]
    #[must_use]
    pub fn with_latency(mut self, latency: LatencyProfile) -> Self {
        self.latency = latency;
        self
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// `ConfigError::Parse` for malformed TOML, `ConfigError::Invalid` for bad values
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// `ConfigError::Io` when the file cannot be read, otherwise as [`Self::from_toml_str`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded console config");
        Ok(config)
    }

    /// Render as TOML
    ///
    /// # Errors
    /// `ConfigError::Serialize` if serialization fails
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check semantic constraints
    ///
    /// # Errors
    /// `ConfigError::Invalid` describing the first bad value
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mutation.remote_timeout_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "mutation.remote_timeout_ms must be positive (omit it to disable)".into(),
            ));
        }
        if self.mutation.history_limit == 0 {
            return Err(ConfigError::Invalid("mutation.history_limit must be positive".into()));
        }
        if self.generation.model.trim().is_empty() {
            return Err(ConfigError::Invalid("generation.model must not be empty".into()));
        }
        if self.generation.api_key_env.trim().is_empty() {
            return Err(ConfigError::Invalid("generation.api_key_env must not be empty".into()));
        }
        if self.notices.capacity == 0 {
            return Err(ConfigError::Invalid("notices.capacity must be positive".into()));
        }
        Ok(())
    }
}

/// Mutation protocol settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationConfig {
    /// Overlap handling
    pub overlap: OverlapPolicy,
    /// Remote call limit before it counts as failed
    pub remote_timeout_ms: Option<u64>,
    /// Number of settled mutation trails kept per board
    pub history_limit: usize,
}

impl MutationConfig {
    /// Remote call limit; zero counts as unset
    #[inline]
    #[must_use]
    pub fn remote_timeout(&self) -> Option<Duration> {
        self.remote_timeout_ms.filter(|&ms| ms > 0).map(Duration::from_millis)
    }
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            overlap: OverlapPolicy::Reject,
            remote_timeout_ms: Some(10_000),
            history_limit: 64,
        }
    }
}

/// Per-operation latency of the simulated store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencyProfile {
    pub list_ms: u64,
    pub create_ms: u64,
    pub update_ms: u64,
    pub delete_ms: u64,
}

impl LatencyProfile {
    /// No latency at all
    #[inline]
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            list_ms: 0,
            create_ms: 0,
            update_ms: 0,
            delete_ms: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn list(&self) -> Duration {
        Duration::from_millis(self.list_ms)
    }

    #[inline]
    #[must_use]
    pub fn create(&self) -> Duration {
        Duration::from_millis(self.create_ms)
    }

    #[inline]
    #[must_use]
    pub fn update(&self) -> Duration {
        Duration::from_millis(self.update_ms)
    }

    #[inline]
    #[must_use]
    pub fn delete(&self) -> Duration {
        Duration::from_millis(self.delete_ms)
    }
}

impl Default for LatencyProfile {
    fn default() -> Self {
        Self {
            list_ms: 1200,
            create_ms: 1000,
            update_ms: 800,
            delete_ms: 600,
        }
    }
}

/// Text generation client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Model name
    pub model: String,
    /// API base URL
    pub endpoint: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// HTTP request limit
    pub request_timeout_ms: u64,
}

impl GenerationConfig {
    #[inline]
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "gemini-3-flash-preview".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key_env: "API_KEY".to_string(),
            request_timeout_ms: 30_000,
        }
    }
}

/// Notice board settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoticeConfig {
    /// Oldest notices are dropped beyond this count
    pub capacity: usize,
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self { capacity: 32 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_uses_defaults() {
        let config = ConsoleConfig::from_toml_str("").unwrap();
        assert_eq!(config, ConsoleConfig::default());
        assert_eq!(config.mutation.remote_timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.latency.update(), Duration::from_millis(800));
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let config = ConsoleConfig::from_toml_str(
            r#"
            [mutation]
            overlap = "last_call_wins"

            [latency]
            update_ms = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.mutation.overlap, OverlapPolicy::LastCallWins);
        assert_eq!(config.mutation.history_limit, 64);
        assert_eq!(config.latency.update_ms, 5);
        assert_eq!(config.latency.delete_ms, 600);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = ConsoleConfig::from_toml_str("[mutation]\nremote_timeout_ms = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn zero_timeout_from_builder_disables_limit() {
        let config = ConsoleConfig::new().with_remote_timeout(Some(Duration::ZERO));
        assert_eq!(config.mutation.remote_timeout_ms, None);
        assert!(config.validate().is_ok());

        let sub_millisecond = ConsoleConfig::new().with_remote_timeout(Some(Duration::from_micros(10)));
        assert_eq!(sub_millisecond.mutation.remote_timeout_ms, Some(1));

        let literal = MutationConfig {
            remote_timeout_ms: Some(0),
            ..MutationConfig::default()
        };
        assert_eq!(literal.remote_timeout(), None);
    }

    #[test]
    fn unknown_overlap_policy_is_rejected() {
        let err = ConsoleConfig::from_toml_str("[mutation]\noverlap = \"whatever\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn round_trips_through_file() {
        let config = ConsoleConfig::new()
            .with_overlap(OverlapPolicy::LastCallWins)
            .with_remote_timeout(Some(Duration::from_millis(250)))
            .with_latency(LatencyProfile::zero());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(config.to_toml_string().unwrap().as_bytes())
            .unwrap();

        let loaded = ConsoleConfig::load(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ConsoleConfig::load("/nonexistent/adminx.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/adminx.toml"));
    }
}
