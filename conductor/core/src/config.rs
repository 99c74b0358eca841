//! Configuration
//!
//! Defaults overridden by environment variables, in the same spirit as the
//! conductor's `from_env` constructors. There is no configuration file.
//!
//! | Variable | Default |
//! |---|---|
//! | `VOICEFACE_BACKEND_URL` | `http://localhost:5001` |
//! | `VOICEFACE_REQUEST_TIMEOUT_MS` | unset (no timeout) |
//! | `VOICEFACE_TYPING_INTERVAL_MS` | `200` |
//! | `VOICEFACE_BLINK_PERIOD_MS` | `2000` |
//! | `VOICEFACE_BLINK_DURATION_MS` | `200` |
//! | `VOICEFACE_POLL_INTERVAL_MS` | `1000` |
//! | `VOICEFACE_POLL_FAILURES` | `5` (`0` keeps polling through failures) |
//! | `VOICEFACE_GREETING` | built-in greeting |

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default backend base URL
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5001";

/// Default consecutive poll failures before giving up
pub const DEFAULT_MAX_POLL_FAILURES: u32 = 5;

/// Backend connection settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendConfig {
    /// Base URL, without trailing slash
    pub base_url: String,
    /// Per-request timeout (`None` = wait indefinitely)
    pub request_timeout: Option<Duration>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout: None,
        }
    }
}

/// Timer periods
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimingConfig {
    /// Delay between revealed characters
    pub typing_interval: Duration,
    /// Time between blinks while talking
    pub blink_period: Duration,
    /// How long a blink keeps the eyes closed
    pub blink_duration: Duration,
    /// Time between audio-status polls
    pub poll_interval: Duration,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            typing_interval: Duration::from_millis(200),
            blink_period: Duration::from_millis(2000),
            blink_duration: Duration::from_millis(200),
            poll_interval: Duration::from_millis(1000),
        }
    }
}

/// Fixed user-visible texts
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessagesConfig {
    /// Shown before the first interaction
    pub greeting: String,
    /// Placeholder while the backend listens and thinks
    pub listening: String,
    /// Shown when the process-audio request fails
    pub error: String,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            greeting: "Hello, I'm your voice assistant. How can I help you?".to_string(),
            listening: "🎙️ Listening...".to_string(),
            error: "❌ Something went wrong, please try again later.".to_string(),
        }
    }
}

/// What to do when an audio-status poll fails
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollFailurePolicy {
    /// Assume audio is still playing and try again next tick
    TreatAsPlaying,
    /// Return to idle after this many failures in a row
    AbortAfter {
        /// Consecutive failures tolerated before giving up
        max_consecutive: u32,
    },
}

impl PollFailurePolicy {
    /// Build from a failure count, `0` meaning "never give up"
    #[must_use]
    pub const fn from_max_failures(max: u32) -> Self {
        if max == 0 {
            Self::TreatAsPlaying
        } else {
            Self::AbortAfter {
                max_consecutive: max,
            }
        }
    }

    /// Whether `consecutive` failures exhaust the policy
    #[must_use]
    pub const fn gives_up_after(self, consecutive: u32) -> bool {
        match self {
            Self::TreatAsPlaying => false,
            Self::AbortAfter { max_consecutive } => consecutive >= max_consecutive,
        }
    }
}

impl Default for PollFailurePolicy {
    fn default() -> Self {
        Self::from_max_failures(DEFAULT_MAX_POLL_FAILURES)
    }
}

/// Complete configuration for a voice face
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FaceConfig {
    /// Backend connection
    pub backend: BackendConfig,
    /// Timer periods
    pub timing: TimingConfig,
    /// User-visible texts
    pub messages: MessagesConfig,
    /// Poll failure handling
    pub poll_failure: PollFailurePolicy,
}

impl FaceConfig {
    /// Load from the process environment, falling back to defaults on bad values
    #[must_use]
    pub fn from_env() -> Self {
        match Self::try_from_env() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring invalid environment configuration");
                Self::default()
            }
        }
    }

    /// Load from the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but unparseable, or the result
    /// fails [`FaceConfig::validate`].
    pub fn try_from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup (used by tests)
    ///
    /// # Errors
    ///
    /// Same as [`FaceConfig::try_from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("VOICEFACE_BACKEND_URL") {
            let url = url.trim().trim_end_matches('/').to_string();
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::InvalidValue {
                    key: "VOICEFACE_BACKEND_URL".to_string(),
                    value: url,
                    reason: "expected an http:// or https:// URL".to_string(),
                });
            }
            config.backend.base_url = url;
        }
        if let Some(timeout) = parse_millis(&lookup, "VOICEFACE_REQUEST_TIMEOUT_MS")? {
            config.backend.request_timeout = Some(timeout);
        }

        let timing = &mut config.timing;
        if let Some(d) = parse_millis(&lookup, "VOICEFACE_TYPING_INTERVAL_MS")? {
            timing.typing_interval = d;
        }
        if let Some(d) = parse_millis(&lookup, "VOICEFACE_BLINK_PERIOD_MS")? {
            timing.blink_period = d;
        }
        if let Some(d) = parse_millis(&lookup, "VOICEFACE_BLINK_DURATION_MS")? {
            timing.blink_duration = d;
        }
        if let Some(d) = parse_millis(&lookup, "VOICEFACE_POLL_INTERVAL_MS")? {
            timing.poll_interval = d;
        }

        if let Some(raw) = lookup("VOICEFACE_POLL_FAILURES") {
            let max = raw
                .trim()
                .parse::<u32>()
                .map_err(|e| ConfigError::InvalidValue {
                    key: "VOICEFACE_POLL_FAILURES".to_string(),
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
            config.poll_failure = PollFailurePolicy::from_max_failures(max);
        }

        if let Some(greeting) = lookup("VOICEFACE_GREETING") {
            config.messages.greeting = greeting;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for zero periods or a blink that
    /// lasts as long as the blink period.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.timing;
        for (name, value) in [
            ("typing interval", t.typing_interval),
            ("blink period", t.blink_period),
            ("blink duration", t.blink_duration),
            ("poll interval", t.poll_interval),
        ] {
            if value.is_zero() {
                return Err(ConfigError::Validation(format!("{name} must be non-zero")));
            }
        }
        if t.blink_duration >= t.blink_period {
            return Err(ConfigError::Validation(format!(
                "blink duration ({:?}) must be shorter than blink period ({:?})",
                t.blink_duration, t.blink_period
            )));
        }
        Ok(())
    }
}

fn parse_millis<F>(lookup: &F, key: &str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<u64>()
        .map(|ms| Some(Duration::from_millis(ms)))
        .map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.clone(),
            reason: e.to_string(),
        })
}
