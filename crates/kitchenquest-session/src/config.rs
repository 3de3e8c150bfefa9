//! Session configuration read from the environment.

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use kitchenquest_core::retry::RetryPolicy;
use kitchenquest_narration::{PcmFormat, PresentationMode};
use thiserror::Error;

/// Presentation mode, `interactive` or `demo`.
pub const PRESENTATION_MODE: &str = "KITCHENQUEST_PRESENTATION_MODE";
/// Total attempts for external capability calls.
pub const RETRY_MAX_ATTEMPTS: &str = "KITCHENQUEST_RETRY_MAX_ATTEMPTS";
/// Delay before the first retry, in milliseconds.
pub const RETRY_INITIAL_DELAY_MS: &str = "KITCHENQUEST_RETRY_INITIAL_DELAY_MS";
/// Sample rate of synthesised speech.
pub const TTS_SAMPLE_RATE: &str = "KITCHENQUEST_TTS_SAMPLE_RATE";
/// Channel count of synthesised speech.
pub const TTS_CHANNELS: &str = "KITCHENQUEST_TTS_CHANNELS";

/// A configuration value that could not be used.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The variable is set to something unusable.
    #[error("{key} has invalid value {value:?}: {reason}")]
    Invalid {
        /// Variable name.
        key: &'static str,
        /// Value as found.
        value: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// Settings shared by every quest session in a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionConfig {
    /// Interactive play or demo presentation.
    pub mode: PresentationMode,
    /// Retry policy for decomposition, evaluation, and speech synthesis.
    pub retry: RetryPolicy,
    /// Layout of synthesised speech.
    pub pcm: PcmFormat,
}

impl SessionConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for any variable that is set but
    /// unusable. Unset variables take their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for any value that is present but
    /// unusable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let mode = read(&lookup, PRESENTATION_MODE, defaults.mode)?;
        let max_attempts: u32 = read(&lookup, RETRY_MAX_ATTEMPTS, defaults.retry.max_attempts)?;
        if max_attempts == 0 {
            return Err(invalid(RETRY_MAX_ATTEMPTS, "0", "must be at least 1"));
        }
        let initial_delay_ms: u64 = read(
            &lookup,
            RETRY_INITIAL_DELAY_MS,
            u64::try_from(defaults.retry.initial_delay.as_millis()).unwrap_or(u64::MAX),
        )?;
        let sample_rate: u32 = read(&lookup, TTS_SAMPLE_RATE, defaults.pcm.sample_rate)?;
        if sample_rate == 0 {
            return Err(invalid(TTS_SAMPLE_RATE, "0", "must be positive"));
        }
        let channels: u16 = read(&lookup, TTS_CHANNELS, defaults.pcm.channels)?;
        if channels == 0 {
            return Err(invalid(TTS_CHANNELS, "0", "must be positive"));
        }

        Ok(Self {
            mode,
            retry: RetryPolicy {
                max_attempts,
                initial_delay: Duration::from_millis(initial_delay_ms),
            },
            pcm: PcmFormat {
                sample_rate,
                channels,
            },
        })
    }
}

fn read<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|e| invalid(key, &value, &e.to_string())),
    }
}

fn invalid(key: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_owned(),
        reason: reason.to_owned(),
    }
}
