//! Calculator runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the dispatcher and
//! every calculation task. Nothing below reads environment variables; the `*_from_env_value`
//! helpers take the raw strings so callers decide where they come from.

use crate::constants::{DEFAULT_DELAY_MAX_SECS, DEFAULT_DELAY_MIN_SECS, DEFAULT_MAX_IN_FLIGHT};
use crate::{CaviError, CaviResult};
use rand::Rng;
use reqwest::Url;
use std::time::Duration;

/// Inclusive range of whole seconds for the simulated calculation delay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DelayRange {
    min_secs: u64,
    max_secs: u64,
}

impl DelayRange {
    /// Create a new `DelayRange`.
    ///
    /// # Errors
    ///
    /// Returns [`CaviError::InvalidConfig`] if `min_secs > max_secs`.
    pub fn new(min_secs: u64, max_secs: u64) -> CaviResult<Self> {
        if min_secs > max_secs {
            return Err(CaviError::InvalidConfig(format!(
                "delay minimum ({min_secs}s) exceeds maximum ({max_secs}s)"
            )));
        }
        Ok(Self { min_secs, max_secs })
    }

    pub fn min_secs(&self) -> u64 {
        self.min_secs
    }

    pub fn max_secs(&self) -> u64 {
        self.max_secs
    }

    /// Draw a delay uniformly from the range.
    pub fn sample(&self) -> Duration {
        let secs = rand::thread_rng().gen_range(self.min_secs..=self.max_secs);
        Duration::from_secs(secs)
    }
}

impl Default for DelayRange {
    fn default() -> Self {
        Self {
            min_secs: DEFAULT_DELAY_MIN_SECS,
            max_secs: DEFAULT_DELAY_MAX_SECS,
        }
    }
}

/// Calculator configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CalculatorConfig {
    backend_url: Url,
    backend_token: String,
    delay: DelayRange,
    max_in_flight: usize,
}

impl CalculatorConfig {
    /// Create a new `CalculatorConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`CaviError::InvalidConfig`] if the backend URL is not an absolute http(s) URL,
    /// the token is blank, or `max_in_flight` is zero.
    pub fn new(
        backend_url: &str,
        backend_token: String,
        delay: DelayRange,
        max_in_flight: usize,
    ) -> CaviResult<Self> {
        let backend_url = Url::parse(backend_url.trim()).map_err(|e| {
            CaviError::InvalidConfig(format!("backend URL '{backend_url}' is invalid: {e}"))
        })?;
        if !matches!(backend_url.scheme(), "http" | "https") {
            return Err(CaviError::InvalidConfig(
                "backend URL must use http or https".into(),
            ));
        }
        if backend_url.cannot_be_a_base() {
            return Err(CaviError::InvalidConfig(
                "backend URL cannot be used as a base".into(),
            ));
        }

        if backend_token.trim().is_empty() {
            return Err(CaviError::InvalidConfig(
                "backend token cannot be empty".into(),
            ));
        }

        if max_in_flight == 0 {
            return Err(CaviError::InvalidConfig(
                "max in-flight calculations must be at least 1".into(),
            ));
        }

        Ok(Self {
            backend_url,
            backend_token,
            delay,
            max_in_flight,
        })
    }

    pub fn backend_url(&self) -> &Url {
        &self.backend_url
    }

    pub fn backend_token(&self) -> &str {
        &self.backend_token
    }

    pub fn delay(&self) -> DelayRange {
        self.delay
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_secs(name: &str, value: Option<String>, default: u64) -> CaviResult<u64> {
    match non_blank(value) {
        Some(v) => v.parse::<u64>().map_err(|_| {
            CaviError::InvalidConfig(format!("{name} must be a whole number of seconds, got '{v}'"))
        }),
        None => Ok(default),
    }
}

/// Parse the delay range from optional `CALCULATION_DELAY_MIN` / `CALCULATION_DELAY_MAX` values.
///
/// Absent or blank values fall back to the defaults (5 and 10 seconds).
pub fn delay_range_from_env_values(
    min: Option<String>,
    max: Option<String>,
) -> CaviResult<DelayRange> {
    let min_secs = parse_secs("CALCULATION_DELAY_MIN", min, DEFAULT_DELAY_MIN_SECS)?;
    let max_secs = parse_secs("CALCULATION_DELAY_MAX", max, DEFAULT_DELAY_MAX_SECS)?;
    DelayRange::new(min_secs, max_secs)
}

/// Parse the admission limit from an optional `CAVI_MAX_IN_FLIGHT` value.
pub fn max_in_flight_from_env_value(value: Option<String>) -> CaviResult<usize> {
    match non_blank(value) {
        Some(v) => v.parse::<usize>().map_err(|_| {
            CaviError::InvalidConfig(format!(
                "CAVI_MAX_IN_FLIGHT must be a positive integer, got '{v}'"
            ))
        }),
        None => Ok(DEFAULT_MAX_IN_FLIGHT),
    }
}
