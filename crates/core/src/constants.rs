//! Constants used throughout the CAVI core crate.
//!
//! This module collects formula coefficients, wire paths and configuration defaults so the
//! values the backend depends on live in one place.

/// Blood density (g/mL) used by the index formula.
pub const RHO: f64 = 1.05;

/// Age coefficient `M` for the `young` group.
pub const AGE_COEFFICIENT_YOUNG: f64 = 0.9;

/// Age coefficient `M` for the `middle` group, also used for unrecognised groups.
pub const AGE_COEFFICIENT_MIDDLE: f64 = 1.0;

/// Age coefficient `M` for the `elderly` group.
pub const AGE_COEFFICIENT_ELDERLY: f64 = 1.1;

/// Disease coefficient `A` for diabetes.
pub const DISEASE_COEFFICIENT_DIABETES: f64 = 1.2;

/// Disease coefficient `A` for every other disease value, including hypertension and none.
pub const DISEASE_COEFFICIENT_BASELINE: f64 = 1.0;

/// Value reported for a group whose index cannot be computed from the inputs.
pub const SENTINEL_INDEX: f64 = 0.0;

/// Path prefix of the backend result endpoint; the calculation id follows it.
pub const DELIVERY_PATH_PREFIX: [&str; 2] = ["api", "cavi-calculations"];

/// Final path segment of the backend result endpoint.
pub const DELIVERY_PATH_SUFFIX: &str = "async-result";

/// Timeout applied to each delivery request, in seconds.
pub const DELIVERY_TIMEOUT_SECS: u64 = 10;

/// Maximum number of response body bytes kept when logging a rejected delivery.
pub const DELIVERY_ERROR_BODY_LIMIT: usize = 512;

/// Default backend base URL when `GO_BACKEND_URL` is not set.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";

/// Default shared secret when `GO_BACKEND_TOKEN` is not set.
pub const DEFAULT_BACKEND_TOKEN: &str = "cavi-async-secret-token-8bytes";

/// Default lower bound of the simulated calculation delay, in seconds.
pub const DEFAULT_DELAY_MIN_SECS: u64 = 5;

/// Default upper bound (inclusive) of the simulated calculation delay, in seconds.
pub const DEFAULT_DELAY_MAX_SECS: u64 = 10;

/// Default admission limit on concurrently running calculations.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 256;

/// Required top-level request fields, in the order they are checked.
pub const REQUIRED_FIELDS: [&str; 5] = [
    "calculation_id",
    "systolic_pressure",
    "diastolic_pressure",
    "pulse_wave_velocity",
    "groups",
];
