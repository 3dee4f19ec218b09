//! REST request and response bodies.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /api/calculate`.
///
/// Intake is validated field by field in `cavi-core`; this type documents the expected shape.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CalculateReq {
    /// Any JSON scalar; echoed back and used in the callback URL.
    #[schema(value_type = Object, example = 1)]
    pub calculation_id: serde_json::Value,
    #[schema(example = 120)]
    pub systolic_pressure: u32,
    #[schema(example = 80)]
    pub diastolic_pressure: u32,
    #[schema(example = 8.5)]
    pub pulse_wave_velocity: f64,
    pub groups: Vec<GroupReq>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct GroupReq {
    #[schema(value_type = Object, example = 1)]
    pub group_id: serde_json::Value,
    /// `young`, `middle` or `elderly`; anything else scores as `middle`.
    #[serde(default)]
    pub age_group: Option<String>,
    /// `diabetes`, `hypertension` or null.
    #[serde(default)]
    pub disease_type: Option<String>,
}

/// Acknowledgement that a calculation was started.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AcceptedRes {
    pub status: String,
    pub message: String,
    #[schema(value_type = Object)]
    pub calculation_id: serde_json::Value,
    pub groups_count: usize,
}

impl AcceptedRes {
    pub fn new(calculation_id: serde_json::Value, groups_count: usize) -> Self {
        Self {
            status: "accepted".into(),
            message: "Calculation started".into(),
            calculation_id,
            groups_count,
        }
    }
}

/// Failure body returned with 4xx/5xx answers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub status: String,
    pub message: String,
}

impl ErrorRes {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".into(),
            message: message.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub status: String,
    pub service: String,
    pub version: String,
}
