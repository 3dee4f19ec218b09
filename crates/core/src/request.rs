//! Calculation request model and intake validation.
//!
//! The inbound body is checked for shape only: required fields present, `groups` non-empty and
//! each value of a usable JSON type. Physiological plausibility is left to the formula engine,
//! which degrades bad groups to the sentinel instead of rejecting the request.

use crate::constants::REQUIRED_FIELDS;
use crate::formula::{AgeGroup, DiseaseType};
use crate::{CaviError, CaviResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Caller-supplied identifier used only to correlate the eventual callback.
///
/// Any JSON scalar is accepted and echoed back in its original JSON form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CalculationId {
    Number(serde_json::Number),
    Text(String),
    Bool(bool),
}

impl CalculationId {
    fn from_value(value: &Value) -> CaviResult<Self> {
        match value {
            Value::Number(n) => Ok(CalculationId::Number(n.clone())),
            Value::String(s) => Ok(CalculationId::Text(s.clone())),
            Value::Bool(b) => Ok(CalculationId::Bool(*b)),
            _ => Err(CaviError::InvalidField {
                field: "calculation_id",
                reason: "must be a number, string or boolean".into(),
            }),
        }
    }
}

impl fmt::Display for CalculationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalculationId::Number(n) => write!(f, "{n}"),
            CalculationId::Text(s) => f.write_str(s),
            CalculationId::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// One patient group to score.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupSpec {
    /// Opaque identifier, passed through unchanged.
    pub group_id: Value,
    pub age_group: AgeGroup,
    pub disease_type: Option<DiseaseType>,
}

impl GroupSpec {
    fn from_value(value: &Value) -> CaviResult<Self> {
        let obj = value.as_object().ok_or_else(|| CaviError::InvalidField {
            field: "groups",
            reason: "each group must be an object".into(),
        })?;

        Ok(Self {
            group_id: obj.get("group_id").cloned().unwrap_or(Value::Null),
            age_group: AgeGroup::parse_lenient(obj.get("age_group").and_then(Value::as_str)),
            disease_type: DiseaseType::parse_lenient(
                obj.get("disease_type").and_then(Value::as_str),
            ),
        })
    }
}

/// Scored result for one group.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GroupResult {
    pub group_id: Value,
    pub cavi_index: f64,
}

/// A validated calculation request.
#[derive(Clone, Debug, PartialEq)]
pub struct CalculationRequest {
    pub calculation_id: CalculationId,
    pub systolic_pressure: u32,
    pub diastolic_pressure: u32,
    pub pulse_wave_velocity: f64,
    pub groups: Vec<GroupSpec>,
}

impl CalculationRequest {
    /// Validates an inbound JSON body.
    ///
    /// # Errors
    ///
    /// - [`CaviError::InvalidBody`] if the body is not a JSON object.
    /// - [`CaviError::MissingField`] for the first absent required field.
    /// - [`CaviError::InvalidField`] if a field has an unusable type.
    /// - [`CaviError::NoGroups`] if `groups` is an empty array.
    pub fn from_json(body: Value) -> CaviResult<Self> {
        let Value::Object(obj) = body else {
            return Err(CaviError::InvalidBody("expected a JSON object".into()));
        };

        if let Some(missing) = REQUIRED_FIELDS.iter().find(|f| !obj.contains_key(**f)) {
            return Err(CaviError::MissingField(*missing));
        }

        let calculation_id = CalculationId::from_value(&obj["calculation_id"])?;
        let systolic_pressure = pressure(&obj, "systolic_pressure")?;
        let diastolic_pressure = pressure(&obj, "diastolic_pressure")?;
        let pulse_wave_velocity =
            obj["pulse_wave_velocity"]
                .as_f64()
                .ok_or_else(|| CaviError::InvalidField {
                    field: "pulse_wave_velocity",
                    reason: "must be a number".into(),
                })?;

        let raw_groups = obj["groups"]
            .as_array()
            .ok_or_else(|| CaviError::InvalidField {
                field: "groups",
                reason: "must be an array".into(),
            })?;
        if raw_groups.is_empty() {
            return Err(CaviError::NoGroups);
        }
        let groups = raw_groups
            .iter()
            .map(GroupSpec::from_value)
            .collect::<CaviResult<Vec<_>>>()?;

        Ok(Self {
            calculation_id,
            systolic_pressure,
            diastolic_pressure,
            pulse_wave_velocity,
            groups,
        })
    }
}

/// Reads a pressure in mmHg. Whole-number floats such as `120.0` are accepted.
fn pressure(obj: &Map<String, Value>, field: &'static str) -> CaviResult<u32> {
    let value = &obj[field];
    let parsed = match value.as_u64() {
        Some(v) => u32::try_from(v).ok(),
        None => value
            .as_f64()
            .filter(|v| v.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(v))
            .map(|v| v as u32),
    };
    parsed.ok_or_else(|| CaviError::InvalidField {
        field,
        reason: "must be a non-negative whole number (mmHg)".into(),
    })
}
