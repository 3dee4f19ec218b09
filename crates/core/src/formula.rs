//! CAVI-equivalent index formula.
//!
//! `index = M * (2 * RHO / dp) * ln(systolic / diastolic) * pwv^2 + A`
//!
//! where `M` is the age coefficient, `A` the disease coefficient and `dp` the pulse pressure.
//! The engine never fails: any input it cannot score yields [`SENTINEL_INDEX`], so a batch
//! always carries one result per group.

use crate::constants::{
    AGE_COEFFICIENT_ELDERLY, AGE_COEFFICIENT_MIDDLE, AGE_COEFFICIENT_YOUNG,
    DISEASE_COEFFICIENT_BASELINE, DISEASE_COEFFICIENT_DIABETES, RHO, SENTINEL_INDEX,
};
use serde::{Deserialize, Serialize};

/// Age classification of a patient group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeGroup {
    Young,
    #[default]
    Middle,
    Elderly,
}

impl AgeGroup {
    /// Parses an age group name, falling back to `Middle` for anything unrecognised.
    pub fn parse_lenient(value: Option<&str>) -> Self {
        match value {
            Some("young") => AgeGroup::Young,
            Some("elderly") => AgeGroup::Elderly,
            _ => AgeGroup::Middle,
        }
    }

    /// Age coefficient `M`.
    pub fn coefficient(self) -> f64 {
        match self {
            AgeGroup::Young => AGE_COEFFICIENT_YOUNG,
            AgeGroup::Middle => AGE_COEFFICIENT_MIDDLE,
            AgeGroup::Elderly => AGE_COEFFICIENT_ELDERLY,
        }
    }
}

/// Disease classification of a patient group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiseaseType {
    Diabetes,
    Hypertension,
}

impl DiseaseType {
    /// Parses a disease name; unrecognised values behave as no disease.
    pub fn parse_lenient(value: Option<&str>) -> Option<Self> {
        match value {
            Some("diabetes") => Some(DiseaseType::Diabetes),
            Some("hypertension") => Some(DiseaseType::Hypertension),
            _ => None,
        }
    }
}

/// Disease coefficient `A`.
///
/// Only diabetes moves the coefficient; hypertension currently scores as baseline.
pub fn disease_coefficient(disease_type: Option<DiseaseType>) -> f64 {
    match disease_type {
        Some(DiseaseType::Diabetes) => DISEASE_COEFFICIENT_DIABETES,
        Some(DiseaseType::Hypertension) | None => DISEASE_COEFFICIENT_BASELINE,
    }
}

/// Rounds to three decimal places, ties to even.
pub fn round_to_millis(value: f64) -> f64 {
    (value * 1000.0).round_ties_even() / 1000.0
}

/// Computes the index for one group.
///
/// Returns [`SENTINEL_INDEX`] when any measurement is zero, when `systolic <= diastolic`, or
/// when the result is not a finite number.
pub fn compute_index(
    age_group: AgeGroup,
    disease_type: Option<DiseaseType>,
    systolic: u32,
    diastolic: u32,
    pulse_wave_velocity: f64,
) -> f64 {
    if systolic == 0 || diastolic == 0 || pulse_wave_velocity == 0.0 {
        return SENTINEL_INDEX;
    }
    if systolic <= diastolic {
        return SENTINEL_INDEX;
    }

    let ps = f64::from(systolic);
    let pd = f64::from(diastolic);
    let dp = ps - pd;

    let m = age_group.coefficient();
    let a = disease_coefficient(disease_type);

    let index = m * (2.0 * RHO / dp) * (ps / pd).ln() * pulse_wave_velocity.powi(2) + a;
    if !index.is_finite() {
        return SENTINEL_INDEX;
    }

    round_to_millis(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn has_at_most_three_decimals(value: f64) -> bool {
        let scaled = value * 1000.0;
        (scaled - scaled.round()).abs() < 1e-6
    }

    #[test]
    fn test_compute_index_reference_young_no_disease() {
        let index = compute_index(AgeGroup::Young, None, 120, 80, 8.5);
        assert_eq!(index, 2.384);
    }

    #[test]
    fn test_compute_index_reference_elderly_diabetes() {
        // 1.1 * (2.1 / 50) * ln(140/90) * 10.2^2 + 1.2 = 3.32373...
        let index = compute_index(AgeGroup::Elderly, Some(DiseaseType::Diabetes), 140, 90, 10.2);
        assert_eq!(index, 3.324);
    }

    #[test]
    fn test_compute_index_middle_baseline_and_diabetes_differ_by_coefficient_gap() {
        let baseline = compute_index(AgeGroup::Middle, None, 120, 80, 8.5);
        let diabetes = compute_index(AgeGroup::Middle, Some(DiseaseType::Diabetes), 120, 80, 8.5);
        assert_eq!(baseline, 2.538);
        assert_eq!(diabetes, 2.738);
    }

    #[test]
    fn test_compute_index_hypertension_scores_as_baseline() {
        let none = compute_index(AgeGroup::Middle, None, 130, 85, 9.1);
        let hypertension =
            compute_index(AgeGroup::Middle, Some(DiseaseType::Hypertension), 130, 85, 9.1);
        assert_eq!(none, hypertension);
    }

    #[test]
    fn test_compute_index_inverted_pressures_return_sentinel() {
        assert_eq!(compute_index(AgeGroup::Young, None, 80, 120, 8.5), 0.0);
        assert_eq!(
            compute_index(AgeGroup::Elderly, Some(DiseaseType::Diabetes), 80, 120, 12.0),
            0.0
        );
    }

    #[test]
    fn test_compute_index_equal_pressures_return_sentinel() {
        assert_eq!(compute_index(AgeGroup::Middle, None, 100, 100, 8.5), 0.0);
    }

    #[test]
    fn test_compute_index_zero_measurements_return_sentinel() {
        assert_eq!(compute_index(AgeGroup::Middle, None, 0, 80, 8.5), 0.0);
        assert_eq!(compute_index(AgeGroup::Middle, None, 120, 0, 8.5), 0.0);
        assert_eq!(compute_index(AgeGroup::Middle, None, 120, 80, 0.0), 0.0);
    }

    #[test]
    fn test_compute_index_is_deterministic_and_rounded() {
        for (ps, pd, pwv) in [(121, 79, 7.3), (180, 60, 15.55), (95, 94, 4.0), (200, 150, 11.11)] {
            let first = compute_index(AgeGroup::Elderly, None, ps, pd, pwv);
            let second = compute_index(AgeGroup::Elderly, None, ps, pd, pwv);
            assert_eq!(first, second);
            assert!(has_at_most_three_decimals(first), "{first} not rounded");
        }
    }

    #[test]
    fn test_age_coefficients() {
        assert_eq!(AgeGroup::Young.coefficient(), 0.9);
        assert_eq!(AgeGroup::Middle.coefficient(), 1.0);
        assert_eq!(AgeGroup::Elderly.coefficient(), 1.1);
    }

    #[test]
    fn test_age_group_parse_lenient_defaults_to_middle() {
        assert_eq!(AgeGroup::parse_lenient(Some("young")), AgeGroup::Young);
        assert_eq!(AgeGroup::parse_lenient(Some("elderly")), AgeGroup::Elderly);
        assert_eq!(AgeGroup::parse_lenient(Some("middle")), AgeGroup::Middle);
        assert_eq!(AgeGroup::parse_lenient(Some("Young")), AgeGroup::Middle);
        assert_eq!(AgeGroup::parse_lenient(Some("toddler")), AgeGroup::Middle);
        assert_eq!(AgeGroup::parse_lenient(None), AgeGroup::Middle);
        assert_eq!(AgeGroup::parse_lenient(None).coefficient(), 1.0);
    }

    #[test]
    fn test_disease_coefficient_only_diabetes_differs() {
        assert_eq!(disease_coefficient(Some(DiseaseType::Diabetes)), 1.2);
        assert_eq!(disease_coefficient(Some(DiseaseType::Hypertension)), 1.0);
        assert_eq!(disease_coefficient(None), 1.0);
        assert_eq!(
            disease_coefficient(DiseaseType::parse_lenient(Some("asthma"))),
            1.0
        );
    }

    #[test]
    fn test_round_to_millis_ties_to_even() {
        // Exactly representable halves so the tie is real, not a binary artefact.
        assert_eq!(round_to_millis(0.0625), 0.062);
        assert_eq!(round_to_millis(0.1875), 0.188);
        assert_eq!(round_to_millis(2.3841), 2.384);
        assert_eq!(round_to_millis(2.3846), 2.385);
    }

    fn any_age_group() -> impl Strategy<Value = AgeGroup> {
        prop_oneof![
            Just(AgeGroup::Young),
            Just(AgeGroup::Middle),
            Just(AgeGroup::Elderly)
        ]
    }

    fn any_disease_type() -> impl Strategy<Value = Option<DiseaseType>> {
        prop_oneof![
            Just(None),
            Just(Some(DiseaseType::Diabetes)),
            Just(Some(DiseaseType::Hypertension))
        ]
    }

    proptest! {
        #[test]
        fn prop_valid_inputs_are_deterministic_and_rounded(
            age in any_age_group(),
            disease in any_disease_type(),
            (diastolic, systolic) in (1u32..300).prop_flat_map(|pd| (Just(pd), (pd + 1)..=400u32)),
            pwv in 0.1f64..30.0,
        ) {
            let first = compute_index(age, disease, systolic, diastolic, pwv);
            let second = compute_index(age, disease, systolic, diastolic, pwv);
            prop_assert_eq!(first, second);
            prop_assert!(first.is_finite());
            prop_assert!(has_at_most_three_decimals(first), "{} not rounded", first);
            // The pressure term is positive, so the index sits above the disease coefficient.
            prop_assert!(first >= disease_coefficient(disease));
        }

        #[test]
        fn prop_non_increasing_pressures_return_sentinel(
            age in any_age_group(),
            disease in any_disease_type(),
            (systolic, diastolic) in (1u32..300).prop_flat_map(|ps| (Just(ps), ps..=400u32)),
            pwv in 0.1f64..30.0,
        ) {
            prop_assert_eq!(compute_index(age, disease, systolic, diastolic, pwv), 0.0);
        }

        #[test]
        fn prop_zero_measurement_returns_sentinel(
            age in any_age_group(),
            disease in any_disease_type(),
            systolic in 0u32..400,
            diastolic in 0u32..400,
            pwv in 0.1f64..30.0,
            zeroed in 0usize..3,
        ) {
            let (ps, pd, v) = match zeroed {
                0 => (0, diastolic, pwv),
                1 => (systolic, 0, pwv),
                _ => (systolic, diastolic, 0.0),
            };
            prop_assert_eq!(compute_index(age, disease, ps, pd, v), 0.0);
        }
    }
}
