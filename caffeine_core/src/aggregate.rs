//! Multi-dose aggregation.
//!
//! The model is linear, so the concentration from several drinks is the sum
//! of each drink's single-dose contribution at the same instant.

use crate::clock::{ClockTime, TimelineHours};
use crate::model::{ModelConstants, PkModel};
use crate::{DrinkEvent, Result, SampleParameters};

/// Validate every drink, failing on the first invalid one.
pub fn validate_drinks(drinks: &[DrinkEvent]) -> Result<()> {
    drinks.iter().try_for_each(DrinkEvent::validate)
}

/// Summed plasma concentration (mg/L) at `at`. Drinks must already be validated.
pub fn total_density_at(model: &PkModel, at: TimelineHours, drinks: &[DrinkEvent]) -> f64 {
    drinks
        .iter()
        .map(|drink| model.density(drink, at.since(drink.start())))
        .sum()
}

/// Summed caffeine at `at` expressed as a body mass in mg.
pub fn total_mass_at(model: &PkModel, at: TimelineHours, drinks: &[DrinkEvent]) -> f64 {
    model.to_total_mg(total_density_at(model, at, drinks))
}

/// Total caffeine in mg at a clock time, with explicit model constants.
pub fn compute_concentration_with(
    observation: ClockTime,
    drinks: &[DrinkEvent],
    params: &SampleParameters,
    constants: &ModelConstants,
) -> Result<f64> {
    let model = PkModel::new(params, constants)?;
    validate_drinks(drinks)?;

    let total = total_mass_at(&model, observation.to_timeline(), drinks);
    tracing::debug!(
        "Concentration at {} from {} drinks: {:.1} mg",
        observation,
        drinks.len(),
        total
    );
    Ok(total)
}

/// Total caffeine in mg at `observation_time` (`"HH:mm"`) for a set of drinks.
///
/// Fails with a validation error for a malformed time, a non-positive
/// half-life or weight, or any invalid drink.
pub fn compute_concentration(
    observation_time: &str,
    drinks: &[DrinkEvent],
    half_life_hrs: f64,
    weight_lbs: f64,
) -> Result<f64> {
    let params = SampleParameters::new(half_life_hrs, weight_lbs)?;
    let observation: ClockTime = observation_time.parse()?;
    compute_concentration_with(observation, drinks, &params, &ModelConstants::default())
}
