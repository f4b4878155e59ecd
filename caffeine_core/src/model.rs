//! Single-dose pharmacokinetic model.
//!
//! A drink is treated as a constant-rate infusion into one compartment with
//! first-order elimination, preceded by a fixed absorption lag:
//!
//! ```text
//!  t < delay                 0
//!  delay <= t < delay + T    D / (T·Vd·k) · (1 − e^(−k·e)),  e = t − delay
//!  t >= delay + T            C_end · e^(−k·e),               e = t − delay − T
//! ```
//!
//! `C_end` depends on [`PostInfusion`]. All constants live in
//! [`ModelConstants`] so a model can be built with explicit parameters.

use crate::error::ensure_positive;
use crate::{DrinkEvent, Error, Result, SampleParameters};
use serde::{Deserialize, Serialize};

/// How the elimination phase is anchored once a drink is finished.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PostInfusion {
    /// Decay from the concentration reached at the end of the infusion.
    /// The curve is continuous at the boundary.
    #[default]
    Continuous,
    /// Decay from `D / Vd`, as if the whole dose were present at once.
    /// Jumps upward slightly at the end of the infusion.
    FullDose,
}

/// Named model constants, injectable per computation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ModelConstants {
    /// Lag before caffeine reaches circulation, in hours
    #[serde(default = "default_absorption_delay_hrs")]
    pub absorption_delay_hrs: f64,

    /// Volume of distribution per kg of body weight, in L/kg
    #[serde(default = "default_vd_l_per_kg")]
    pub vd_l_per_kg: f64,

    #[serde(default = "default_lbs_to_kg")]
    pub lbs_to_kg: f64,

    #[serde(default)]
    pub post_infusion: PostInfusion,
}

impl Default for ModelConstants {
    fn default() -> Self {
        Self {
            absorption_delay_hrs: default_absorption_delay_hrs(),
            vd_l_per_kg: default_vd_l_per_kg(),
            lbs_to_kg: default_lbs_to_kg(),
            post_infusion: PostInfusion::default(),
        }
    }
}

fn default_absorption_delay_hrs() -> f64 {
    0.1
}

fn default_vd_l_per_kg() -> f64 {
    0.6
}

fn default_lbs_to_kg() -> f64 {
    0.453592
}

impl ModelConstants {
    pub fn validate(&self) -> Result<()> {
        if !(self.absorption_delay_hrs.is_finite() && self.absorption_delay_hrs >= 0.0) {
            return Err(Error::Validation(format!(
                "absorption_delay_hrs must be non-negative, got {}",
                self.absorption_delay_hrs
            )));
        }
        ensure_positive("vd_l_per_kg", self.vd_l_per_kg)?;
        ensure_positive("lbs_to_kg", self.lbs_to_kg)
    }

    /// Volume of distribution in litres for a body weight in pounds.
    pub fn volume_of_distribution(&self, weight_lbs: f64) -> f64 {
        self.vd_l_per_kg * weight_lbs * self.lbs_to_kg
    }
}

/// Where an observation falls relative to one drink.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    PreAbsorption,
    Infusion { elapsed_hrs: f64 },
    Elimination { elapsed_hrs: f64 },
}

/// A one-compartment model bound to one person's half-life and weight.
#[derive(Clone, Debug)]
pub struct PkModel {
    constants: ModelConstants,
    k: f64,
    vd_l: f64,
}

impl PkModel {
    pub fn new(params: &SampleParameters, constants: &ModelConstants) -> Result<Self> {
        params.validate()?;
        constants.validate()?;

        Ok(Self {
            constants: constants.clone(),
            k: params.elimination_rate(),
            vd_l: constants.volume_of_distribution(params.weight_lbs),
        })
    }

    pub fn constants(&self) -> &ModelConstants {
        &self.constants
    }

    /// Elimination rate constant per hour
    pub fn elimination_rate(&self) -> f64 {
        self.k
    }

    /// Volume of distribution in litres
    pub fn volume_l(&self) -> f64 {
        self.vd_l
    }

    pub fn phase(&self, duration_hrs: f64, elapsed_hrs: f64) -> Phase {
        let delay = self.constants.absorption_delay_hrs;
        if elapsed_hrs < delay {
            Phase::PreAbsorption
        } else if elapsed_hrs < delay + duration_hrs {
            Phase::Infusion {
                elapsed_hrs: elapsed_hrs - delay,
            }
        } else {
            Phase::Elimination {
                elapsed_hrs: elapsed_hrs - delay - duration_hrs,
            }
        }
    }

    /// Plasma concentration (mg/L) contributed by one drink, `elapsed_hrs`
    /// after it was started. The drink is assumed to be validated.
    pub fn density(&self, drink: &DrinkEvent, elapsed_hrs: f64) -> f64 {
        self.dose_density(drink.dose_mg, drink.duration_hrs, elapsed_hrs)
    }

    fn dose_density(&self, dose_mg: f64, duration_hrs: f64, elapsed_hrs: f64) -> f64 {
        let k = self.k;
        // D / (T·Vd·k) · (1 − e^(−k·e))
        let infused = |e: f64| dose_mg / (duration_hrs * self.vd_l * k) * -(-k * e).exp_m1();

        match self.phase(duration_hrs, elapsed_hrs) {
            Phase::PreAbsorption => 0.0,
            Phase::Infusion { elapsed_hrs } => infused(elapsed_hrs),
            Phase::Elimination { elapsed_hrs } => {
                let start = match self.constants.post_infusion {
                    PostInfusion::Continuous => infused(duration_hrs),
                    PostInfusion::FullDose => dose_mg / self.vd_l,
                };
                start * (-k * elapsed_hrs).exp()
            }
        }
    }

    /// Convert a concentration to a body mass using the same `Vd` as the model.
    pub fn to_total_mg(&self, density_mg_per_l: f64) -> f64 {
        density_mg_per_l * self.vd_l
    }
}

/// Concentration (mg/L) from a single dose at `elapsed_hrs` after the drink started.
pub fn single_dose_concentration(
    elapsed_hrs: f64,
    dose_mg: f64,
    duration_hrs: f64,
    params: &SampleParameters,
    constants: &ModelConstants,
) -> Result<f64> {
    ensure_positive("dose_mg", dose_mg)?;
    ensure_positive("duration_hrs", duration_hrs)?;
    let model = PkModel::new(params, constants)?;
    Ok(model.dose_density(dose_mg, duration_hrs, elapsed_hrs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params() -> SampleParameters {
        SampleParameters::new(5.0, 155.0).unwrap()
    }

    fn model() -> PkModel {
        PkModel::new(&params(), &ModelConstants::default()).unwrap()
    }

    #[test]
    fn test_default_constants() {
        let m = model();
        assert_relative_eq!(m.volume_l(), 0.6 * 155.0 * 0.453592, epsilon = 1e-12);
        assert_relative_eq!(m.elimination_rate(), std::f64::consts::LN_2 / 5.0);
    }

    #[test]
    fn test_zero_before_absorption_delay() {
        let constants = ModelConstants::default();
        for half_life in [0.5, 3.0, 7.0, 40.0] {
            for weight in [50.0, 155.0, 300.0] {
                let p = SampleParameters::new(half_life, weight).unwrap();
                for t in [-3.0, 0.0, 0.05, 0.0999] {
                    let c = single_dose_concentration(t, 95.0, 0.25, &p, &constants).unwrap();
                    assert_eq!(c, 0.0, "t={} h={} w={}", t, half_life, weight);
                }
            }
        }
    }

    #[test]
    fn test_infusion_formula() {
        let m = model();
        let k = m.elimination_rate();
        let e = 0.1;
        let expected = 95.0 / (0.25 * m.volume_l() * k) * (1.0 - (-k * e).exp());
        let drink = DrinkEvent::new("08:00", 95.0, 0.25).unwrap();
        assert_relative_eq!(m.density(&drink, 0.1 + e), expected, max_relative = 1e-12);
    }

    #[test]
    fn test_full_dose_elimination_formula() {
        let constants = ModelConstants {
            post_infusion: PostInfusion::FullDose,
            ..ModelConstants::default()
        };
        let m = PkModel::new(&params(), &constants).unwrap();
        let k = m.elimination_rate();
        let drink = DrinkEvent::new("08:00", 95.0, 0.25).unwrap();

        let c = m.density(&drink, 0.1 + 0.25 + 2.0);
        let expected = 95.0 / m.volume_l() * (-k * 2.0).exp();
        assert_relative_eq!(c, expected, max_relative = 1e-12);
    }

    #[test]
    fn test_continuous_at_infusion_end() {
        let constants = ModelConstants::default();
        for half_life in [1.0, 3.0, 5.0, 7.0] {
            for duration in [1e-4, 1.0 / 60.0, 0.25, 1.0, 8.0] {
                let p = SampleParameters::new(half_life, 155.0).unwrap();
                let m = PkModel::new(&p, &constants).unwrap();
                let boundary = constants.absorption_delay_hrs + duration;

                let just_before = boundary - duration * 1e-8;
                assert!(matches!(m.phase(duration, just_before), Phase::Infusion { .. }));
                assert!(matches!(m.phase(duration, boundary), Phase::Elimination { .. }));

                let before = m.dose_density(95.0, duration, just_before);
                let at = m.dose_density(95.0, duration, boundary);
                assert_relative_eq!(before, at, max_relative = 1e-6);
            }
        }
    }

    #[test]
    fn test_full_dose_anchor_jumps_at_infusion_end() {
        let constants = ModelConstants {
            post_infusion: PostInfusion::FullDose,
            ..ModelConstants::default()
        };
        let m = PkModel::new(&params(), &constants).unwrap();
        let boundary = 0.1 + 1.0;
        let before = m.dose_density(95.0, 1.0, boundary - 1e-9);
        let at = m.dose_density(95.0, 1.0, boundary);
        assert!(at > before * 1.01);
    }

    #[test]
    fn test_strictly_decreasing_after_infusion() {
        let m = model();
        let drink = DrinkEvent::new("08:00", 95.0, 0.25).unwrap();
        let mut previous = m.density(&drink, 0.35);
        for i in 1..100 {
            let c = m.density(&drink, 0.35 + i as f64 * 0.25);
            assert!(c < previous);
            previous = c;
        }
    }

    #[test]
    fn test_rises_during_infusion() {
        let m = model();
        let drink = DrinkEvent::new("08:00", 200.0, 2.0).unwrap();
        let mut previous = 0.0;
        for i in 1..8 {
            let c = m.density(&drink, 0.1 + i as f64 * 0.25);
            assert!(c > previous);
            previous = c;
        }
    }

    #[test]
    fn test_rejects_invalid_inputs() {
        let p = params();
        let c = ModelConstants::default();
        assert!(single_dose_concentration(1.0, 0.0, 0.25, &p, &c).is_err());
        assert!(single_dose_concentration(1.0, 95.0, -0.25, &p, &c).is_err());

        let bad_half_life = SampleParameters {
            half_life_hrs: 0.0,
            weight_lbs: 155.0,
        };
        assert!(single_dose_concentration(1.0, 95.0, 0.25, &bad_half_life, &c).is_err());

        let bad_weight = SampleParameters {
            half_life_hrs: 5.0,
            weight_lbs: 0.0,
        };
        let err = single_dose_concentration(1.0, 95.0, 0.25, &bad_weight, &c).unwrap_err();
        assert!(err.is_validation());

        let bad_constants = ModelConstants {
            absorption_delay_hrs: -0.1,
            ..ModelConstants::default()
        };
        assert!(PkModel::new(&p, &bad_constants).is_err());
    }
}
