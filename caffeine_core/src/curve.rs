//! Curve sampling over the drink timeline.
//!
//! Sampling starts a little before the first drink and steps forward at a
//! fixed interval until the total has stayed below the sleep threshold for a
//! run of consecutive samples. A horizon past the end of the last drink bounds
//! the walk so that inputs which never decay (a huge half-life, non-finite
//! arithmetic) surface as an invariant error instead of looping.

use crate::aggregate::{total_mass_at, validate_drinks};
use crate::clock::TimelineHours;
use crate::model::{ModelConstants, PkModel};
use crate::threshold::find_safe_time;
use crate::{ConcentrationSample, CurveResult, DrinkEvent, Error, Result, SampleParameters};
use serde::{Deserialize, Serialize};

/// Upper bound on the samples one curve may hold
pub const MAX_CURVE_SAMPLES: u64 = 100_000;

/// Sampling parameters for curve generation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CurveConfig {
    /// Interval between samples, in hours
    #[serde(default = "default_step_hrs")]
    pub step_hrs: f64,

    /// How far before the earliest drink the curve starts, in hours
    #[serde(default = "default_buffer_hrs")]
    pub buffer_hrs: f64,

    /// Total caffeine considered safe for sleep, in mg
    #[serde(default = "default_threshold_mg")]
    pub threshold_mg: f64,

    /// Consecutive below-threshold samples that end the curve
    #[serde(default = "default_points_below_threshold")]
    pub points_below_threshold: u32,

    /// Longest stretch the sampler will walk past the end of the last drink, in hours
    #[serde(default = "default_max_horizon_hrs")]
    pub max_horizon_hrs: f64,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            step_hrs: default_step_hrs(),
            buffer_hrs: default_buffer_hrs(),
            threshold_mg: default_threshold_mg(),
            points_below_threshold: default_points_below_threshold(),
            max_horizon_hrs: default_max_horizon_hrs(),
        }
    }
}

fn default_step_hrs() -> f64 {
    0.25
}

fn default_buffer_hrs() -> f64 {
    0.5
}

fn default_threshold_mg() -> f64 {
    30.0
}

fn default_points_below_threshold() -> u32 {
    4
}

fn default_max_horizon_hrs() -> f64 {
    48.0
}

impl CurveConfig {
    pub fn validate(&self) -> Result<()> {
        let positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(Error::Config(format!("{} must be positive, got {}", name, value)))
            }
        };

        positive("step_hrs", self.step_hrs)?;
        positive("threshold_mg", self.threshold_mg)?;
        positive("max_horizon_hrs", self.max_horizon_hrs)?;

        if !(self.buffer_hrs.is_finite() && self.buffer_hrs >= 0.0) {
            return Err(Error::Config(format!(
                "buffer_hrs must be non-negative, got {}",
                self.buffer_hrs
            )));
        }
        if self.points_below_threshold == 0 {
            return Err(Error::Config(
                "points_below_threshold must be at least 1".into(),
            ));
        }
        if self.max_horizon_hrs / self.step_hrs >= MAX_CURVE_SAMPLES as f64 {
            return Err(Error::Config(format!(
                "max_horizon_hrs / step_hrs must stay below {} samples, got {} / {}",
                MAX_CURVE_SAMPLES, self.max_horizon_hrs, self.step_hrs
            )));
        }
        Ok(())
    }

    /// Number of samples that fit in `span_hrs`, including the first.
    fn samples_within(&self, span_hrs: f64) -> f64 {
        (span_hrs / self.step_hrs).floor() + 1.0
    }
}

/// Lazy, finite sequence of curve samples.
///
/// Yields `Err(Error::Invariant)` once if the horizon is exhausted before the
/// stopping condition fires, then ends.
pub struct CurveSampler<'a> {
    model: PkModel,
    drinks: &'a [DrinkEvent],
    config: CurveConfig,
    start: Option<TimelineHours>,
    max_samples: u64,
    index: u64,
    below_run: u32,
    finished: bool,
}

impl<'a> CurveSampler<'a> {
    pub fn new(
        drinks: &'a [DrinkEvent],
        params: &SampleParameters,
        config: &CurveConfig,
        constants: &ModelConstants,
    ) -> Result<Self> {
        let model = PkModel::new(params, constants)?;
        config.validate()?;
        validate_drinks(drinks)?;

        let start = drinks
            .iter()
            .map(|d| d.start().hours())
            .reduce(f64::min)
            .map(|earliest| TimelineHours((earliest - config.buffer_hrs).max(0.0)));

        let latest_end = drinks
            .iter()
            .map(|d| d.start().hours() + d.duration_hrs)
            .reduce(f64::max);

        let max_samples = match (start, latest_end) {
            (Some(start), Some(end)) => {
                let limit = config.samples_within(end - start.hours() + config.max_horizon_hrs);
                if limit > MAX_CURVE_SAMPLES as f64 {
                    return Err(Error::Validation(format!(
                        "drinks from {} to {} span too long to sample",
                        start,
                        TimelineHours(end)
                    )));
                }
                limit as u64
            }
            _ => 0,
        };

        Ok(Self {
            model,
            drinks,
            config: config.clone(),
            start,
            max_samples,
            index: 0,
            below_run: 0,
            finished: start.is_none(),
        })
    }

    /// First sample time, `None` when there are no drinks.
    pub fn start(&self) -> Option<TimelineHours> {
        self.start
    }
}

impl Iterator for CurveSampler<'_> {
    type Item = Result<ConcentrationSample>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let start = self.start?;

        if self.index >= self.max_samples {
            self.finished = true;
            tracing::warn!(
                "Curve did not settle below {} mg within {} h of the last drink ({} samples from {})",
                self.config.threshold_mg,
                self.config.max_horizon_hrs,
                self.max_samples,
                start
            );
            return Some(Err(Error::Invariant(format!(
                "curve still above {} mg {} h after the last drink; stopping condition never triggered",
                self.config.threshold_mg, self.config.max_horizon_hrs
            ))));
        }

        let time = start.offset(self.index as f64 * self.config.step_hrs);
        let total_mg = total_mass_at(&self.model, time, self.drinks);
        self.index += 1;

        if total_mg < self.config.threshold_mg {
            self.below_run += 1;
        } else {
            self.below_run = 0;
        }
        if self.below_run >= self.config.points_below_threshold {
            self.finished = true;
        }

        Some(Ok(ConcentrationSample { time, total_mg }))
    }
}

/// Sample the curve with explicit sampling and model parameters.
pub fn generate_curve_with(
    drinks: &[DrinkEvent],
    params: &SampleParameters,
    config: &CurveConfig,
    constants: &ModelConstants,
) -> Result<CurveResult> {
    let samples = CurveSampler::new(drinks, params, config, constants)?
        .collect::<Result<Vec<_>>>()?;
    let safe_time = find_safe_time(&samples, config.threshold_mg);

    tracing::debug!(
        "Sampled {} points for {} drinks, safe time {:?}",
        samples.len(),
        drinks.len(),
        safe_time
    );

    Ok(CurveResult { samples, safe_time })
}

/// Sample the caffeine curve for a set of drinks using the default
/// sampling parameters and model constants.
pub fn generate_curve(
    drinks: &[DrinkEvent],
    half_life_hrs: f64,
    weight_lbs: f64,
) -> Result<CurveResult> {
    let params = SampleParameters::new(half_life_hrs, weight_lbs)?;
    generate_curve_with(
        drinks,
        &params,
        &CurveConfig::default(),
        &ModelConstants::default(),
    )
}
