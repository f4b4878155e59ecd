//! Personal profile: caffeine sensitivity and body weight.
//!
//! These are the ranges offered to a person when they describe themselves.
//! The model only requires positive values; the narrower ranges here are
//! enforced where input is collected.

use crate::{Error, Result, SampleParameters};
use serde::{Deserialize, Serialize};

pub const MIN_SENSITIVITY: u8 = 1;
pub const MAX_SENSITIVITY: u8 = 5;

pub const MIN_WEIGHT_LBS: u32 = 100;
pub const MAX_WEIGHT_LBS: u32 = 300;
pub const WEIGHT_STEP_LBS: u32 = 5;
pub const DEFAULT_WEIGHT_LBS: u32 = 155;

const SENSITIVITY_LABELS: [&str; 5] = [
    "Very Tolerant",
    "Somewhat Tolerant",
    "Average",
    "Somewhat Sensitive",
    "Very Sensitive",
];

/// Caffeine sensitivity on a 1 (very tolerant) to 5 (very sensitive) scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Sensitivity(u8);

impl Sensitivity {
    pub fn new(level: u8) -> Result<Self> {
        if (MIN_SENSITIVITY..=MAX_SENSITIVITY).contains(&level) {
            Ok(Self(level))
        } else {
            Err(Error::Validation(format!(
                "sensitivity must be between {} and {}, got {}",
                MIN_SENSITIVITY, MAX_SENSITIVITY, level
            )))
        }
    }

    /// Inverse of [`Sensitivity::half_life_hrs`]; only whole hours 3..=7 map back.
    pub fn from_half_life(hours: f64) -> Result<Self> {
        let level = hours - 2.0;
        if level.fract() != 0.0 || !(1.0..=5.0).contains(&level) {
            return Err(Error::Validation(format!(
                "half-life {} h does not correspond to a sensitivity level",
                hours
            )));
        }
        Self::new(level as u8)
    }

    pub fn level(self) -> u8 {
        self.0
    }

    /// Elimination half-life for this level: level 1 is 3 h, level 5 is 7 h.
    pub fn half_life_hrs(self) -> f64 {
        f64::from(self.0) + 2.0
    }

    pub fn label(self) -> &'static str {
        SENSITIVITY_LABELS[usize::from(self.0 - MIN_SENSITIVITY)]
    }
}

impl Default for Sensitivity {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<u8> for Sensitivity {
    type Error = Error;

    fn try_from(level: u8) -> Result<Self> {
        Self::new(level)
    }
}

impl From<Sensitivity> for u8 {
    fn from(s: Sensitivity) -> Self {
        s.0
    }
}

/// Body weight in pounds, within the selectable range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct WeightLbs(u32);

impl WeightLbs {
    pub fn new(lbs: u32) -> Result<Self> {
        if (MIN_WEIGHT_LBS..=MAX_WEIGHT_LBS).contains(&lbs) {
            Ok(Self(lbs))
        } else {
            Err(Error::Validation(format!(
                "weight must be between {} and {} lbs, got {}",
                MIN_WEIGHT_LBS, MAX_WEIGHT_LBS, lbs
            )))
        }
    }

    pub fn lbs(self) -> u32 {
        self.0
    }

    /// One step heavier, if still in range.
    pub fn increment(self) -> Option<Self> {
        Self::new(self.0 + WEIGHT_STEP_LBS).ok()
    }

    /// One step lighter, if still in range.
    pub fn decrement(self) -> Option<Self> {
        self.0
            .checked_sub(WEIGHT_STEP_LBS)
            .and_then(|lbs| Self::new(lbs).ok())
    }
}

impl Default for WeightLbs {
    fn default() -> Self {
        Self(DEFAULT_WEIGHT_LBS)
    }
}

impl TryFrom<u32> for WeightLbs {
    type Error = Error;

    fn try_from(lbs: u32) -> Result<Self> {
        Self::new(lbs)
    }
}

impl From<WeightLbs> for u32 {
    fn from(w: WeightLbs) -> Self {
        w.0
    }
}

/// A person's sensitivity and weight
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub sensitivity: Sensitivity,
    #[serde(default, rename = "weight_lbs")]
    pub weight: WeightLbs,
}

impl Profile {
    pub fn sample_parameters(&self) -> SampleParameters {
        SampleParameters {
            half_life_hrs: self.sensitivity.half_life_hrs(),
            weight_lbs: f64::from(self.weight.lbs()),
        }
    }
}
