//! Core domain types for the caffeine curve system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Drink events fed to the model and the drink records they come from
//! - Per-run sampling parameters (half-life, body weight)
//! - Curve samples and the sampled curve result
//! - The drink preset catalog type

use crate::clock::{ClockTime, TimelineHours};
use crate::error::ensure_positive;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

// ============================================================================
// Model Inputs
// ============================================================================

/// One caffeine intake as seen by the model.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DrinkEvent {
    /// Time of day the drink was started
    pub start_time: ClockTime,
    /// Total caffeine in milligrams
    pub dose_mg: f64,
    /// Time over which the dose is consumed, in hours
    pub duration_hrs: f64,
}

impl DrinkEvent {
    /// Parse the start time and validate the event in one step.
    pub fn new(start_time: &str, dose_mg: f64, duration_hrs: f64) -> Result<Self> {
        let event = Self {
            start_time: start_time.parse()?,
            dose_mg,
            duration_hrs,
        };
        event.validate()?;
        Ok(event)
    }

    pub fn validate(&self) -> Result<()> {
        ensure_positive("dose_mg", self.dose_mg)?;
        ensure_positive("duration_hrs", self.duration_hrs)
    }

    pub fn start(&self) -> TimelineHours {
        self.start_time.to_timeline()
    }
}

/// Scalar knobs shared by every drink in one computation.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct SampleParameters {
    /// Personalised elimination half-life in hours
    pub half_life_hrs: f64,
    /// Body weight in pounds
    pub weight_lbs: f64,
}

impl SampleParameters {
    pub fn new(half_life_hrs: f64, weight_lbs: f64) -> Result<Self> {
        let params = Self {
            half_life_hrs,
            weight_lbs,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        ensure_positive("half_life_hrs", self.half_life_hrs)?;
        ensure_positive("weight_lbs", self.weight_lbs)
    }

    /// First-order elimination constant `ln 2 / half-life`, per hour.
    pub fn elimination_rate(&self) -> f64 {
        std::f64::consts::LN_2 / self.half_life_hrs
    }
}

// ============================================================================
// Curve Output
// ============================================================================

/// One point of the sampled curve.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct ConcentrationSample {
    pub time: TimelineHours,
    /// Aggregate caffeine expressed as a body mass in mg (not mg/L)
    pub total_mg: f64,
}

/// The sampled curve plus the first falling-edge crossing below the sleep threshold.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CurveResult {
    /// Samples in increasing time order at a fixed step
    pub samples: Vec<ConcentrationSample>,
    pub safe_time: Option<TimelineHours>,
}

impl CurveResult {
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Highest sample on the curve (earliest one on ties).
    pub fn peak(&self) -> Option<&ConcentrationSample> {
        self.samples.iter().fold(None, |best, s| match best {
            Some(b) if b.total_mg >= s.total_mg => Some(b),
            _ => Some(s),
        })
    }
}

// ============================================================================
// Drink Records and Presets
// ============================================================================

/// Shortest drinking duration offered when logging a drink, in minutes
pub const MIN_DRINK_DURATION_MIN: u32 = 15;
/// Longest drinking duration offered when logging a drink, in minutes
pub const MAX_DRINK_DURATION_MIN: u32 = 480;
/// Granularity of logged drinking durations, in minutes
pub const DRINK_DURATION_STEP_MIN: u32 = 15;
/// Duration used for a drink recorded as taking zero minutes
pub const INSTANT_DRINK_DURATION_MIN: f64 = 1.0;

/// A drink as recorded by a person: what, when, and for how long.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Drink {
    pub id: Uuid,
    pub label: String,
    pub caffeine_mg: f64,
    pub time: ClockTime,
    pub duration_min: u32,
}

impl Drink {
    /// A `duration_min` of 0 records a drink taken all at once; otherwise
    /// it must be a multiple of 15 between 15 and 480.
    pub fn new(label: &str, caffeine_mg: f64, time: ClockTime, duration_min: u32) -> Result<Self> {
        ensure_positive("caffeine_mg", caffeine_mg)?;
        let in_range = (MIN_DRINK_DURATION_MIN..=MAX_DRINK_DURATION_MIN).contains(&duration_min)
            && duration_min % DRINK_DURATION_STEP_MIN == 0;
        if duration_min != 0 && !in_range {
            return Err(crate::Error::Validation(format!(
                "duration must be 0 or {}-{} minutes in steps of {}, got {}",
                MIN_DRINK_DURATION_MIN, MAX_DRINK_DURATION_MIN, DRINK_DURATION_STEP_MIN, duration_min
            )));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            label: label.to_string(),
            caffeine_mg,
            time,
            duration_min,
        })
    }

    pub fn from_preset(preset: &DrinkPreset, time: ClockTime, duration_min: u32) -> Result<Self> {
        Self::new(&preset.label, preset.caffeine_mg, time, duration_min)
    }

    /// Convert to a model event. A zero-minute drink becomes a one-minute
    /// infusion since the model needs a strictly positive duration.
    pub fn to_event(&self) -> Result<DrinkEvent> {
        let minutes = if self.duration_min == 0 {
            INSTANT_DRINK_DURATION_MIN
        } else {
            self.duration_min as f64
        };

        let event = DrinkEvent {
            start_time: self.time,
            dose_mg: self.caffeine_mg,
            duration_hrs: minutes / 60.0,
        };
        event.validate()?;
        Ok(event)
    }
}

/// A named drink with a known caffeine content.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DrinkPreset {
    pub id: String,
    pub label: String,
    pub caffeine_mg: f64,
}

/// The catalog of drink presets, keyed by id
#[derive(Clone, Debug, Default)]
pub struct PresetCatalog {
    pub presets: BTreeMap<String, DrinkPreset>,
}
