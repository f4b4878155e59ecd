#![forbid(unsafe_code)]

//! Caffeine concentration modelling and curve generation.
//!
//! This crate provides:
//! - A time codec between `HH:mm` clock times and a decimal-hour timeline
//! - A one-compartment infusion/elimination model for a single drink
//! - Multi-drink aggregation and curve sampling
//! - Detection of the first falling crossing below the sleep threshold
//! - Drink presets, profile ranges, formatting, export and configuration

pub mod types;
pub mod error;
pub mod clock;
pub mod model;
pub mod aggregate;
pub mod curve;
pub mod threshold;
pub mod presets;
pub mod profile;
pub mod format;
pub mod export;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use clock::{ClockTime, TimelineHours};
pub use model::{single_dose_concentration, ModelConstants, PkModel, PostInfusion};
pub use aggregate::{compute_concentration, compute_concentration_with};
pub use curve::{generate_curve, generate_curve_with, CurveConfig, CurveSampler};
pub use threshold::find_safe_time;
pub use presets::{find_preset, get_default_presets};
pub use profile::{Profile, Sensitivity, WeightLbs};
pub use config::Config;
