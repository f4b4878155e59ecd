//! Sleep-threshold crossing detection.

use crate::clock::TimelineHours;
use crate::ConcentrationSample;

/// Time of the first falling-edge crossing below `threshold_mg`.
///
/// A sample qualifies when it is below the threshold and strictly lower than
/// the sample before it, so a flat pre-dose baseline or a reading taken while
/// the curve is still rising never counts. The first sample has no
/// predecessor and is never reported. `None` means no crossing happened in
/// the sampled range.
pub fn find_safe_time(
    samples: &[ConcentrationSample],
    threshold_mg: f64,
) -> Option<TimelineHours> {
    samples
        .windows(2)
        .find(|pair| pair[1].total_mg < threshold_mg && pair[1].total_mg < pair[0].total_mg)
        .map(|pair| pair[1].time)
}
