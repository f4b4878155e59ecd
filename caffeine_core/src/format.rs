//! Display formatting for times, durations and curve summaries.

use crate::clock::{ClockTime, TimelineHours};
use crate::CurveResult;

/// "30 min", "1h 30m", "2h"
pub fn format_duration(minutes: u32) -> String {
    if minutes < 60 {
        return format!("{} min", minutes);
    }
    let hours = minutes / 60;
    let mins = minutes % 60;
    if mins > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}h", hours)
    }
}

/// 12-hour clock form of a wall-clock time, e.g. "9:30 AM".
pub fn format_clock_12h(time: ClockTime) -> String {
    let hour = time.hour() % 24;
    let period = if hour >= 12 { "PM" } else { "AM" };
    let display_hour = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02} {}", display_hour, time.minute(), period)
}

/// 12-hour label for a timeline instant, marking instants past midnight.
pub fn format_time_label(time: TimelineHours) -> String {
    let label = format_clock_12h(time.to_clock(true));
    if time.is_next_day() {
        format!("{} (next day)", label)
    } else {
        label
    }
}

/// One-line advisory describing the inputs and the earliest bedtime.
pub fn summary(curve: &CurveResult, drink_count: usize, weight_lbs: f64, half_life_hrs: f64) -> String {
    let plural = if drink_count == 1 { "" } else { "s" };
    let mut text = format!(
        "Based on {} drink{}, {} lbs weight, and {} hour half-life",
        drink_count, plural, weight_lbs, half_life_hrs
    );
    if let Some(safe) = curve.safe_time {
        text.push_str(&format!(
            ", your earliest bedtime should be {}",
            format_time_label(safe)
        ));
    }
    text
}
