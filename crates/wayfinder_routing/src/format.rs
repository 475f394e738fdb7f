use serde::{Deserialize, Serialize};

/// Meters below which imperial distances are shown in feet (0.1 mile).
const IMPERIAL_FEET_CUTOFF: f64 = 160.9344;
const METRIC_KILOMETER_CUTOFF: f64 = 1000.0;
const FEET_PER_METER: f64 = 3.280_839_895;
const METERS_PER_MILE: f64 = 1_609.344;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Imperial only for the exact `en-US` locale, metric everywhere else.
    pub fn from_locale(locale: &str) -> UnitSystem {
        if locale == "en-US" {
            UnitSystem::Imperial
        } else {
            UnitSystem::Metric
        }
    }
}

pub fn format_distance(meters: f64, units: UnitSystem) -> String {
    match units {
        UnitSystem::Imperial => {
            if meters.abs() < IMPERIAL_FEET_CUTOFF {
                format!("{} ft", (meters * FEET_PER_METER).round() as i64)
            } else {
                format!("{} mi", one_decimal(meters / METERS_PER_MILE))
            }
        }
        UnitSystem::Metric => {
            if meters.abs() < METRIC_KILOMETER_CUTOFF {
                format!("{} m", meters.round() as i64)
            } else {
                format!("{} km", one_decimal(meters / 1000.0))
            }
        }
    }
}

/// Days/hours/minutes with zero units omitted; seconds are never shown.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(pluralize(days, "day", "days"));
    }
    if hours > 0 {
        parts.push(pluralize(hours, "hour", "hours"));
    }
    if minutes > 0 {
        parts.push(pluralize(minutes, "min", "mins"));
    }

    if parts.is_empty() {
        return String::from("0 min");
    }

    parts.join(" ")
}

fn pluralize(value: u64, singular: &str, plural: &str) -> String {
    if value > 1 {
        format!("{} {}", value, plural)
    } else {
        format!("{} {}", value, singular)
    }
}

/// One decimal place, rendered as an integer when the decimal is zero.
fn one_decimal(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{:.1}", rounded)
    }
}
