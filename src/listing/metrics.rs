use chrono::NaiveDate;
use serde::Serialize;

/// Utilization ratio at which a capacity bar turns yellow.
pub const WARN_UTILIZATION: f64 = 0.70;
/// Utilization ratio at which a capacity bar turns red.
pub const CRITICAL_UTILIZATION: f64 = 0.90;

/// Completion percentage for a progress bar, rounded to the nearest whole
/// number and clamped into `[0, 100]`. A non-positive total reads as zero
/// progress rather than a division error.
pub fn progress_percent(current: f64, total: f64) -> u8 {
    if total <= 0.0 {
        return 0;
    }
    (current / total * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Traffic-light band for a utilization ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CapacityBand {
    Ok,
    Warn,
    Critical,
}

impl CapacityBand {
    /// Bootstrap contextual class used by the capacity bars.
    pub fn css_class(self) -> &'static str {
        match self {
            CapacityBand::Ok => "success",
            CapacityBand::Warn => "warning",
            CapacityBand::Critical => "danger",
        }
    }
}

/// Bands `current / max` against the utilization thresholds. A ratio exactly
/// on a threshold takes the more severe band. A non-positive `max` is
/// critical as soon as anything is booked against it.
pub fn capacity_band(current: f64, max: f64) -> CapacityBand {
    if max <= 0.0 {
        return if current > 0.0 {
            CapacityBand::Critical
        } else {
            CapacityBand::Ok
        };
    }

    let ratio = current / max;
    if ratio >= CRITICAL_UTILIZATION {
        CapacityBand::Critical
    } else if ratio >= WARN_UTILIZATION {
        CapacityBand::Warn
    } else {
        CapacityBand::Ok
    }
}

/// Signed whole days from `start` to `end`, negative when `end` precedes
/// `start`. Callers that want "0 days left" clamp at the display layer.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    end.signed_duration_since(start).num_days()
}
