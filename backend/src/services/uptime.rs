//! Process uptime, reported in whole seconds, minutes, hours and days.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Uptime broken down into cumulative totals.
///
/// Each field is the integer division of the previous one, so 90 seconds reads
/// as `uptime_total_s = 90, uptime_total_m = 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Uptime {
    pub uptime_total_s: u64,
    pub uptime_total_m: u64,
    pub uptime_total_h: u64,
    pub uptime_total_d: u64,
}

impl From<Duration> for Uptime {
    fn from(elapsed: Duration) -> Self {
        let uptime_total_s = elapsed.as_secs();
        let uptime_total_m = uptime_total_s / 60;
        let uptime_total_h = uptime_total_m / 60;
        Self {
            uptime_total_s,
            uptime_total_m,
            uptime_total_h,
            uptime_total_d: uptime_total_h / 24,
        }
    }
}

/// Remembers when the server started.
#[derive(Debug, Clone, Copy)]
pub struct UptimeTracker {
    started: Instant,
}

impl UptimeTracker {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn uptime(&self) -> Uptime {
        Uptime::from(self.started.elapsed())
    }
}

impl Default for UptimeTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uptime_breakdown() {
        let uptime = Uptime::from(Duration::from_millis(90_061_999));
        assert_eq!(uptime.uptime_total_s, 90_061);
        assert_eq!(uptime.uptime_total_m, 1_501);
        assert_eq!(uptime.uptime_total_h, 25);
        assert_eq!(uptime.uptime_total_d, 1);
    }

    #[test]
    fn test_fresh_tracker_reports_zero() {
        let uptime = UptimeTracker::new().uptime();
        assert_eq!(uptime.uptime_total_m, 0);
        assert_eq!(uptime.uptime_total_d, 0);
    }
}
