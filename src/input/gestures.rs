use std::time::{Duration, Instant};

use egui::Pos2;

use crate::geometry::hit_testing;

/// Detects when the pointer has rested long enough to trigger a hold.
///
/// Only displacement above the jitter threshold resets the timer; smaller
/// movements still update the last known position.
#[derive(Debug, Clone)]
pub struct HoldDetector {
    jitter_threshold: f32,
    hold_delay: Duration,
    last_position: Pos2,
    last_motion: Instant,
}

impl HoldDetector {
    pub fn new(jitter_threshold: f32, hold_delay: Duration, start: Pos2, time: Instant) -> Self {
        Self {
            jitter_threshold,
            hold_delay,
            last_position: start,
            last_motion: time,
        }
    }

    /// Record a new sample. Returns true if the position changed at all.
    pub fn track(&mut self, position: Pos2, time: Instant) -> bool {
        let displacement = hit_testing::distance(self.last_position, position);
        if displacement > self.jitter_threshold {
            self.last_motion = time;
        }
        self.last_position = position;
        displacement > 0.0
    }

    /// Whether the hold delay has elapsed without qualifying motion by `now`
    pub fn is_held(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_motion) >= self.hold_delay
    }

    /// When the hold fires if no qualifying motion arrives first
    pub fn deadline(&self) -> Instant {
        self.last_motion + self.hold_delay
    }

    pub fn last_position(&self) -> Pos2 {
        self.last_position
    }

    pub fn last_motion(&self) -> Instant {
        self.last_motion
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    const DELAY: Duration = Duration::from_millis(500);

    #[test]
    fn test_small_motion_does_not_reset_timer() {
        let t0 = Instant::now();
        let mut hold = HoldDetector::new(2.0, DELAY, pos2(0.0, 0.0), t0);

        assert!(hold.track(pos2(1.0, 0.0), t0 + Duration::from_millis(300)));
        assert_eq!(hold.last_position(), pos2(1.0, 0.0));
        assert_eq!(hold.last_motion(), t0);
        assert!(hold.is_held(t0 + DELAY));
    }

    #[test]
    fn test_large_motion_resets_timer() {
        let t0 = Instant::now();
        let mut hold = HoldDetector::new(2.0, DELAY, pos2(0.0, 0.0), t0);
        let t1 = t0 + Duration::from_millis(300);

        hold.track(pos2(5.0, 0.0), t1);
        assert!(!hold.is_held(t0 + DELAY));
        assert_eq!(hold.deadline(), t1 + DELAY);
    }

    #[test]
    fn test_unmoved_sample_reports_no_change() {
        let t0 = Instant::now();
        let mut hold = HoldDetector::new(2.0, DELAY, pos2(3.0, 3.0), t0);
        assert!(!hold.track(pos2(3.0, 3.0), t0));
    }
}
