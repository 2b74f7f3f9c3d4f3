use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use log::debug;

use super::{PointerSample, StrokeInputMachine};
use crate::controller::DrawController;
use crate::error::DrawResult;

/// Result of waiting on a [`SampleSource`]
#[derive(Debug, Clone, PartialEq)]
pub enum SourceEvent {
    Sample(PointerSample),
    /// The timeout elapsed before a sample arrived
    TimedOut,
    /// No more samples will ever arrive
    Closed,
}

/// Delivers pointer samples in time order.
pub trait SampleSource {
    /// Wait for the next sample, giving up after `timeout` if one is given
    fn next_sample(&mut self, timeout: Option<Duration>) -> SourceEvent;
}

impl SampleSource for Receiver<PointerSample> {
    fn next_sample(&mut self, timeout: Option<Duration>) -> SourceEvent {
        match timeout {
            Some(timeout) => match self.recv_timeout(timeout) {
                Ok(sample) => SourceEvent::Sample(sample),
                Err(RecvTimeoutError::Timeout) => SourceEvent::TimedOut,
                Err(RecvTimeoutError::Disconnected) => SourceEvent::Closed,
            },
            None => match self.recv() {
                Ok(sample) => SourceEvent::Sample(sample),
                Err(_) => SourceEvent::Closed,
            },
        }
    }
}

/// How a call to [`run_gesture`] ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    /// The pointer was released
    Completed,
    /// The gesture was filtered out (stylus-only mode)
    Ignored,
    /// The source closed in the middle of a stroke
    Aborted,
    /// The source closed before any gesture began
    SourceClosed,
}

/// Finishes the stroke when dropped, whatever way the gesture loop exits.
struct GestureGuard<'a> {
    machine: &'a mut StrokeInputMachine,
    controller: &'a mut DrawController,
}

impl GestureGuard<'_> {
    fn handle(&mut self, sample: &PointerSample) -> DrawResult<()> {
        self.machine.handle_sample(sample, &mut *self.controller)
    }

    fn poll_hold(&mut self, now: Instant) -> bool {
        self.machine.poll_hold(now, &mut *self.controller)
    }

    fn timeout(&self) -> Option<Duration> {
        self.machine
            .hold_deadline()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }
}

impl Drop for GestureGuard<'_> {
    fn drop(&mut self) {
        if self.machine.is_active() {
            debug!("Gesture loop exited mid-stroke, finishing it");
            self.machine.abort(&mut *self.controller);
        }
    }
}

/// Drive one gesture from `source` through `machine` into `controller`.
///
/// Waits for the first pressed sample, then races each following sample
/// against the hold deadline. The stroke is always finished exactly once,
/// including when the source closes, a controller error is returned, or a
/// panic unwinds through here.
pub fn run_gesture<S>(
    source: &mut S,
    machine: &mut StrokeInputMachine,
    controller: &mut DrawController,
) -> DrawResult<GestureOutcome>
where
    S: SampleSource + ?Sized,
{
    let first = loop {
        match source.next_sample(None) {
            SourceEvent::Sample(sample) if sample.pressed => break sample,
            SourceEvent::Sample(_) | SourceEvent::TimedOut => continue,
            SourceEvent::Closed => return Ok(GestureOutcome::SourceClosed),
        }
    };

    let mut guard = GestureGuard { machine, controller };
    guard.handle(&first)?;

    if !guard.machine.is_active() {
        // Swallow the rest of a filtered gesture
        loop {
            match source.next_sample(None) {
                SourceEvent::Sample(sample) if sample.pointer_id == first.pointer_id && !sample.pressed => {
                    return Ok(GestureOutcome::Ignored);
                }
                SourceEvent::Sample(_) | SourceEvent::TimedOut => continue,
                SourceEvent::Closed => return Ok(GestureOutcome::Ignored),
            }
        }
    }

    loop {
        match source.next_sample(guard.timeout()) {
            SourceEvent::Sample(sample) => {
                guard.handle(&sample)?;
                if !guard.machine.is_active() {
                    return Ok(GestureOutcome::Completed);
                }
            }
            SourceEvent::TimedOut => {
                guard.poll_hold(Instant::now());
            }
            SourceEvent::Closed => return Ok(GestureOutcome::Aborted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputConfig, PointerType, StrokeInputState};
    use crate::tool::ToolBox;
    use egui::pos2;
    use std::sync::mpsc;

    fn sample(pointer_type: PointerType, x: f32, pressed: bool, time: Instant) -> PointerSample {
        PointerSample::new(3, pos2(x, 0.0), pointer_type, pressed, time)
    }

    #[test]
    fn test_completed_gesture_commits_path() {
        let (tx, mut rx) = mpsc::channel();
        let t0 = Instant::now();
        tx.send(sample(PointerType::Touch, 0.0, true, t0)).unwrap();
        tx.send(sample(PointerType::Touch, 20.0, true, t0 + Duration::from_millis(10))).unwrap();
        tx.send(sample(PointerType::Touch, 20.0, false, t0 + Duration::from_millis(20))).unwrap();

        let mut controller = DrawController::configured(ToolBox::default());
        let mut machine = StrokeInputMachine::default();
        let outcome = run_gesture(&mut rx, &mut machine, &mut controller).unwrap();

        assert_eq!(outcome, GestureOutcome::Completed);
        assert_eq!(controller.history().undo_len(), 1);
        assert!(!machine.is_active());
    }

    #[test]
    fn test_closed_source_finishes_stroke() {
        let (tx, mut rx) = mpsc::channel();
        let t0 = Instant::now();
        tx.send(sample(PointerType::Touch, 0.0, true, t0)).unwrap();
        tx.send(sample(PointerType::Touch, 15.0, true, t0)).unwrap();
        drop(tx);

        let mut controller = DrawController::configured(ToolBox::default());
        let mut machine = StrokeInputMachine::default();
        let outcome = run_gesture(&mut rx, &mut machine, &mut controller).unwrap();

        assert_eq!(outcome, GestureOutcome::Aborted);
        assert_eq!(machine.state(), StrokeInputState::Idle);
        assert_eq!(controller.history().undo_len(), 1);
        assert!(!controller.is_stroke_active());
    }

    #[test]
    fn test_filtered_gesture_is_ignored() {
        let (tx, mut rx) = mpsc::channel();
        let t0 = Instant::now();
        tx.send(sample(PointerType::Mouse, 0.0, true, t0)).unwrap();
        tx.send(sample(PointerType::Mouse, 30.0, true, t0)).unwrap();
        tx.send(sample(PointerType::Mouse, 30.0, false, t0)).unwrap();

        let mut controller = DrawController::configured(ToolBox::default());
        let mut machine = StrokeInputMachine::new(InputConfig {
            stylus_only: true,
            ..InputConfig::default()
        });
        let outcome = run_gesture(&mut rx, &mut machine, &mut controller).unwrap();

        assert_eq!(outcome, GestureOutcome::Ignored);
        assert!(controller.paths().is_empty());
    }

    #[test]
    fn test_empty_source_reports_closed() {
        let (tx, mut rx) = mpsc::channel::<PointerSample>();
        drop(tx);

        let mut controller = DrawController::configured(ToolBox::default());
        let mut machine = StrokeInputMachine::default();
        let outcome = run_gesture(&mut rx, &mut machine, &mut controller).unwrap();
        assert_eq!(outcome, GestureOutcome::SourceClosed);
    }

    #[test]
    fn test_unconfigured_pen_propagates_error() {
        let (tx, mut rx) = mpsc::channel();
        tx.send(sample(PointerType::Touch, 0.0, true, Instant::now())).unwrap();

        let mut controller = DrawController::new(ToolBox::default());
        let mut machine = StrokeInputMachine::default();
        let result = run_gesture(&mut rx, &mut machine, &mut controller);
        assert!(result.is_err());
        assert!(!machine.is_active());
    }
}
