//! The stroke-input state machine.
//!
//! Converts the pointer samples of one gesture into calls on the
//! [`DrawController`], and implements hold-to-straighten.
//!
//! ```text
//!  ┌──────┐ press  ┌──────────────┐  hold   ┌─────────┐
//!  │ Idle ├────────► StrokeActive ├─────────► Snapped │
//!  └──▲───┘        └──────┬───────┘         └────┬────┘
//!     │    release/abort  │                      │
//!     └───────────────────┴──────────────────────┘
//! ```
//!
//! Leaving a stroke by any route calls `finish_path` exactly once and puts
//! back the tool that a stylus chord may have overridden.

use std::time::Instant;

use log::debug;

use super::{HoldDetector, InputConfig, PointerSample, PointerType, ToolOverride};
use crate::controller::DrawController;
use crate::error::DrawResult;
use crate::tool::{PenAttributes, ToolKind};

/// Observable phase of the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeInputState {
    Idle,
    StrokeActive,
    Snapped,
}

/// Tool and pen to put back once an overridden stroke ends
#[derive(Debug, Clone, Copy)]
struct ToolRestore {
    tool: ToolKind,
    pen: Option<PenAttributes>,
}

#[derive(Debug, Clone)]
struct ActiveStroke {
    pointer_id: u64,
    start: egui::Pos2,
    hold: HoldDetector,
    restore: Option<ToolRestore>,
    snap_enabled: bool,
}

#[derive(Debug, Clone)]
enum Phase {
    Idle,
    StrokeActive(ActiveStroke),
    Snapped(ActiveStroke),
}

#[derive(Debug, Clone)]
pub struct StrokeInputMachine {
    config: InputConfig,
    phase: Phase,
}

impl Default for StrokeInputMachine {
    fn default() -> Self {
        Self::new(InputConfig::default())
    }
}

impl StrokeInputMachine {
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
        }
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    /// Changes apply from the next gesture on
    pub fn config_mut(&mut self) -> &mut InputConfig {
        &mut self.config
    }

    pub fn state(&self) -> StrokeInputState {
        match self.phase {
            Phase::Idle => StrokeInputState::Idle,
            Phase::StrokeActive(_) => StrokeInputState::StrokeActive,
            Phase::Snapped(_) => StrokeInputState::Snapped,
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    fn stroke(&self) -> Option<&ActiveStroke> {
        match &self.phase {
            Phase::Idle => None,
            Phase::StrokeActive(stroke) | Phase::Snapped(stroke) => Some(stroke),
        }
    }

    pub fn active_pointer(&self) -> Option<u64> {
        self.stroke().map(|stroke| stroke.pointer_id)
    }

    /// When the pending hold fires, if a snappable stroke is in progress
    pub fn hold_deadline(&self) -> Option<Instant> {
        match &self.phase {
            Phase::StrokeActive(stroke) if stroke.snap_enabled => Some(stroke.hold.deadline()),
            _ => None,
        }
    }

    /// Feed one pointer sample.
    pub fn handle_sample(&mut self, sample: &PointerSample, controller: &mut DrawController) -> DrawResult<()> {
        match self.active_pointer() {
            None => {
                if sample.pressed {
                    self.begin_stroke(sample, controller)?;
                }
            }
            Some(pointer_id) if pointer_id == sample.pointer_id => {
                if sample.pressed {
                    self.handle_motion(sample, controller);
                } else {
                    self.end_stroke(controller);
                }
            }
            Some(pointer_id) => {
                // Only one stroke at a time: a new press takes over
                if sample.pressed {
                    debug!("Pointer {} pressed while {} was drawing", sample.pointer_id, pointer_id);
                    self.end_stroke(controller);
                    self.begin_stroke(sample, controller)?;
                }
            }
        }
        Ok(())
    }

    /// Fire the hold if its deadline has passed by `now`. Returns true if the stroke snapped.
    pub fn poll_hold(&mut self, now: Instant, controller: &mut DrawController) -> bool {
        if self.hold_deadline().is_some_and(|deadline| now >= deadline) {
            self.snap(controller);
            true
        } else {
            false
        }
    }

    /// End the current stroke early, e.g. on cancellation or an external reset.
    pub fn abort(&mut self, controller: &mut DrawController) {
        if self.is_active() {
            debug!("Stroke aborted");
            self.end_stroke(controller);
        }
    }

    fn begin_stroke(&mut self, sample: &PointerSample, controller: &mut DrawController) -> DrawResult<()> {
        if self.config.stylus_only && sample.pointer_type != PointerType::Stylus {
            debug!("Ignoring {:?} gesture in stylus-only mode", sample.pointer_type);
            return Ok(());
        }

        let selected = controller.selected_tool();
        let tool = ToolOverride::from_sample(sample).resolve(selected);
        let restore = (tool != selected).then(|| ToolRestore {
            tool: selected,
            pen: controller.pen_attributes().copied(),
        });
        if restore.is_some() {
            debug!("Stylus chord overrides {} with {}", selected.name(), tool.name());
            controller.select_tool(tool);
        }

        if let Err(err) = controller.create_path(sample.position) {
            if let Some(restore) = restore {
                Self::restore_tool(restore, controller);
            }
            return Err(err);
        }

        debug!("Stroke started with {} at {:?}", tool.name(), sample.position);
        self.phase = Phase::StrokeActive(ActiveStroke {
            pointer_id: sample.pointer_id,
            start: sample.position,
            hold: HoldDetector::new(
                self.config.jitter_threshold,
                self.config.hold_delay,
                sample.position,
                sample.time,
            ),
            restore,
            // A straight eraser line means nothing
            snap_enabled: self.config.straight_line_snap && !tool.is_eraser(),
        });
        Ok(())
    }

    fn handle_motion(&mut self, sample: &PointerSample, controller: &mut DrawController) {
        // The hold may have elapsed while no sample arrived
        if self.hold_deadline().is_some_and(|deadline| sample.time >= deadline) {
            self.snap(controller);
        }

        match &mut self.phase {
            Phase::StrokeActive(stroke) => {
                if stroke.hold.track(sample.position, sample.time) {
                    controller.append_point(sample.position);
                }
            }
            Phase::Snapped(stroke) => {
                if stroke.hold.track(sample.position, sample.time) {
                    controller.set_last_path_endpoint(sample.position);
                }
            }
            Phase::Idle => {}
        }
    }

    fn snap(&mut self, controller: &mut DrawController) {
        self.phase = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::StrokeActive(stroke) => {
                let end = stroke.hold.last_position();
                debug!("Hold detected, straightening {:?} -> {:?}", stroke.start, end);
                controller.straighten_last_path(stroke.start, end);
                Phase::Snapped(stroke)
            }
            other => other,
        };
    }

    fn end_stroke(&mut self, controller: &mut DrawController) {
        let stroke = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::StrokeActive(stroke) | Phase::Snapped(stroke) => stroke,
            Phase::Idle => return,
        };

        controller.finish_path();
        if let Some(restore) = stroke.restore {
            Self::restore_tool(restore, controller);
        }
        debug!("Stroke ended for pointer {}", stroke.pointer_id);
    }

    fn restore_tool(restore: ToolRestore, controller: &mut DrawController) {
        controller.select_tool(restore.tool);
        if let Some(pen) = restore.pen {
            controller.set_pen_attributes(pen);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::ToolBox;
    use egui::pos2;
    use std::time::Duration;

    fn touch(pos: egui::Pos2, pressed: bool, time: Instant) -> PointerSample {
        PointerSample::new(7, pos, PointerType::Touch, pressed, time)
    }

    #[test]
    fn test_press_move_release() {
        let mut controller = DrawController::configured(ToolBox::default());
        let mut machine = StrokeInputMachine::default();
        let t0 = Instant::now();

        machine.handle_sample(&touch(pos2(0.0, 0.0), true, t0), &mut controller).unwrap();
        assert_eq!(machine.state(), StrokeInputState::StrokeActive);

        machine
            .handle_sample(&touch(pos2(10.0, 0.0), true, t0 + Duration::from_millis(10)), &mut controller)
            .unwrap();
        machine
            .handle_sample(&touch(pos2(10.0, 0.0), false, t0 + Duration::from_millis(20)), &mut controller)
            .unwrap();

        assert_eq!(machine.state(), StrokeInputState::Idle);
        assert_eq!(controller.paths().len(), 1);
        assert_eq!(controller.paths()[0].points(), vec![pos2(0.0, 0.0), pos2(10.0, 0.0)]);
    }

    #[test]
    fn test_hover_samples_are_ignored() {
        let mut controller = DrawController::configured(ToolBox::default());
        let mut machine = StrokeInputMachine::default();

        machine.handle_sample(&touch(pos2(0.0, 0.0), false, Instant::now()), &mut controller).unwrap();
        assert_eq!(machine.state(), StrokeInputState::Idle);
        assert!(controller.paths().is_empty());
    }

    #[test]
    fn test_hold_deadline_only_while_snappable() {
        let mut controller = DrawController::configured(ToolBox::default());
        let mut machine = StrokeInputMachine::new(InputConfig {
            straight_line_snap: false,
            ..InputConfig::default()
        });
        let t0 = Instant::now();

        machine.handle_sample(&touch(pos2(0.0, 0.0), true, t0), &mut controller).unwrap();
        assert_eq!(machine.hold_deadline(), None);
        assert!(!machine.poll_hold(t0 + Duration::from_secs(5), &mut controller));
    }

    #[test]
    fn test_abort_is_idempotent() {
        let mut controller = DrawController::configured(ToolBox::default());
        let mut machine = StrokeInputMachine::default();
        let t0 = Instant::now();

        machine.handle_sample(&touch(pos2(0.0, 0.0), true, t0), &mut controller).unwrap();
        machine.handle_sample(&touch(pos2(9.0, 9.0), true, t0), &mut controller).unwrap();
        machine.abort(&mut controller);
        machine.abort(&mut controller);

        assert_eq!(machine.state(), StrokeInputState::Idle);
        assert_eq!(controller.history().undo_len(), 1);
    }
}
