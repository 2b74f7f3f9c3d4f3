use std::time::{Duration, Instant};

use egui::Pos2;
use serde::{Deserialize, Serialize};

use crate::tool::ToolKind;

mod gestures;
mod source;
mod state;

pub use gestures::HoldDetector;
pub use source::{run_gesture, GestureOutcome, SampleSource, SourceEvent};
pub use state::{StrokeInputMachine, StrokeInputState};

/// Motion below this many points does not reset the hold timer
pub const DEFAULT_JITTER_THRESHOLD: f32 = 2.0;
/// How long the pointer must rest before a stroke snaps straight
pub const DEFAULT_HOLD_DELAY: Duration = Duration::from_millis(500);

/// Kind of device that produced a pointer sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerType {
    Touch,
    Stylus,
    Mouse,
    Unknown,
}

/// Buttons held on the pointer when the sample was taken
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonState {
    pub primary: bool,
    pub secondary: bool,
}

impl ButtonState {
    pub const NONE: Self = Self {
        primary: false,
        secondary: false,
    };
    pub const PRIMARY: Self = Self {
        primary: true,
        secondary: false,
    };
    pub const SECONDARY: Self = Self {
        primary: false,
        secondary: true,
    };
    pub const BOTH: Self = Self {
        primary: true,
        secondary: true,
    };
}

/// One sample from the pointer-event source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub pointer_id: u64,
    pub position: Pos2,
    pub pointer_type: PointerType,
    pub buttons: ButtonState,
    /// False once the pointer has been released or lifted
    pub pressed: bool,
    pub time: Instant,
}

impl PointerSample {
    pub fn new(pointer_id: u64, position: Pos2, pointer_type: PointerType, pressed: bool, time: Instant) -> Self {
        Self {
            pointer_id,
            position,
            pointer_type,
            buttons: ButtonState::NONE,
            pressed,
            time,
        }
    }

    pub fn with_buttons(mut self, buttons: ButtonState) -> Self {
        self.buttons = buttons;
        self
    }
}

/// Temporary tool override requested by the buttons held at press time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolOverride {
    None,
    PrimaryButton,
    SecondaryButton,
    Both,
}

impl ToolOverride {
    /// Only stylus button chords override the tool
    pub fn from_sample(sample: &PointerSample) -> Self {
        if sample.pointer_type != PointerType::Stylus {
            return ToolOverride::None;
        }
        match (sample.buttons.primary, sample.buttons.secondary) {
            (false, false) => ToolOverride::None,
            (true, false) => ToolOverride::PrimaryButton,
            (false, true) => ToolOverride::SecondaryButton,
            (true, true) => ToolOverride::Both,
        }
    }

    /// The tool to use for the stroke, given the currently selected one
    pub fn resolve(&self, selected: ToolKind) -> ToolKind {
        match self {
            ToolOverride::None => selected,
            ToolOverride::PrimaryButton | ToolOverride::SecondaryButton | ToolOverride::Both => ToolKind::Eraser,
        }
    }
}

/// Configuration for stroke input
#[derive(Debug, Clone, PartialEq)]
pub struct InputConfig {
    /// Minimum displacement between samples that counts as motion (points)
    pub jitter_threshold: f32,
    /// Rest time before a stroke snaps to a straight line
    pub hold_delay: Duration,
    /// Ignore gestures that do not come from a stylus
    pub stylus_only: bool,
    /// Enable hold-to-straighten
    pub straight_line_snap: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            jitter_threshold: DEFAULT_JITTER_THRESHOLD,
            hold_delay: DEFAULT_HOLD_DELAY,
            stylus_only: false,
            straight_line_snap: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn stylus(buttons: ButtonState) -> PointerSample {
        PointerSample::new(1, pos2(0.0, 0.0), PointerType::Stylus, true, Instant::now()).with_buttons(buttons)
    }

    #[test]
    fn test_stylus_chords_resolve_to_eraser() {
        assert_eq!(ToolOverride::from_sample(&stylus(ButtonState::PRIMARY)), ToolOverride::PrimaryButton);
        assert_eq!(ToolOverride::from_sample(&stylus(ButtonState::SECONDARY)), ToolOverride::SecondaryButton);
        assert_eq!(ToolOverride::from_sample(&stylus(ButtonState::BOTH)), ToolOverride::Both);

        for chord in [ToolOverride::PrimaryButton, ToolOverride::SecondaryButton, ToolOverride::Both] {
            assert_eq!(chord.resolve(ToolKind::Pen), ToolKind::Eraser);
        }
    }

    #[test]
    fn test_no_chord_keeps_selection() {
        assert_eq!(ToolOverride::from_sample(&stylus(ButtonState::NONE)), ToolOverride::None);
        assert_eq!(ToolOverride::None.resolve(ToolKind::Highlighter), ToolKind::Highlighter);
    }

    #[test]
    fn test_non_stylus_buttons_are_ignored() {
        let mouse = PointerSample::new(0, pos2(0.0, 0.0), PointerType::Mouse, true, Instant::now())
            .with_buttons(ButtonState::SECONDARY);
        assert_eq!(ToolOverride::from_sample(&mouse), ToolOverride::None);
    }
}
