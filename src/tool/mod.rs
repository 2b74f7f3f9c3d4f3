mod config;

pub use config::ToolBox;

use egui::Color32;
use serde::{Deserialize, Serialize};

/// Smallest width a pen may have, in points
pub const MIN_PEN_WIDTH: f32 = 0.5;

/// Tools that can be selected on the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Pen,
    Highlighter,
    Eraser,
}

impl ToolKind {
    pub const ALL: [ToolKind; 3] = [ToolKind::Pen, ToolKind::Highlighter, ToolKind::Eraser];

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Pen => "Pen",
            ToolKind::Highlighter => "Highlighter",
            ToolKind::Eraser => "Eraser",
        }
    }

    pub fn is_eraser(&self) -> bool {
        matches!(self, ToolKind::Eraser)
    }
}

/// Pen attributes captured by a path when it is created.
///
/// Changing a tool's attributes later never affects paths that already exist.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenAttributes {
    /// The tool these attributes belong to
    pub tool: ToolKind,
    pub color: Color32,
    /// Stroke width in points, always positive
    pub width: f32,
    /// Opacity in `[0, 1]`
    pub opacity: f32,
}

impl PenAttributes {
    /// Default attributes tagged with `tool`
    pub fn new(tool: ToolKind) -> Self {
        Self {
            tool,
            color: Color32::RED,
            width: 4.0,
            opacity: 1.0,
        }
    }

    pub fn with_color(mut self, color: Color32) -> Self {
        self.color = color;
        self
    }

    /// Set the width, clamped to [`MIN_PEN_WIDTH`]
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = if width.is_finite() { width.max(MIN_PEN_WIDTH) } else { MIN_PEN_WIDTH };
        self
    }

    /// Set the opacity, clamped into `[0, 1]`
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = if opacity.is_finite() { opacity.clamp(0.0, 1.0) } else { 1.0 };
        self
    }

    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    /// Color with the opacity applied, ready for painting
    pub fn paint_color(&self) -> Color32 {
        self.color.gamma_multiply(self.opacity)
    }
}

impl Default for PenAttributes {
    fn default() -> Self {
        Self::new(ToolKind::default())
    }
}
