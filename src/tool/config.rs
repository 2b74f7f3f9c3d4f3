use std::collections::HashMap;

use egui::Color32;
use serde::{Deserialize, Serialize};

use super::{PenAttributes, ToolKind};

/// The selected tool plus the per-tool pen presets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolBox {
    selected: ToolKind,
    presets: HashMap<ToolKind, PenAttributes>,
}

impl Default for ToolBox {
    fn default() -> Self {
        let presets = [
            PenAttributes::new(ToolKind::Pen),
            PenAttributes::new(ToolKind::Highlighter)
                .with_color(Color32::YELLOW)
                .with_width(16.0)
                .with_opacity(0.4),
            PenAttributes::new(ToolKind::Eraser).with_width(24.0),
        ];
        Self::new(ToolKind::Pen, presets)
    }
}

impl ToolBox {
    pub fn new(selected: ToolKind, presets: impl IntoIterator<Item = PenAttributes>) -> Self {
        Self {
            selected,
            presets: presets.into_iter().map(|attrs| (attrs.tool, attrs)).collect(),
        }
    }

    /// A tool box with no presets at all; every lookup falls back to defaults
    pub fn empty(selected: ToolKind) -> Self {
        Self {
            selected,
            presets: HashMap::new(),
        }
    }

    pub fn selected(&self) -> ToolKind {
        self.selected
    }

    /// Change the selected tool. Returns the previous selection.
    pub fn select(&mut self, tool: ToolKind) -> ToolKind {
        std::mem::replace(&mut self.selected, tool)
    }

    /// Look up the attributes for `tool`, synthesizing defaults if no preset exists.
    ///
    /// Never changes the selection.
    pub fn resolve(&self, tool: ToolKind) -> PenAttributes {
        self.presets
            .get(&tool)
            .copied()
            .unwrap_or_else(|| PenAttributes::new(tool))
    }

    /// Attributes of the currently selected tool
    pub fn active_attributes(&self) -> PenAttributes {
        self.resolve(self.selected)
    }

    pub fn presets(&self) -> &HashMap<ToolKind, PenAttributes> {
        &self.presets
    }
}
