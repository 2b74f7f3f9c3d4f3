//! The path-history engine.
//!
//! [`DrawController`] owns the visible path collection and the undo/redo
//! history. All mutation goes through `&mut self`, so a single owner drives it;
//! the derived [`HistoryState`] is republished on the [`EventBus`] after every
//! mutating call.

use egui::Pos2;
use log::{debug, info, trace};

use crate::command::{CommandHistory, HistoryAction, HistoryState};
use crate::document::PathCollection;
use crate::error::{DrawError, DrawResult};
use crate::event::{DrawEvent, EventBus, EventHandler};
use crate::path::{Path, PathId, PathRef};
use crate::tool::{PenAttributes, ToolBox, ToolKind};

#[derive(Debug)]
pub struct DrawController {
    paths: PathCollection,
    history: CommandHistory,
    /// Attributes for the next created path; unset until configured
    pen: Option<PenAttributes>,
    tools: ToolBox,
    /// The path currently being drawn, always the last in `paths`
    active_path: Option<PathId>,
    event_bus: EventBus,
}

impl Default for DrawController {
    fn default() -> Self {
        Self::new(ToolBox::default())
    }
}

impl DrawController {
    /// Creates a controller with no pen attributes configured yet
    pub fn new(tools: ToolBox) -> Self {
        Self::with_history(tools, CommandHistory::new())
    }

    pub fn with_history(tools: ToolBox, history: CommandHistory) -> Self {
        Self {
            paths: PathCollection::new(),
            history,
            pen: None,
            tools,
            active_path: None,
            event_bus: EventBus::new(),
        }
    }

    /// Creates a controller whose pen is already configured for the selected tool
    pub fn configured(tools: ToolBox) -> Self {
        let mut controller = Self::new(tools);
        let attrs = controller.tools.active_attributes();
        controller.set_pen_attributes(attrs);
        controller
    }

    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.event_bus.subscribe(handler);
    }

    pub fn paths(&self) -> &[PathRef] {
        self.paths.paths()
    }

    /// Cheap copy of the current collection for a render consumer
    pub fn snapshot(&self) -> Vec<PathRef> {
        self.paths.paths().to_vec()
    }

    pub fn pen_attributes(&self) -> Option<&PenAttributes> {
        self.pen.as_ref()
    }

    pub fn tools(&self) -> &ToolBox {
        &self.tools
    }

    pub fn selected_tool(&self) -> ToolKind {
        self.tools.selected()
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn is_stroke_active(&self) -> bool {
        self.active_path().is_some()
    }

    pub fn history_state(&self) -> HistoryState {
        HistoryState {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
            can_clear: !self.paths.is_empty(),
        }
    }

    fn publish_state(&self) {
        self.event_bus.emit(DrawEvent::HistoryChanged(self.history_state()));
    }

    fn is_erasing(&self) -> bool {
        self.pen.is_some_and(|pen| pen.tool.is_eraser())
    }

    /// The in-progress path, if it is still the most recent one
    fn active_path(&self) -> Option<&PathRef> {
        let id = self.active_path?;
        self.paths.last().filter(|path| path.id() == id)
    }

    /// Replace the attributes used for subsequently created paths.
    pub fn set_pen_attributes(&mut self, attrs: PenAttributes) {
        trace!("Pen attributes set to {:?}", attrs);
        self.pen = Some(attrs);
    }

    /// Select `tool` and apply its resolved attributes to the pen.
    pub fn select_tool(&mut self, tool: ToolKind) {
        let old = self.tools.select(tool);
        let attrs = self.tools.resolve(tool);
        self.set_pen_attributes(attrs);
        if old != tool {
            debug!("Tool changed from {} to {}", old.name(), tool.name());
            self.event_bus.emit(DrawEvent::ToolChanged { old, new: tool });
        }
    }

    /// Begin a new path at `point`, or erase there if the eraser is active.
    pub fn create_path(&mut self, point: Pos2) -> DrawResult<()> {
        let pen = self.pen.ok_or(DrawError::PenNotConfigured)?;
        if pen.tool.is_eraser() {
            self.erase_at(point);
            return Ok(());
        }

        if self.active_path.is_some() {
            self.finish_path();
        }

        let path = Path::new_ref(pen, point);
        let id = path.id();
        self.paths.push(path);
        self.active_path = Some(id);
        trace!("Started path {}", id);
        self.event_bus.emit(DrawEvent::PathStarted { id });
        self.publish_state();
        Ok(())
    }

    /// Extend the in-progress path, or erase at `point` if the eraser is active.
    pub fn append_point(&mut self, point: Pos2) {
        if self.is_erasing() {
            self.erase_at(point);
            return;
        }
        match self.active_path() {
            Some(path) => path.push_point(point),
            None => trace!("append_point without an active path"),
        }
    }

    /// Replace the in-progress path with the straight segment `start`..`end`.
    pub fn straighten_last_path(&mut self, start: Pos2, end: Pos2) {
        if let Some(path) = self.active_path() {
            path.set_points(vec![start, end]);
            let id = path.id();
            debug!("Straightened path {}", id);
            self.event_bus.emit(DrawEvent::PathStraightened { id });
        }
    }

    /// Move the end of a straightened in-progress path.
    pub fn set_last_path_endpoint(&mut self, end: Pos2) {
        if let Some(path) = self.active_path() {
            path.set_endpoint(end);
        }
    }

    /// Commit the in-progress path to history, or discard it if nothing was drawn.
    pub fn finish_path(&mut self) {
        if self.is_erasing() {
            return;
        }
        let Some(path) = self.active_path().cloned() else {
            self.active_path = None;
            trace!("finish_path without an active path");
            return;
        };
        self.active_path = None;

        if !path.has_segment() {
            self.paths.remove(&path);
            debug!("Discarded path {} with no drawn segment", path.id());
            self.event_bus.emit(DrawEvent::PathDiscarded { id: path.id() });
            self.publish_state();
            return;
        }

        let id = path.id();
        self.history.record(HistoryAction::AddPath(path));
        info!("Committed path {}", id);
        self.event_bus.emit(DrawEvent::PathCommitted { id });
        self.publish_state();
    }

    /// Erase the most recently added path touched by the eraser at `point`.
    ///
    /// At most one path is removed per call.
    fn erase_at(&mut self, point: Pos2) {
        let Some(eraser) = self.pen else {
            return;
        };
        let radius = eraser.half_width();

        let hit = self
            .paths
            .iter()
            .rev()
            .find(|path| path.hit_test(point, radius))
            .cloned();

        let Some(path) = hit else {
            trace!("Eraser at {:?} hit nothing", point);
            return;
        };

        if self.active_path == Some(path.id()) {
            self.active_path = None;
        }
        self.paths.remove(&path);
        let id = path.id();
        self.history.record(HistoryAction::ErasePath(path));
        info!("Erased path {}", id);
        self.event_bus.emit(DrawEvent::PathErased { id });
        self.publish_state();
    }

    /// Remove every visible path as one undoable action.
    pub fn clear_all(&mut self) {
        if self.paths.is_empty() {
            return;
        }
        self.active_path = None;
        let cleared = self.paths.take_all();
        let count = cleared.len();
        self.history.record(HistoryAction::ClearPaths(cleared));
        info!("Cleared {} paths", count);
        self.event_bus.emit(DrawEvent::PathsCleared { count });
        self.publish_state();
    }

    /// Apply `change` with the in-progress path lifted out, then put it back on top.
    ///
    /// Paths reinstated by undo or redo land below the stroke being drawn, so
    /// it remains the last path and is still committed on finish.
    fn apply_below_active(&mut self, change: impl FnOnce(&mut PathCollection)) {
        let active = if self.active_path().is_some() {
            self.paths.remove_last()
        } else {
            None
        };
        change(&mut self.paths);
        if let Some(path) = active {
            self.paths.push(path);
        }
    }

    pub fn undo(&mut self) {
        let Some(action) = self.history.pop_undo() else {
            trace!("Nothing to undo");
            return;
        };
        self.apply_below_active(|paths| action.undo(paths));
        let name = action.name();
        self.history.push_redo(action);
        info!("Undid {}", name);
        self.event_bus.emit(DrawEvent::Undone { action: name });
        self.publish_state();
    }

    pub fn redo(&mut self) {
        let Some(action) = self.history.pop_redo() else {
            trace!("Nothing to redo");
            return;
        };
        self.apply_below_active(|paths| action.redo(paths));
        let name = action.name();
        self.history.push_redone(action);
        info!("Redid {}", name);
        self.event_bus.emit(DrawEvent::Redone { action: name });
        self.publish_state();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_create_before_configuration_fails() {
        let mut controller = DrawController::new(ToolBox::default());
        assert_eq!(controller.create_path(pos2(0.0, 0.0)), Err(DrawError::PenNotConfigured));
        assert!(controller.paths().is_empty());
    }

    #[test]
    fn test_finish_twice_commits_once() {
        let mut controller = DrawController::configured(ToolBox::default());
        controller.create_path(pos2(0.0, 0.0)).unwrap();
        controller.append_point(pos2(10.0, 0.0));
        controller.finish_path();
        controller.finish_path();
        assert_eq!(controller.history().undo_len(), 1);
    }

    #[test]
    fn test_committed_path_is_not_extended() {
        let mut controller = DrawController::configured(ToolBox::default());
        controller.create_path(pos2(0.0, 0.0)).unwrap();
        controller.append_point(pos2(10.0, 0.0));
        controller.finish_path();

        controller.append_point(pos2(20.0, 0.0));
        controller.set_last_path_endpoint(pos2(30.0, 0.0));
        assert_eq!(controller.paths()[0].points(), vec![pos2(0.0, 0.0), pos2(10.0, 0.0)]);
    }

    #[test]
    fn test_creating_a_path_finishes_the_open_one() {
        let mut controller = DrawController::configured(ToolBox::default());
        controller.create_path(pos2(0.0, 0.0)).unwrap();
        controller.append_point(pos2(10.0, 0.0));
        controller.create_path(pos2(50.0, 50.0)).unwrap();

        assert_eq!(controller.history().undo_len(), 1);
        assert_eq!(controller.paths().len(), 2);
        assert!(controller.is_stroke_active());
    }

    #[test]
    fn test_select_tool_applies_preset() {
        let mut controller = DrawController::new(ToolBox::default());
        controller.select_tool(ToolKind::Highlighter);
        let pen = controller.pen_attributes().unwrap();
        assert_eq!(pen.tool, ToolKind::Highlighter);
        assert_eq!(*pen, controller.tools().resolve(ToolKind::Highlighter));
    }
}
