use std::sync::Arc;
use std::time::Instant;

use egui::{Align, Key, KeyboardShortcut, Modifiers, Rect};
use log::{error, info};
use parking_lot::Mutex;

use crate::command::HistoryState;
use crate::controller::DrawController;
use crate::event::DrawEvent;
use crate::input::{InputConfig, PointerSample, PointerType, StrokeInputMachine};
use crate::renderer::Renderer;
use crate::settings::{OverlaySettings, ToolbarOrientation};
use crate::tool::ToolKind;

/// Pointer id used for mouse samples; touch ids come from the platform
const MOUSE_POINTER_ID: u64 = u64::MAX;

const UNDO_SHORTCUT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Z);
const REDO_SHORTCUT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND.plus(Modifiers::SHIFT), Key::Z);

/// Something the state machine should react to
#[derive(Debug, Clone, PartialEq)]
pub enum PointerInput {
    Sample(PointerSample),
    /// The pointer left the window mid-gesture
    Cancel,
}

/// Turns raw egui events into pointer samples.
///
/// egui synthesizes mouse events for the primary touch, so mouse events are
/// ignored while any touch is down.
#[derive(Debug, Default)]
pub struct PointerTranslator {
    mouse_down: bool,
    touches_down: usize,
}

impl PointerTranslator {
    pub fn translate(&mut self, event: &egui::Event, time: Instant) -> Option<PointerInput> {
        match event {
            egui::Event::Touch { id, phase, pos, .. } => {
                let pressed = match phase {
                    egui::TouchPhase::Start => {
                        self.touches_down += 1;
                        true
                    }
                    egui::TouchPhase::Move => true,
                    egui::TouchPhase::End | egui::TouchPhase::Cancel => {
                        self.touches_down = self.touches_down.saturating_sub(1);
                        false
                    }
                };
                Some(PointerInput::Sample(PointerSample::new(
                    id.0,
                    *pos,
                    PointerType::Touch,
                    pressed,
                    time,
                )))
            }
            _ if self.touches_down > 0 => None,
            egui::Event::PointerButton {
                pos,
                button: egui::PointerButton::Primary,
                pressed,
                ..
            } => {
                self.mouse_down = *pressed;
                Some(PointerInput::Sample(PointerSample::new(
                    MOUSE_POINTER_ID,
                    *pos,
                    PointerType::Mouse,
                    *pressed,
                    time,
                )))
            }
            egui::Event::PointerMoved(pos) if self.mouse_down => Some(PointerInput::Sample(PointerSample::new(
                MOUSE_POINTER_ID,
                *pos,
                PointerType::Mouse,
                true,
                time,
            ))),
            egui::Event::PointerGone if self.mouse_down => {
                self.mouse_down = false;
                Some(PointerInput::Cancel)
            }
            _ => None,
        }
    }
}

pub struct OverlayApp {
    renderer: Renderer,
    controller: DrawController,
    machine: StrokeInputMachine,
    settings: OverlaySettings,
    translator: PointerTranslator,
    /// Latest state published by the controller, drives the toolbar buttons
    history_state: Arc<Mutex<HistoryState>>,
    toolbar_rect: Option<Rect>,
    /// Pointer whose gesture started on the toolbar
    toolbar_pointer: Option<u64>,
    visible: bool,
}

impl OverlayApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings = cc.storage.map(OverlaySettings::load).unwrap_or_default();
        info!("Starting overlay with {} selected", settings.selected_tool.name());

        let controller = DrawController::configured(settings.tool_box());
        let history_state = Arc::new(Mutex::new(controller.history_state()));
        let published = Arc::clone(&history_state);
        controller.subscribe(Box::new(move |event: &DrawEvent| {
            if let DrawEvent::HistoryChanged(state) = event {
                *published.lock() = *state;
            }
        }));

        Self {
            renderer: Renderer::new(cc),
            machine: StrokeInputMachine::new(settings.input_config(InputConfig::default())),
            controller,
            visible: settings.visible_on_start,
            settings,
            translator: PointerTranslator::default(),
            history_state,
            toolbar_rect: None,
            toolbar_pointer: None,
        }
    }

    fn handle_input(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        let events = ctx.input(|i| i.events.clone());

        for event in &events {
            let Some(input) = self.translator.translate(event, now) else {
                continue;
            };
            match input {
                PointerInput::Sample(sample) => {
                    if self.toolbar_pointer == Some(sample.pointer_id) {
                        if !sample.pressed {
                            self.toolbar_pointer = None;
                        }
                        continue;
                    }
                    let on_toolbar = self.toolbar_rect.is_some_and(|rect| rect.contains(sample.position));
                    if on_toolbar && sample.pressed && !self.machine.is_active() {
                        // The whole gesture belongs to the toolbar
                        self.toolbar_pointer = Some(sample.pointer_id);
                        continue;
                    }
                    if let Err(err) = self.machine.handle_sample(&sample, &mut self.controller) {
                        error!("Dropping pointer sample: {}", err);
                    }
                }
                PointerInput::Cancel => {
                    self.toolbar_pointer = None;
                    self.machine.abort(&mut self.controller);
                }
            }
        }

        self.machine.poll_hold(now, &mut self.controller);
        if let Some(deadline) = self.machine.hold_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        // Check redo first, its chord contains the undo chord
        if ctx.input_mut(|i| i.consume_shortcut(&REDO_SHORTCUT)) {
            self.controller.redo();
        } else if ctx.input_mut(|i| i.consume_shortcut(&UNDO_SHORTCUT)) {
            self.controller.undo();
        }
    }

    fn set_visible(&mut self, visible: bool) {
        if self.visible == visible {
            return;
        }
        self.machine.abort(&mut self.controller);
        if !visible && self.settings.auto_clear_on_hide {
            self.controller.clear_all();
        }
        self.visible = visible;
    }

    fn toolbar_contents(&mut self, ui: &mut egui::Ui) {
        let selected = self.controller.selected_tool();
        for tool in ToolKind::ALL {
            if ui.selectable_label(selected == tool, tool.name()).clicked() {
                self.controller.select_tool(tool);
            }
        }

        ui.separator();

        let state = *self.history_state.lock();
        if ui.add_enabled(state.can_undo, egui::Button::new("Undo")).clicked() {
            self.controller.undo();
        }
        if ui.add_enabled(state.can_redo, egui::Button::new("Redo")).clicked() {
            self.controller.redo();
        }
        if ui.add_enabled(state.can_clear, egui::Button::new("Clear")).clicked() {
            self.controller.clear_all();
        }

        ui.separator();

        let config = self.machine.config_mut();
        ui.checkbox(&mut config.stylus_only, "Stylus only");
        ui.checkbox(&mut config.straight_line_snap, "Snap lines");
        ui.checkbox(&mut self.settings.auto_clear_on_hide, "Clear on hide");

        let flip = match self.settings.toolbar.orientation {
            ToolbarOrientation::Horizontal => "⬍",
            ToolbarOrientation::Vertical => "⬌",
        };
        if ui.button(flip).clicked() {
            self.settings.toolbar.orientation = match self.settings.toolbar.orientation {
                ToolbarOrientation::Horizontal => ToolbarOrientation::Vertical,
                ToolbarOrientation::Vertical => ToolbarOrientation::Horizontal,
            };
        }
        if ui.button("Hide").clicked() {
            self.set_visible(false);
        }
    }

    fn show_toolbar(&mut self, ctx: &egui::Context) {
        let layout = match self.settings.toolbar.orientation {
            ToolbarOrientation::Horizontal => egui::Layout::left_to_right(Align::Center),
            ToolbarOrientation::Vertical => egui::Layout::top_down(Align::Min),
        };

        let response = egui::Window::new("Ink")
            .title_bar(false)
            .resizable(false)
            .default_pos(self.settings.toolbar.position)
            .show(ctx, |ui| {
                if self.visible {
                    ui.with_layout(layout, |ui| self.toolbar_contents(ui));
                } else if ui.button("Show ink").clicked() {
                    self.set_visible(true);
                }
            });

        self.toolbar_rect = response.map(|inner| inner.response.rect);
        if let Some(rect) = self.toolbar_rect {
            self.settings.toolbar.position = rect.min;
        }
    }
}

impl eframe::App for OverlayApp {
    /// Called by the framework to save settings before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.settings.update_tools(self.controller.tools());
        self.settings.stylus_only = self.machine.config().stylus_only;
        self.settings.straight_line_snap = self.machine.config().straight_line_snap;
        self.settings.visible_on_start = self.visible;
        if let Err(err) = self.settings.save(storage) {
            error!("Could not save settings: {}", err);
        }
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        egui::Rgba::TRANSPARENT.to_array()
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.visible {
            self.handle_shortcuts(ctx);
            self.handle_input(ctx);
        }

        self.show_toolbar(ctx);

        let hover = ctx.input(|i| i.pointer.hover_pos());
        let over_toolbar = hover.zip(self.toolbar_rect).is_some_and(|(pos, rect)| rect.contains(pos));
        self.renderer.set_toolbar_active(over_toolbar && !self.machine.is_active());

        egui::CentralPanel::default().frame(egui::Frame::none()).show(ctx, |ui| {
            if self.visible {
                let rect = ui.max_rect();
                self.renderer.render(ui.painter(), rect, self.controller.paths());
            }
        });
    }
}
