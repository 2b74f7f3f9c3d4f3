#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod command;
pub mod controller;
pub mod document;
pub mod error;
pub mod event;
pub mod geometry;
pub mod input;
pub mod path;
pub mod renderer;
pub mod settings;
pub mod tool;

pub use app::OverlayApp;
pub use command::{CommandHistory, HistoryAction, HistoryState};
pub use controller::DrawController;
pub use document::PathCollection;
pub use error::{DrawError, DrawResult, SettingsError};
pub use event::{DrawEvent, EventBus, EventHandler};
pub use input::{
    run_gesture, GestureOutcome, InputConfig, PointerSample, PointerType, StrokeInputMachine, StrokeInputState,
};
pub use path::{Path, PathId, PathRef};
pub use renderer::Renderer;
pub use settings::OverlaySettings;
pub use tool::{PenAttributes, ToolBox, ToolKind};
