// src/renderer.rs
use eframe::egui::{self, Color32, Rect};
use log::trace;

use crate::path::PathRef;

/// Tint laid over the overlay while the toolbar is being used
const TOOLBAR_ACTIVE_TINT: Color32 = Color32::from_black_alpha(24);

#[derive(Debug)]
pub struct Renderer {
    toolbar_active: bool,
    ctx: egui::Context,
}

impl Renderer {
    /// Creates a new renderer bound to the app's egui context
    ///
    /// Args:
    ///     cc (CreationContext): The eframe creation context
    ///
    /// Returns:
    ///     Self: Initialized renderer instance
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        Self::with_context(cc.egui_ctx.clone())
    }

    pub fn with_context(ctx: egui::Context) -> Self {
        Self {
            toolbar_active: false,
            ctx,
        }
    }

    pub fn toolbar_active(&self) -> bool {
        self.toolbar_active
    }

    pub fn set_toolbar_active(&mut self, active: bool) {
        if self.toolbar_active != active {
            self.toolbar_active = active;
            self.ctx.request_repaint();
        }
    }

    /// Paints `paths` in z-order, bottom first.
    ///
    /// Each path supplies its cached shape; only paths whose points changed
    /// since the last frame rebuild it. Paths entirely outside `rect` are
    /// skipped. Returns how many paths were painted.
    ///
    /// Args:
    ///     painter (egui::Painter): The painter to draw with
    ///     rect (egui::Rect): The visible overlay area
    ///     paths (&[PathRef]): The collection to paint
    pub fn render(&mut self, painter: &egui::Painter, rect: Rect, paths: &[PathRef]) -> usize {
        if self.toolbar_active {
            painter.rect_filled(rect, 0.0, TOOLBAR_ACTIVE_TINT);
        }

        let mut painted = 0;
        for path in paths {
            if !rect.intersects(path.bounds()) {
                continue;
            }
            if path.needs_cache_update() {
                trace!("Rebuilding shape for path {}", path.id());
            }
            painter.add(path.shape());
            painted += 1;
        }
        painted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Path;
    use crate::tool::{PenAttributes, ToolKind};
    use egui::pos2;
    use std::sync::Arc;

    fn painter(ctx: &egui::Context, rect: Rect) -> egui::Painter {
        egui::Painter::new(ctx.clone(), egui::LayerId::background(), rect)
    }

    #[test]
    fn test_renderer_creation() {
        let renderer = Renderer::with_context(egui::Context::default());
        assert!(!renderer.toolbar_active());
    }

    #[test]
    fn test_render_refreshes_stale_cache() {
        let ctx = egui::Context::default();
        let rect = Rect::from_min_size(pos2(0.0, 0.0), egui::vec2(100.0, 100.0));
        let mut renderer = Renderer::with_context(ctx.clone());

        let path = Arc::new(Path::from_points(
            PenAttributes::new(ToolKind::Pen),
            vec![pos2(10.0, 10.0), pos2(50.0, 50.0)],
        ));
        assert!(path.needs_cache_update());

        let painted = renderer.render(&painter(&ctx, rect), rect, &[path.clone()]);
        assert_eq!(painted, 1);
        assert!(!path.needs_cache_update());
    }

    #[test]
    fn test_render_skips_offscreen_paths() {
        let ctx = egui::Context::default();
        let rect = Rect::from_min_size(pos2(0.0, 0.0), egui::vec2(100.0, 100.0));
        let mut renderer = Renderer::with_context(ctx.clone());
        renderer.set_toolbar_active(true);

        let offscreen = Arc::new(Path::from_points(
            PenAttributes::new(ToolKind::Pen),
            vec![pos2(500.0, 500.0), pos2(600.0, 600.0)],
        ));
        assert_eq!(renderer.render(&painter(&ctx, rect), rect, &[offscreen]), 0);
    }
}
