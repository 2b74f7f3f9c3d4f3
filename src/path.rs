use std::sync::Arc;

use egui::{Pos2, Rect, Shape, Stroke as EguiStroke};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::hit_testing;
use crate::tool::PenAttributes;

/// Opaque unique identifier of a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathId(Uuid);

impl PathId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PathId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PathId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shared handle to a path. History actions hold these so undo and redo
/// reinstate the same instance rather than a copy.
pub type PathRef = Arc<Path>;

/// Points plus the cached renderable shape built from them.
struct PathGeometry {
    points: Vec<Pos2>,
    cached_shape: Option<Shape>,
    cache_needs_update: bool,
    cache_version: u64,
}

impl PathGeometry {
    fn invalidate(&mut self) {
        self.cache_needs_update = true;
        self.cache_version += 1;
    }
}

/// A single stroke on the overlay.
pub struct Path {
    id: PathId,
    attributes: PenAttributes,
    geometry: Mutex<PathGeometry>,
}

impl std::fmt::Debug for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let geometry = self.geometry.lock();
        f.debug_struct("Path")
            .field("id", &self.id)
            .field("attributes", &self.attributes)
            .field("points", &geometry.points)
            .field("cache_needs_update", &geometry.cache_needs_update)
            .field("cache_version", &geometry.cache_version)
            .finish()
    }
}

impl Path {
    /// Create a path starting at `start`
    pub fn new(attributes: PenAttributes, start: Pos2) -> Self {
        Self::from_points(attributes, vec![start])
    }

    pub fn from_points(attributes: PenAttributes, points: Vec<Pos2>) -> Self {
        Self {
            id: PathId::new(),
            attributes,
            geometry: Mutex::new(PathGeometry {
                points,
                cached_shape: None,
                cache_needs_update: true,
                cache_version: 0,
            }),
        }
    }

    pub fn new_ref(attributes: PenAttributes, start: Pos2) -> PathRef {
        Arc::new(Self::new(attributes, start))
    }

    pub fn id(&self) -> PathId {
        self.id
    }

    pub fn attributes(&self) -> &PenAttributes {
        &self.attributes
    }

    /// Copy of the current points
    pub fn points(&self) -> Vec<Pos2> {
        self.geometry.lock().points.clone()
    }

    pub fn len(&self) -> usize {
        self.geometry.lock().points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometry.lock().points.is_empty()
    }

    /// True once the path has at least one drawn segment
    pub fn has_segment(&self) -> bool {
        self.len() >= 2
    }

    pub(crate) fn push_point(&self, point: Pos2) {
        let mut geometry = self.geometry.lock();
        geometry.points.push(point);
        geometry.invalidate();
    }

    pub(crate) fn set_points(&self, points: Vec<Pos2>) {
        let mut geometry = self.geometry.lock();
        geometry.points = points;
        geometry.invalidate();
    }

    /// Move the end of a straightened path, appending if it has fewer than two points
    pub(crate) fn set_endpoint(&self, end: Pos2) {
        let mut geometry = self.geometry.lock();
        if geometry.points.len() >= 2 {
            geometry.points[1] = end;
        } else {
            geometry.points.push(end);
        }
        geometry.invalidate();
    }

    /// Minimum distance from `pos` to this path's centerline
    pub fn distance_to(&self, pos: Pos2) -> Option<f32> {
        hit_testing::distance_to_polyline(pos, &self.geometry.lock().points)
    }

    /// Whether an eraser of `eraser_radius` at `pos` touches this path
    pub fn hit_test(&self, pos: Pos2, eraser_radius: f32) -> bool {
        self.distance_to(pos)
            .is_some_and(|d| d <= eraser_radius + self.attributes.half_width())
    }

    pub fn bounds(&self) -> Rect {
        hit_testing::calculate_bounds(&self.geometry.lock().points, self.attributes.half_width())
    }

    pub fn needs_cache_update(&self) -> bool {
        self.geometry.lock().cache_needs_update
    }

    pub fn cache_version(&self) -> u64 {
        self.geometry.lock().cache_version
    }

    /// Drop the cached shape entirely, e.g. when the path leaves the canvas
    pub(crate) fn discard_cache(&self) {
        let mut geometry = self.geometry.lock();
        geometry.cached_shape = None;
        geometry.cache_needs_update = true;
    }

    /// The renderable shape for the current points, rebuilt only when invalid
    pub fn shape(&self) -> Shape {
        let mut geometry = self.geometry.lock();
        if geometry.cache_needs_update || geometry.cached_shape.is_none() {
            let shape = build_shape(&geometry.points, &self.attributes);
            log::trace!(
                "Rebuilt shape for path {} ({} points, version {})",
                self.id,
                geometry.points.len(),
                geometry.cache_version
            );
            geometry.cached_shape = Some(shape);
            geometry.cache_needs_update = false;
        }
        geometry.cached_shape.clone().unwrap_or(Shape::Noop)
    }
}

fn build_shape(points: &[Pos2], attributes: &PenAttributes) -> Shape {
    let color = attributes.paint_color();
    match points {
        [] => Shape::Noop,
        [dot] => Shape::circle_filled(*dot, attributes.half_width(), color),
        _ => Shape::line(points.to_vec(), EguiStroke::new(attributes.width, color)),
    }
}
