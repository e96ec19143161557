//! # Stroke model
//!
//! Signature geometry, independent of any drawing surface.
//!
//! A [`Signature`] is an ordered list of committed [`Stroke`]s plus the raster
//! export derived from them. Strokes are append-only while capturing and can
//! only be truncated from the end (undo). The export is regenerated by the
//! capture controller on every committed change; it is the value handed to
//! downstream consumers (submission payload, print renderer).

use serde::{Deserialize, Serialize};

/// A position in canvas-local pixels (origin at the top-left of the pad).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// One continuous pointer-down to pointer-up path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stroke(Vec<Point>);

impl Stroke {
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consecutive point pairs, i.e. the line segments the pen travelled.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.0.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

impl From<Vec<Point>> for Stroke {
    fn from(points: Vec<Point>) -> Self {
        Self(points)
    }
}

/// A buyer's signature: committed strokes and their raster export.
///
/// `export` is `None` until the first stroke is committed and goes back to
/// `None` when the last stroke is undone or the pad is cleared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    #[serde(default)]
    pub strokes: Vec<Stroke>,
    #[serde(default)]
    pub export: Option<String>,
}

impl Signature {
    /// Whether the buyer has signed (a non-null export exists).
    pub fn is_captured(&self) -> bool {
        self.export.is_some()
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }
}
