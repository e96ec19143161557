//! # Signature capture
//!
//! [`SignaturePad`] converts pointer input into strokes, keeps the drawing
//! surface current and regenerates a buyer's raster export.
//!
//! The pad owns only rendering state: the canvas and the single open stroke.
//! Committed strokes belong to the buyer's [`Signature`], which every
//! committing call receives by `&mut`.
//!
//! ```text
//!   Down ──► begin ──► Move* ──► extend (draws one segment)
//!                           └──► Up / Leave ──► end (commit + export)
//! ```
//!
//! `undo` and `clear` redraw from scratch; `extend` never replays history.
//! None of the operations fail. Malformed pointer samples are dropped.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::raster::{rasterize, Canvas, CanvasSize};
use crate::stroke::{Point, Signature, Stroke};

/// Signal emitted when a signature's committed content changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "dataUri", rename_all = "camelCase")]
pub enum SignatureUpdate {
    /// New raster export of all committed strokes.
    Exported(String),
    /// No strokes remain; the export is now null.
    Cleared,
}

// ─────────────────────────────────────────────────────────
// Input normalization
// ─────────────────────────────────────────────────────────

/// Page-space origin of the pad's bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TouchPoint {
    pub client_x: f32,
    pub client_y: f32,
}

/// A raw mouse or touch sample as reported by the browser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerSample {
    #[serde(default)]
    pub client_x: Option<f32>,
    #[serde(default)]
    pub client_y: Option<f32>,
    #[serde(default)]
    pub touches: Vec<TouchPoint>,
}

impl PointerSample {
    pub fn mouse(client_x: f32, client_y: f32) -> Self {
        Self {
            client_x: Some(client_x),
            client_y: Some(client_y),
            touches: Vec::new(),
        }
    }

    pub fn touch(client_x: f32, client_y: f32) -> Self {
        Self {
            touches: vec![TouchPoint { client_x, client_y }],
            ..Self::default()
        }
    }

    /// Map to canvas-local coordinates. Mouse coordinates win; otherwise the
    /// first touch is used. `None` when the sample carries no usable position.
    pub fn to_local(&self, bounds: Bounds) -> Option<Point> {
        let (x, y) = match (self.client_x, self.client_y) {
            (Some(x), Some(y)) => (x, y),
            _ => {
                let touch = self.touches.first()?;
                (touch.client_x, touch.client_y)
            }
        };
        if !(x.is_finite() && y.is_finite()) {
            return None;
        }
        Some(Point::new(x - bounds.left, y - bounds.top))
    }
}

/// Pointer lifecycle events, shared by mouse and touch input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PadEvent {
    Down(PointerSample),
    Move(PointerSample),
    Up,
    Leave,
}

// ─────────────────────────────────────────────────────────
// Pad
// ─────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SignaturePad {
    canvas: Canvas,
    open: Option<Vec<Point>>,
}

impl SignaturePad {
    pub fn new(size: CanvasSize) -> Self {
        Self {
            canvas: Canvas::new(size),
            open: None,
        }
    }

    /// Rebuild a pad for an already-captured signature (e.g. after a draft
    /// restore), so undo keeps working on the restored strokes.
    pub fn restore(signature: &Signature, size: CanvasSize) -> Self {
        Self {
            canvas: rasterize(&signature.strokes, size),
            open: None,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn is_drawing(&self) -> bool {
        self.open.is_some()
    }

    /// Start a stroke at `point`. A second `begin` while a stroke is open is
    /// ignored, which absorbs duplicate mouse/touch start events.
    pub fn begin(&mut self, point: Point) {
        if self.open.is_some() {
            return;
        }
        self.open = Some(vec![point]);
    }

    /// Append `point` to the open stroke and draw only the new segment.
    pub fn extend(&mut self, point: Point) {
        let Some(open) = self.open.as_mut() else {
            return;
        };
        if let Some(&last) = open.last() {
            self.canvas.draw_segment(last, point);
        }
        open.push(point);
    }

    /// Commit the open stroke to `signature` and re-export.
    pub fn end(&mut self, signature: &mut Signature) -> Option<SignatureUpdate> {
        let points = self.open.take()?;
        if points.is_empty() {
            return None;
        }
        let stroke = Stroke::from(points);
        if stroke.len() == 1 {
            // A tap never produced a segment during extend.
            self.canvas.draw_stroke(&stroke);
        }
        signature.strokes.push(stroke);
        Some(self.export_into(signature))
    }

    /// Drop the last committed stroke, redraw everything that remains.
    pub fn undo(&mut self, signature: &mut Signature) -> Option<SignatureUpdate> {
        signature.strokes.pop()?;
        self.open = None;
        self.canvas.replay(&signature.strokes);
        if signature.strokes.is_empty() {
            signature.export = None;
            return Some(SignatureUpdate::Cleared);
        }
        Some(self.export_into(signature))
    }

    pub fn clear(&mut self, signature: &mut Signature) -> SignatureUpdate {
        self.open = None;
        self.canvas.clear();
        signature.strokes.clear();
        signature.export = None;
        SignatureUpdate::Cleared
    }

    /// Route one pointer event through `begin`/`extend`/`end`.
    pub fn handle(
        &mut self,
        event: &PadEvent,
        bounds: Bounds,
        signature: &mut Signature,
    ) -> Option<SignatureUpdate> {
        match event {
            PadEvent::Down(sample) => {
                match sample.to_local(bounds) {
                    Some(point) => self.begin(point),
                    None => debug!("dropping pointer-down without coordinates"),
                }
                None
            }
            PadEvent::Move(sample) => {
                match sample.to_local(bounds) {
                    Some(point) => self.extend(point),
                    None => debug!("dropping pointer-move without coordinates"),
                }
                None
            }
            PadEvent::Up | PadEvent::Leave => self.end(signature),
        }
    }

    fn export_into(&self, signature: &mut Signature) -> SignatureUpdate {
        let uri = self.canvas.to_data_uri();
        signature.export = Some(uri.clone());
        SignatureUpdate::Exported(uri)
    }
}
