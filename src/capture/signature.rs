//! Freehand signature surface
//!
//! Pointer input arrives in client (viewport) coordinates. Each point is
//! mapped onto the surface by subtracting the surface's on-screen offset and
//! scaling from its displayed size to its pixel resolution, so strokes land
//! under the pointer whatever the page scroll or CSS size.
//!
//! When a drag ends the surface is rasterized to PNG and held as the pending
//! signature until it is cleared or submitted.

use image::{DynamicImage, GrayImage, ImageOutputFormat, Luma};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

use crate::capture::error::{CaptureError, CaptureResult};
use crate::storage::SignatureImage;

/// Default surface resolution
pub const SURFACE_WIDTH: u32 = 800;
pub const SURFACE_HEIGHT: u32 = 400;

/// Stroke width in surface pixels
pub const STROKE_WIDTH: f32 = 3.0;

/// A pointer position in client coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClientPoint {
    pub x: f64,
    pub y: f64,
}

impl ClientPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// On-screen bounding box of the surface, in client coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceGeometry {
    pub left: f64,
    pub top: f64,
    /// Displayed width; zero means "same as the surface resolution"
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

impl SurfaceGeometry {
    /// Surface displayed at its own resolution at the given offset
    pub fn at(left: f64, top: f64) -> Self {
        Self {
            left,
            top,
            width: 0.0,
            height: 0.0,
        }
    }
}

/// Drawing surface accumulating freehand strokes
#[derive(Debug, Clone)]
pub struct SignaturePad {
    width: u32,
    height: u32,
    strokes: Vec<Vec<(f32, f32)>>,
    drawing: bool,
    pending: Option<SignatureImage>,
}

impl Default for SignaturePad {
    fn default() -> Self {
        Self::new(SURFACE_WIDTH, SURFACE_HEIGHT)
    }
}

impl SignaturePad {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            strokes: Vec::new(),
            drawing: false,
            pending: None,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Map a client point onto surface pixels
    pub fn map_point(&self, point: ClientPoint, geometry: &SurfaceGeometry) -> (f32, f32) {
        let scale_x = if geometry.width > 0.0 {
            self.width as f64 / geometry.width
        } else {
            1.0
        };
        let scale_y = if geometry.height > 0.0 {
            self.height as f64 / geometry.height
        } else {
            1.0
        };

        (
            ((point.x - geometry.left) * scale_x) as f32,
            ((point.y - geometry.top) * scale_y) as f32,
        )
    }

    /// Start a stroke
    pub fn pointer_down(&mut self, point: ClientPoint, geometry: &SurfaceGeometry) {
        let mapped = self.map_point(point, geometry);
        self.drawing = true;
        self.strokes.push(vec![mapped]);
    }

    /// Extend the active stroke; ignored when no stroke is active
    pub fn pointer_move(&mut self, point: ClientPoint, geometry: &SurfaceGeometry) {
        if !self.drawing {
            return;
        }
        let mapped = self.map_point(point, geometry);
        if let Some(stroke) = self.strokes.last_mut() {
            stroke.push(mapped);
        }
    }

    /// End the active stroke (pointer released or left the surface) and
    /// rasterize the surface into the pending signature
    pub fn pointer_up(&mut self) -> CaptureResult<()> {
        if !self.drawing {
            return Ok(());
        }
        self.drawing = false;

        if self.has_ink() {
            self.pending = Some(self.rasterize()?);
        }
        Ok(())
    }

    /// Reset the surface and discard the pending signature
    pub fn clear(&mut self) {
        self.strokes.clear();
        self.drawing = false;
        self.pending = None;
    }

    /// Take an image rasterized elsewhere (a browser canvas) as the pending
    /// signature
    pub fn adopt(&mut self, image: SignatureImage) {
        self.clear();
        if !image.is_empty() {
            self.pending = Some(image);
        }
    }

    /// The signature held for submission, if any
    pub fn pending(&self) -> Option<&SignatureImage> {
        self.pending.as_ref().filter(|image| !image.is_empty())
    }

    pub fn has_ink(&self) -> bool {
        self.strokes.iter().any(|stroke| !stroke.is_empty())
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    /// Draw the strokes onto a white surface
    pub fn render(&self) -> GrayImage {
        let mut canvas = GrayImage::from_pixel(self.width, self.height, Luma([255]));
        let radius = STROKE_WIDTH / 2.0;

        for stroke in &self.strokes {
            let mut points = stroke.iter();
            let Some(&first) = points.next() else {
                continue;
            };
            stamp(&mut canvas, first, radius);

            let mut previous = first;
            for &point in points {
                draw_segment(&mut canvas, previous, point, radius);
                previous = point;
            }
        }

        canvas
    }

    /// Encode the surface as a PNG signature image
    pub fn rasterize(&self) -> CaptureResult<SignatureImage> {
        let mut bytes = Vec::new();
        DynamicImage::ImageLuma8(self.render())
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .map_err(|e| CaptureError::Signature(e.to_string()))?;
        Ok(SignatureImage::from_png(&bytes))
    }
}

/// Round-capped segment: discs stamped every half pixel.
/// Only the part that can touch the surface is walked.
fn draw_segment(canvas: &mut GrayImage, from: (f32, f32), to: (f32, f32), radius: f32) {
    let (width, height) = canvas.dimensions();
    let min = (-radius, -radius);
    let max = (width as f32 + radius, height as f32 + radius);
    let Some((from, to)) = clip_segment(from, to, min, max) else {
        return;
    };

    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let length = (dx * dx + dy * dy).sqrt();
    let steps = (length * 2.0).ceil().max(1.0) as u32;

    for step in 0..=steps {
        let t = step as f32 / steps as f32;
        stamp(canvas, (from.0 + dx * t, from.1 + dy * t), radius);
    }
}

/// Liang-Barsky clip against the box `min..max`; `None` when nothing is inside
fn clip_segment(
    from: (f32, f32),
    to: (f32, f32),
    min: (f32, f32),
    max: (f32, f32),
) -> Option<((f32, f32), (f32, f32))> {
    if ![from.0, from.1, to.0, to.1].iter().all(|v| v.is_finite()) {
        return None;
    }

    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let (mut enter, mut leave) = (0.0f32, 1.0f32);
    let edges = [
        (-dx, from.0 - min.0),
        (dx, max.0 - from.0),
        (-dy, from.1 - min.1),
        (dy, max.1 - from.1),
    ];

    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > leave {
                return None;
            }
            enter = enter.max(r);
        } else {
            if r < enter {
                return None;
            }
            leave = leave.min(r);
        }
    }

    Some((
        (from.0 + dx * enter, from.1 + dy * enter),
        (from.0 + dx * leave, from.1 + dy * leave),
    ))
}

fn stamp(canvas: &mut GrayImage, center: (f32, f32), radius: f32) {
    let (width, height) = canvas.dimensions();
    let min_x = ((center.0 - radius).floor() as i64).max(0);
    let max_x = ((center.0 + radius).ceil() as i64).min(width as i64 - 1);
    let min_y = ((center.1 - radius).floor() as i64).max(0);
    let max_y = ((center.1 + radius).ceil() as i64).min(height as i64 - 1);

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let px = x as f32 + 0.5 - center.0;
            let py = y as f32 + 0.5 - center.1;
            if px * px + py * py <= radius * radius {
                canvas.put_pixel(x as u32, y as u32, Luma([0]));
            }
        }
    }
}
