//! Drawing surface abstraction.
//!
//! The countdown widget never draws pixels itself. It talks to a [`Surface`],
//! a small canvas-like 2D context with paths, fill and stroke. Two
//! implementations ship with the crate:
//!
//! - [`PixelSurface`](crate::raster::PixelSurface): a software rasterizer that
//!   the terminal view is rendered from.
//! - [`RecordingSurface`]: keeps every call as a [`DrawOp`], which is handy
//!   for hosts that replay the drawing elsewhere and for tests.
//!
//! A host embedding the widget in some other toolkit implements [`Surface`]
//! on top of its own 2D context.
//!
//! # Examples
//!
//! ```rust
//! use bubbletea_countdown::surface::{DrawOp, RecordingSurface, Surface};
//!
//! let mut surface = RecordingSurface::new();
//! surface.begin_path();
//! surface.move_to(10.0, 10.0);
//! surface.close_path();
//! assert_eq!(surface.ops().len(), 3);
//! assert_eq!(surface.ops()[1], DrawOp::MoveTo { x: 10.0, y: 10.0 });
//! ```

use std::fmt;

/// How stroked path segments are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    /// Rounded corners.
    Round,
    /// Corners cut off flat.
    Bevel,
    /// Sharp corners.
    #[default]
    Miter,
}

impl fmt::Display for LineJoin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                LineJoin::Round => "round",
                LineJoin::Bevel => "bevel",
                LineJoin::Miter => "miter",
            }
        )
    }
}

/// A canvas-style 2D drawing context.
///
/// Coordinates are in pixels with the origin in the top-left corner and the
/// y axis pointing down, so increasing angles turn clockwise on screen.
pub trait Surface {
    /// Resizes the surface. Existing content may be discarded.
    fn set_dimensions(&mut self, width: u32, height: u32);

    /// Current `(width, height)`.
    fn dimensions(&self) -> (u32, u32);

    /// Sets the color used by [`fill`](Surface::fill).
    fn set_fill_style(&mut self, color: &str);

    /// Sets the color used by [`stroke`](Surface::stroke).
    fn set_stroke_style(&mut self, color: &str);

    /// Sets the stroke width in pixels.
    fn set_line_width(&mut self, width: f64);

    /// Sets how stroked segments are joined.
    fn set_line_join(&mut self, join: LineJoin);

    /// Resets every pixel of the given rectangle to transparent.
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Discards the current path and starts a new one.
    fn begin_path(&mut self);

    /// Starts a new subpath at `(x, y)`.
    fn move_to(&mut self, x: f64, y: f64);

    /// Adds a circular arc around `(x, y)`.
    ///
    /// A straight line joins the current point to the start of the arc.
    /// With `anticlockwise` set the arc runs from `start_angle` towards
    /// `end_angle` by decreasing angles.
    fn arc(
        &mut self,
        x: f64,
        y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
    );

    /// Joins the current point back to the start of the subpath.
    fn close_path(&mut self);

    /// Fills the current path with the fill style.
    fn fill(&mut self);

    /// Strokes the current path with the stroke style and line width.
    fn stroke(&mut self);
}

/// One recorded [`Surface`] call.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum DrawOp {
    SetDimensions {
        width: u32,
        height: u32,
    },
    SetFillStyle(String),
    SetStrokeStyle(String),
    SetLineWidth(f64),
    SetLineJoin(LineJoin),
    ClearRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    BeginPath,
    MoveTo {
        x: f64,
        y: f64,
    },
    Arc {
        x: f64,
        y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
    },
    ClosePath,
    Fill,
    Stroke,
}

/// A [`Surface`] that records calls instead of drawing.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    /// Creates an empty 0×0 recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call recorded so far, oldest first.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Forgets recorded calls, keeping the dimensions.
    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    /// The most recent arc call, if any.
    pub fn last_arc(&self) -> Option<&DrawOp> {
        self.ops
            .iter()
            .rev()
            .find(|op| matches!(op, DrawOp::Arc { .. }))
    }
}

impl Surface for RecordingSurface {
    fn set_dimensions(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.ops.push(DrawOp::SetDimensions { width, height });
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_fill_style(&mut self, color: &str) {
        self.ops.push(DrawOp::SetFillStyle(color.to_string()));
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.ops.push(DrawOp::SetStrokeStyle(color.to_string()));
    }

    fn set_line_width(&mut self, width: f64) {
        self.ops.push(DrawOp::SetLineWidth(width));
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.ops.push(DrawOp::SetLineJoin(join));
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(DrawOp::ClearRect {
            x,
            y,
            width,
            height,
        });
    }

    fn begin_path(&mut self) {
        self.ops.push(DrawOp::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::MoveTo { x, y });
    }

    fn arc(
        &mut self,
        x: f64,
        y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
    ) {
        self.ops.push(DrawOp::Arc {
            x,
            y,
            radius,
            start_angle,
            end_angle,
            anticlockwise,
        });
    }

    fn close_path(&mut self) {
        self.ops.push(DrawOp::ClosePath);
    }

    fn fill(&mut self) {
        self.ops.push(DrawOp::Fill);
    }

    fn stroke(&mut self) {
        self.ops.push(DrawOp::Stroke);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_keeps_order() {
        let mut surface = RecordingSurface::new();
        surface.set_dimensions(40, 40);
        surface.begin_path();
        surface.arc(20.0, 20.0, 10.0, 0.0, 1.0, true);
        surface.fill();

        assert_eq!(surface.dimensions(), (40, 40));
        assert_eq!(
            surface.ops(),
            &[
                DrawOp::SetDimensions {
                    width: 40,
                    height: 40
                },
                DrawOp::BeginPath,
                DrawOp::Arc {
                    x: 20.0,
                    y: 20.0,
                    radius: 10.0,
                    start_angle: 0.0,
                    end_angle: 1.0,
                    anticlockwise: true,
                },
                DrawOp::Fill,
            ]
        );
    }

    #[test]
    fn test_last_arc() {
        let mut surface = RecordingSurface::new();
        assert!(surface.last_arc().is_none());

        surface.arc(0.0, 0.0, 1.0, 0.0, 1.0, false);
        surface.arc(0.0, 0.0, 2.0, 0.0, 1.0, false);
        surface.stroke();

        match surface.last_arc() {
            Some(DrawOp::Arc { radius, .. }) => assert_eq!(*radius, 2.0),
            other => panic!("expected an arc, got {other:?}"),
        }

        surface.clear_ops();
        assert!(surface.ops().is_empty());
    }

    #[test]
    fn test_line_join_display() {
        assert_eq!(LineJoin::Round.to_string(), "round");
        assert_eq!(LineJoin::default(), LineJoin::Miter);
    }
}
