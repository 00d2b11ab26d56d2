//! Software rasterizer behind the terminal view.
//!
//! [`PixelSurface`] implements [`Surface`] on a plain grid of pixels. Paths
//! are flattened into polygons (arcs are sampled every few degrees). Fills
//! are scanline passes over pixel centers with the nonzero winding rule;
//! strokes cover every pixel whose center lies within half the line width of
//! the outline, so joins always come out round.
//!
//! Pixels hold an index into a small palette of color strings rather than the
//! strings themselves; the palette grows as new styles are used.
//!
//! ```rust
//! use bubbletea_countdown::raster::PixelSurface;
//! use bubbletea_countdown::surface::Surface;
//!
//! let mut surface = PixelSurface::new(10, 10);
//! surface.set_fill_style("#f00");
//! surface.begin_path();
//! surface.move_to(0.0, 0.0);
//! surface.arc(5.0, 5.0, 4.0, 0.0, 6.3, false);
//! surface.fill();
//! assert_eq!(surface.pixel(5, 5), Some("#f00"));
//! assert!(!surface.is_blank());
//!
//! surface.clear_rect(0.0, 0.0, 10.0, 10.0);
//! assert!(surface.is_blank());
//! ```

use crate::geometry::swept_angle;
use crate::surface::{LineJoin, Surface};
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;
use std::f64::consts::PI;

// Maximum angular step when flattening arcs, in radians (about 3°).
const ARC_STEP: f64 = 0.05;

type Point = (f64, f64);

#[derive(Debug, Clone, Default)]
struct SubPath {
    points: Vec<Point>,
    closed: bool,
}

/// A [`Surface`] backed by an in-memory pixel grid.
#[derive(Debug, Clone)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<Option<usize>>,
    palette: Vec<String>,
    fill_style: String,
    stroke_style: String,
    line_width: f64,
    line_join: LineJoin,
    path: Vec<SubPath>,
}

impl Default for PixelSurface {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl PixelSurface {
    /// Creates a transparent surface of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![None; (width as usize) * (height as usize)],
            palette: Vec::new(),
            fill_style: "#000".to_string(),
            stroke_style: "#000".to_string(),
            line_width: 1.0,
            line_join: LineJoin::Miter,
            path: Vec::new(),
        }
    }

    /// Color of the pixel at `(x, y)`, or `None` when transparent or out of
    /// bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&str> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels[self.index(x, y)].map(|i| self.palette[i].as_str())
    }

    /// Whether every pixel is transparent.
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(Option::is_none)
    }

    /// Number of pixels painted with `color`.
    pub fn count(&self, color: &str) -> usize {
        match self.palette.iter().position(|c| c == color) {
            Some(idx) => self.pixels.iter().filter(|p| **p == Some(idx)).count(),
            None => 0,
        }
    }

    /// Current line join.
    pub fn line_join(&self) -> LineJoin {
        self.line_join
    }

    /// Current line width.
    pub fn line_width(&self) -> f64 {
        self.line_width
    }

    /// Current fill style.
    pub fn fill_style(&self) -> &str {
        &self.fill_style
    }

    /// Current stroke style.
    pub fn stroke_style(&self) -> &str {
        &self.stroke_style
    }

    /// Renders the surface as text, `columns` characters wide.
    ///
    /// Each character covers one column and two rows of samples using the
    /// upper/lower half block glyphs, so a square surface comes out roughly
    /// square in a terminal. Transparent samples render as spaces.
    pub fn render_blocks(&self, columns: u32) -> String {
        if columns == 0 || self.width == 0 || self.height == 0 {
            return String::new();
        }
        let step = f64::from(self.width) / f64::from(columns);
        let rows = (f64::from(self.height) / step).ceil() as u32;

        let sample = |col: u32, row: u32| {
            if row >= rows {
                return None;
            }
            let x = ((f64::from(col) + 0.5) * step) as u32;
            let y = ((f64::from(row) + 0.5) * step) as u32;
            self.pixel(x, y)
        };

        let mut lines = Vec::new();
        for line in 0..rows.div_ceil(2) {
            let mut out = String::new();
            for col in 0..columns {
                let top = sample(col, line * 2);
                let bottom = sample(col, line * 2 + 1);
                let cell = match (top, bottom) {
                    (None, None) => " ".to_string(),
                    (Some(t), None) => Style::new()
                        .foreground(lipgloss::Color::from(t))
                        .render("▀"),
                    (None, Some(b)) => Style::new()
                        .foreground(lipgloss::Color::from(b))
                        .render("▄"),
                    (Some(t), Some(b)) => Style::new()
                        .foreground(lipgloss::Color::from(t))
                        .background(lipgloss::Color::from(b))
                        .render("▀"),
                };
                out.push_str(&cell);
            }
            lines.push(out);
        }
        lines.join("\n")
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    fn palette_index(&mut self, color: &str) -> usize {
        match self.palette.iter().position(|c| c == color) {
            Some(idx) => idx,
            None => {
                self.palette.push(color.to_string());
                self.palette.len() - 1
            }
        }
    }

    fn current_point(&self) -> Option<Point> {
        self.path.last().and_then(|sp| sp.points.last().copied())
    }

    fn set_index(&mut self, x: u32, y: u32, idx: usize) {
        let i = self.index(x, y);
        self.pixels[i] = Some(idx);
    }

    // Covers the pixels of row `y` whose centers lie in `[from, to)`.
    fn fill_span(&mut self, idx: usize, y: u32, from: f64, to: f64) {
        let x0 = (from - 0.5).ceil().max(0.0) as u32;
        let x1 = ((to - 0.5).ceil().max(0.0) as u32).min(self.width);
        for x in x0..x1 {
            self.set_index(x, y, idx);
        }
    }
}

// Edges a fill walks: every subpath with its closing edge, since fills close
// open subpaths implicitly.
fn fill_edges(subpaths: &[SubPath]) -> impl Iterator<Item = (Point, Point)> + '_ {
    subpaths
        .iter()
        .filter(|sp| sp.points.len() >= 3)
        .flat_map(|sp| {
            let pts = &sp.points;
            pts.iter().copied().zip(pts.iter().copied().cycle().skip(1))
        })
}

// Edges a stroke draws: only subpaths closed by `close_path` get their
// closing edge.
fn stroke_edges(subpaths: &[SubPath]) -> impl Iterator<Item = (Point, Point)> + '_ {
    subpaths.iter().flat_map(|sp| {
        let pts = &sp.points;
        let closing = (sp.closed && pts.len() > 2).then(|| (pts[pts.len() - 1], pts[0]));
        pts.windows(2).map(|w| (w[0], w[1])).chain(closing)
    })
}

// Where an edge crosses the horizontal line at `py`, and its winding
// direction. Endpoints are ordered by y before interpolating so that an edge
// and its reverse cross at the same x and cancel out.
fn crossing((a, b): (Point, Point), py: f64) -> Option<(f64, i32)> {
    let (lo, hi, dir) = if a.1 <= b.1 { (a, b, 1) } else { (b, a, -1) };
    if lo.1 <= py && py < hi.1 {
        Some((lo.0 + (py - lo.1) * (hi.0 - lo.0) / (hi.1 - lo.1), dir))
    } else {
        None
    }
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
    ((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt()
}

impl Surface for PixelSurface {
    fn set_dimensions(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels = vec![None; (width as usize) * (height as usize)];
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_fill_style(&mut self, color: &str) {
        self.fill_style = color.to_string();
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.stroke_style = color.to_string();
    }

    fn set_line_width(&mut self, width: f64) {
        // Canvas contexts ignore non-positive and non-finite widths.
        if width.is_finite() && width > 0.0 {
            self.line_width = width;
        }
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.line_join = join;
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let x0 = x.max(0.0).floor() as u32;
        let y0 = y.max(0.0).floor() as u32;
        let x1 = ((x + width).ceil().max(0.0) as u32).min(self.width);
        let y1 = ((y + height).ceil().max(0.0) as u32).min(self.height);
        for py in y0..y1 {
            for px in x0..x1 {
                let i = self.index(px, py);
                self.pixels[i] = None;
            }
        }
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.path.push(SubPath {
            points: vec![(x, y)],
            closed: false,
        });
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
        let sweep = swept_angle(start_angle, end_angle, anticlockwise);
        let steps = ((sweep / ARC_STEP).ceil() as usize).max(1);
        let direction = if anticlockwise { -1.0 } else { 1.0 };
        // The radius may be negative on degenerate configurations; canvas
        // would throw, here the arc simply mirrors through the center.
        let mut arc_points: Vec<Point> = (0..=steps)
            .map(|i| {
                let angle = start_angle + direction * sweep * (i as f64) / (steps as f64);
                (x + radius * angle.cos(), y + radius * angle.sin())
            })
            .collect();
        // A full turn ends exactly where it started.
        if (2.0 * PI - sweep).abs() < 1e-9 {
            arc_points[steps] = arc_points[0];
        }

        if self.current_point().is_none() {
            self.path.push(SubPath::default());
        }
        if let Some(sp) = self.path.last_mut() {
            sp.points.extend(arc_points);
        }
    }

    fn close_path(&mut self) {
        let start = self.path.last().and_then(|sp| sp.points.first().copied());
        if let Some(sp) = self.path.last_mut() {
            sp.closed = true;
        }
        // Following segments start a new subpath at the closed path's origin.
        if let Some(p) = start {
            self.path.push(SubPath {
                points: vec![p],
                closed: false,
            });
        }
    }

    fn fill(&mut self) {
        let subpaths = std::mem::take(&mut self.path);
        let color = self.fill_style.clone();
        let idx = self.palette_index(&color);
        let edges: Vec<_> = fill_edges(&subpaths).collect();

        // Scanline fill with the nonzero winding rule, sampled at pixel centers.
        let mut hits: Vec<(f64, i32)> = Vec::new();
        for y in 0..self.height {
            let py = f64::from(y) + 0.5;
            hits.clear();
            hits.extend(edges.iter().filter_map(|&edge| crossing(edge, py)));
            hits.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut winding = 0;
            for pair in hits.windows(2) {
                winding += pair[0].1;
                if winding != 0 {
                    self.fill_span(idx, y, pair[0].0, pair[1].0);
                }
            }
        }
        self.path = subpaths;
    }

    fn stroke(&mut self) {
        let subpaths = std::mem::take(&mut self.path);
        let color = self.stroke_style.clone();
        let idx = self.palette_index(&color);
        let half = self.line_width / 2.0;

        // Only the pixels around each segment can be within reach of it.
        for (a, b) in stroke_edges(&subpaths) {
            let x0 = (a.0.min(b.0) - half - 0.5).floor().max(0.0) as u32;
            let y0 = (a.1.min(b.1) - half - 0.5).floor().max(0.0) as u32;
            let x1 = ((a.0.max(b.0) + half).ceil().max(0.0) as u32).min(self.width);
            let y1 = ((a.1.max(b.1) + half).ceil().max(0.0) as u32).min(self.height);
            for y in y0..y1 {
                for x in x0..x1 {
                    let center = (f64::from(x) + 0.5, f64::from(y) + 0.5);
                    if distance_to_segment(center, a, b) <= half {
                        self.set_index(x, y, idx);
                    }
                }
            }
        }
        self.path = subpaths;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{arc_for_ratio, radians};

    fn draw_pie(surface: &mut PixelSurface, ratio: f64) {
        let (size, _) = surface.dimensions();
        let arc = arc_for_ratio(ratio, size, 1.0);
        surface.clear_rect(0.0, 0.0, f64::from(size), f64::from(size));
        surface.begin_path();
        surface.move_to(arc.center.0, arc.center.1);
        surface.arc(
            arc.center.0,
            arc.center.1,
            arc.radius,
            arc.start_angle,
            arc.end_angle,
            arc.anticlockwise,
        );
        surface.close_path();
        surface.fill();
    }

    #[test]
    fn test_new_surface_is_blank() {
        let surface = PixelSurface::new(8, 4);
        assert_eq!(surface.dimensions(), (8, 4));
        assert!(surface.is_blank());
        assert_eq!(surface.pixel(100, 100), None);
    }

    #[test]
    fn test_half_pie_covers_left_half() {
        // Anticlockwise from 12 o'clock to 6 o'clock sweeps the left half.
        let mut surface = PixelSurface::new(40, 40);
        surface.set_fill_style("#f00");
        draw_pie(&mut surface, 0.5);

        assert_eq!(surface.pixel(10, 20), Some("#f00"));
        assert_eq!(surface.pixel(30, 20), None);
    }

    #[test]
    fn test_fill_area_tracks_ratio() {
        let mut surface = PixelSurface::new(60, 60);
        surface.set_fill_style("#f00");

        draw_pie(&mut surface, 1.0);
        let full = surface.count("#f00");
        draw_pie(&mut surface, 0.25);
        let quarter = surface.count("#f00");

        let expected = full as f64 / 4.0;
        assert!(
            (quarter as f64 - expected).abs() < expected * 0.15,
            "quarter pie covered {quarter} pixels, full pie {full}"
        );
    }

    #[test]
    fn test_stroke_draws_outline_only() {
        let mut surface = PixelSurface::new(40, 40);
        surface.set_stroke_style("#000");
        surface.set_line_width(2.0);
        surface.begin_path();
        surface.arc(20.0, 20.0, 15.0, 0.0, radians(360.0), false);
        surface.stroke();

        assert_eq!(surface.pixel(35, 20), Some("#000"));
        assert_eq!(surface.pixel(20, 20), None);
    }

    #[test]
    fn test_clear_rect_is_clipped() {
        let mut surface = PixelSurface::new(10, 10);
        surface.set_fill_style("#0f0");
        surface.begin_path();
        surface.move_to(0.0, 0.0);
        surface.arc(5.0, 5.0, 20.0, 0.0, radians(360.0), false);
        surface.fill();
        assert_eq!(surface.count("#0f0"), 100);

        surface.clear_rect(-5.0, -5.0, 10.0, 10.0);
        assert_eq!(surface.pixel(2, 2), None);
        assert_eq!(surface.pixel(7, 7), Some("#0f0"));

        surface.clear_rect(0.0, 0.0, 100.0, 100.0);
        assert!(surface.is_blank());
    }

    #[test]
    fn test_retraced_edge_leaves_no_holes() {
        // The line into the circle and the closing edge back out lie on top
        // of each other and cancel, whichever side of them a pixel falls.
        let mut surface = PixelSurface::new(10, 10);
        surface.set_fill_style("#0f0");
        surface.begin_path();
        surface.move_to(0.0, 0.0);
        surface.arc(5.0, 5.0, 20.0, 0.0, radians(360.0), false);
        surface.close_path();
        surface.fill();

        assert_eq!(surface.pixel(2, 0), Some("#0f0"));
        assert_eq!(surface.pixel(7, 1), Some("#0f0"));
        assert_eq!(surface.count("#0f0"), 100);
    }

    #[test]
    fn test_fill_uses_nonzero_winding() {
        // Two turns in the same direction: even-odd would leave the disc empty.
        let mut surface = PixelSurface::new(20, 20);
        surface.set_fill_style("#f00");
        surface.begin_path();
        surface.arc(10.0, 10.0, 8.0, 0.0, radians(360.0), false);
        surface.move_to(18.0, 10.0);
        surface.arc(10.0, 10.0, 8.0, 0.0, radians(360.0), false);
        surface.fill();

        assert_eq!(surface.pixel(10, 10), Some("#f00"));
        assert_eq!(surface.pixel(0, 0), None);

        // Opposite directions cancel.
        surface.clear_rect(0.0, 0.0, 20.0, 20.0);
        surface.begin_path();
        surface.arc(10.0, 10.0, 8.0, 0.0, radians(360.0), false);
        surface.move_to(18.0, 10.0);
        surface.arc(10.0, 10.0, 8.0, 0.0, -radians(360.0), true);
        surface.fill();
        assert!(surface.is_blank());
    }

    #[test]
    fn test_stroke_stays_near_segment() {
        let mut surface = PixelSurface::new(20, 20);
        surface.set_stroke_style("#000");
        surface.set_line_width(2.0);
        surface.begin_path();
        surface.move_to(2.0, 10.0);
        surface.arc(10.0, 10.0, 0.0, 0.0, 0.0, false);
        surface.stroke();

        assert_eq!(surface.pixel(2, 10), Some("#000"));
        assert_eq!(surface.pixel(9, 9), Some("#000"));
        assert_eq!(surface.pixel(10, 12), None);
        assert_eq!(surface.pixel(15, 10), None);
    }

    #[test]
    fn test_set_line_width_ignores_invalid() {
        let mut surface = PixelSurface::new(1, 1);
        surface.set_line_width(4.0);
        surface.set_line_width(-1.0);
        surface.set_line_width(f64::NAN);
        assert_eq!(surface.line_width(), 4.0);
    }

    #[test]
    fn test_render_blocks_shape() {
        let mut surface = PixelSurface::new(20, 20);
        surface.set_fill_style("#f00");
        draw_pie(&mut surface, 1.0);

        let view = surface.render_blocks(10);
        let plain = strip_ansi_escapes::strip_str(&view);
        let lines: Vec<&str> = plain.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|l| l.chars().count() == 10));
        assert!(plain.contains('▀'));
    }

    #[test]
    fn test_render_blocks_blank() {
        let surface = PixelSurface::new(8, 8);
        let view = surface.render_blocks(4);
        assert_eq!(view, "    \n    ");
        assert_eq!(surface.render_blocks(0), "");
    }
}
