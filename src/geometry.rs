//! Arc geometry for the countdown pie.
//!
//! Angles follow the on-screen convention used by canvas-style surfaces:
//! 0° points to 3 o'clock and angles grow clockwise because the y axis points
//! down. The pie starts at 12 o'clock (270°) and its end angle moves around
//! the circle as the remaining ratio shrinks.
//!
//! # Examples
//!
//! ```rust
//! use bubbletea_countdown::geometry::{arc_for_ratio, radians};
//!
//! let arc = arc_for_ratio(1.0, 300, 3.0);
//! assert_eq!(arc.center, (150.0, 150.0));
//! assert_eq!(arc.radius, 147.0);
//! assert_eq!(arc.start_angle, radians(270.0));
//! assert_eq!(arc.end_angle, radians(270.01));
//! assert!(arc.anticlockwise);
//! ```

use std::f64::consts::PI;

/// Fixed start angle of the pie, in degrees (12 o'clock).
pub const START_ANGLE_DEG: f64 = 270.0;

/// Offset added to the end angle so start and end never coincide.
///
/// Without it a full pie (`ratio == 1`) would have identical start and end
/// angles, which arc primitives render either as a full circle or as nothing.
pub const END_ANGLE_EPSILON_DEG: f64 = 0.01;

/// Converts degrees to radians.
pub fn radians(deg: f64) -> f64 {
    (PI / 180.0) * deg
}

/// A pie slice ready to be handed to [`Surface::arc`](crate::surface::Surface::arc).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    /// Center of the circle, in surface pixels.
    pub center: (f64, f64),
    /// Radius, already inset by the border width.
    pub radius: f64,
    /// Start angle in radians.
    pub start_angle: f64,
    /// End angle in radians.
    pub end_angle: f64,
    /// Winding passed to the arc primitive. Always `true` for the countdown.
    pub anticlockwise: bool,
}

/// End angle in degrees for the given remaining ratio.
pub fn end_angle_deg(ratio: f64) -> f64 {
    360.0 * (1.0 - ratio) + START_ANGLE_DEG + END_ANGLE_EPSILON_DEG
}

/// Computes the pie slice for `ratio` on a `size`×`size` surface.
///
/// The result depends only on its arguments. A `ratio` of 1 is a full disc
/// (minus a 0.01° sliver) and the slice shrinks clockwise toward 0. The ratio
/// is not clamped; callers pass values in `[0, 1]`.
pub fn arc_for_ratio(ratio: f64, size: u32, border_width: f64) -> Arc {
    let r = f64::from(size) / 2.0;
    Arc {
        center: (r, r),
        radius: r - border_width,
        start_angle: radians(START_ANGLE_DEG),
        end_angle: radians(end_angle_deg(ratio)),
        anticlockwise: true,
    }
}

/// Angle actually swept by an arc primitive, in radians, following the
/// canvas rules: a sweep of a full turn or more draws the whole circle,
/// anything else is normalised into `[0, 2π)`.
pub fn swept_angle(start_angle: f64, end_angle: f64, anticlockwise: bool) -> f64 {
    let tau = 2.0 * PI;
    let raw = if anticlockwise {
        start_angle - end_angle
    } else {
        end_angle - start_angle
    };
    if raw >= tau {
        tau
    } else {
        raw.rem_euclid(tau)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_radians() {
        assert!(close(radians(180.0), PI));
        assert!(close(radians(90.0), PI / 2.0));
        assert_eq!(radians(0.0), 0.0);
    }

    #[test]
    fn test_angles_for_ratios() {
        for ratio in [0.0, 0.1, 0.25, 0.5, 0.75, 0.9, 1.0] {
            let arc = arc_for_ratio(ratio, 300, 3.0);
            assert_eq!(arc.start_angle, radians(270.0));
            assert!(
                close(arc.end_angle, radians(360.0 * (1.0 - ratio) + 270.01)),
                "ratio {ratio} gave end angle {}",
                arc.end_angle
            );
        }
    }

    #[test]
    fn test_center_and_radius_are_inset_by_border() {
        let arc = arc_for_ratio(0.5, 100, 10.0);
        assert_eq!(arc.center, (50.0, 50.0));
        assert_eq!(arc.radius, 40.0);
    }

    #[test]
    fn test_full_and_empty_are_almost_complete_circles() {
        // Both ends of the range leave a 0.01° gap rather than collapsing.
        let full = arc_for_ratio(1.0, 300, 3.0);
        let idle = arc_for_ratio(0.0, 300, 3.0);
        let expected = radians(360.0 - 0.01);
        assert!(close(
            swept_angle(full.start_angle, full.end_angle, true),
            expected
        ));
        assert!(close(
            swept_angle(idle.start_angle, idle.end_angle, true),
            expected
        ));
    }

    #[test]
    fn test_sweep_shrinks_with_ratio() {
        let half = arc_for_ratio(0.5, 300, 3.0);
        let sweep = swept_angle(half.start_angle, half.end_angle, true);
        assert!(close(sweep, radians(180.0 - 0.01)));

        let sliver = arc_for_ratio(0.01, 300, 3.0);
        let sweep = swept_angle(sliver.start_angle, sliver.end_angle, true);
        assert!(sweep < radians(4.0));
    }

    #[test]
    fn test_swept_angle_full_turn() {
        assert!(close(swept_angle(0.0, 2.0 * PI, false), 2.0 * PI));
        assert!(close(swept_angle(2.0 * PI, 0.0, true), 2.0 * PI));
        assert_eq!(swept_angle(1.0, 1.0, true), 0.0);
    }
}
