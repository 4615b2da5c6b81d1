use std::f32::consts::{FRAC_PI_2, TAU};
use tiny_skia::{Path, PathBuilder};

// ---------------------------------------------------------------------------
// Ring metrics
// ---------------------------------------------------------------------------

/// Per-ring width fractions of the usable radius (half extent minus margin),
/// indexed outermost-first. Each table sums to 1.0 so the innermost ring
/// (the champion medallion) always bottoms out at radius zero.
///
/// Two tables because proportions tuned for 7 rings look cramped on a
/// 6-ring (32-entry) bracket.
const RING_WIDTHS_7: [f32; 7] = [0.13, 0.13, 0.13, 0.13, 0.13, 0.13, 0.22];
const RING_WIDTHS_6: [f32; 6] = [0.15, 0.15, 0.15, 0.15, 0.15, 0.25];

fn ring_width_fraction(round: u32, num_rounds: u32) -> f32 {
    let i = round.saturating_sub(1) as usize;
    match num_rounds {
        7 => RING_WIDTHS_7[i.min(6)],
        6 => RING_WIDTHS_6[i.min(5)],
        // Tiny historical brackets: evenly split rings.
        n => 1.0 / (n.max(1) as f32),
    }
}

/// Outer and inner radius of the ring for `round` (1-based). The outer
/// radius shrinks monotonically with the round number; the innermost
/// round's inner radius is 0.
pub fn radii_for_round(round: u32, num_rounds: u32, half_extent: f32, margin: f32) -> (f32, f32) {
    let usable = (half_extent - margin).max(0.0);
    let mut consumed = 0.0;
    for r in 1..round {
        consumed += ring_width_fraction(r, num_rounds);
    }
    let outer = usable * (1.0 - consumed).max(0.0);
    let inner = usable * (1.0 - consumed - ring_width_fraction(round, num_rounds)).max(0.0);
    (outer, inner)
}

/// Start/end angle of a slot's wedge. Angle 0 is the +x axis; y grows
/// downward, so quadrant 0 is the bottom-right corner of the circle.
pub fn slot_angles(total_slots: u32, slot: u32) -> (f32, f32) {
    let step = TAU / total_slots as f32;
    (step * slot as f32, step * (slot + 1) as f32)
}

// ---------------------------------------------------------------------------
// Artwork placement
// ---------------------------------------------------------------------------

/// Axis-aligned placement box for a slot's artwork, in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageBox {
    pub x: i32,
    pub y: i32,
    pub max_width: u32,
    pub max_height: u32,
}

/// Bounding box for the annular wedge spanning `[slot/total, (slot+1)/total]`
/// of a full turn between `inner` and `outer`.
///
/// The corner coordinates come from different radius / min-max combinations
/// depending on which quadrant of the circle the wedge's midpoint falls in;
/// there is no uniform formula. Coordinates floor to integer pixels.
pub fn wedge_bounds(
    outer: f32,
    inner: f32,
    center_x: f32,
    center_y: f32,
    total_slots: u32,
    slot: u32,
) -> ImageBox {
    let (t1, t2) = slot_angles(total_slots, slot);
    let midpoint = (slot as f32 + 0.5) / total_slots as f32;

    let (x1_radius, y1_radius, x2_radius, y2_radius) = if midpoint < 0.25 {
        (inner, inner, outer, outer)
    } else if midpoint < 0.5 {
        (outer, inner, inner, outer)
    } else if midpoint < 0.75 {
        (outer, outer, inner, inner)
    } else {
        (inner, outer, outer, inner)
    };

    // Corner angles plus any quarter-turn extremum inside the arc, so a
    // wedge spanning more than one quadrant (the two championship halves)
    // still gets a usable box instead of a degenerate one.
    let mut angles = [t1, t2, f32::NAN, f32::NAN];
    let mut count = 2;
    let mut axis = (t1 / FRAC_PI_2).floor() * FRAC_PI_2 + FRAC_PI_2;
    while axis < t2 && count < angles.len() {
        if axis > t1 {
            angles[count] = axis;
            count += 1;
        }
        axis += FRAC_PI_2;
    }
    let angles = &angles[..count];

    let fold = |radius: f32, trig: fn(f32) -> f32, pick: fn(f32, f32) -> f32| {
        angles
            .iter()
            .map(|&a| radius * trig(a))
            .fold(radius * trig(t1), pick)
    };

    let x1 = (fold(x1_radius, f32::cos, f32::min) + center_x).floor() as i32;
    let y1 = (fold(y1_radius, f32::sin, f32::min) + center_y).floor() as i32;
    let x2 = (fold(x2_radius, f32::cos, f32::max) + center_x).floor() as i32;
    let y2 = (fold(y2_radius, f32::sin, f32::max) + center_y).floor() as i32;

    ImageBox {
        x: x1,
        y: y1,
        max_width: (x2 - x1).unsigned_abs(),
        max_height: (y2 - y1).unsigned_abs(),
    }
}

/// Uniform aspect-preserving scale so the image fits `(max_w, max_h)`,
/// floored to integer pixels.
pub fn scale_to_fit(width: u32, height: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    let largest = width.max(height);
    if largest == 0 {
        return (0, 0);
    }
    let scale = max_w.min(max_h) as f32 / largest as f32;
    (
        (width as f32 * scale).floor() as u32,
        (height as f32 * scale).floor() as u32,
    )
}

// ---------------------------------------------------------------------------
// Path construction
// ---------------------------------------------------------------------------

/// Append a circular arc from `start_angle` to `end_angle` as cubic Bézier
/// segments of at most a quarter turn each. The builder's current point must
/// already sit on the circle at `start_angle`.
fn push_arc(pb: &mut PathBuilder, cx: f32, cy: f32, radius: f32, start_angle: f32, end_angle: f32) {
    let sweep = end_angle - start_angle;
    let segments = (sweep.abs() / FRAC_PI_2).ceil().max(1.0) as u32;
    let step = sweep / segments as f32;

    let mut a0 = start_angle;
    for _ in 0..segments {
        let a1 = a0 + step;
        // 4/3 * tan(step/4) puts the control points on the tangents.
        let k = 4.0 / 3.0 * (step / 4.0).tan();

        let (sin0, cos0) = a0.sin_cos();
        let (sin1, cos1) = a1.sin_cos();
        let x0 = cx + radius * cos0;
        let y0 = cy + radius * sin0;
        let x1 = cx + radius * cos1;
        let y1 = cy + radius * sin1;

        pb.cubic_to(
            x0 - k * radius * sin0,
            y0 + k * radius * cos0,
            x1 + k * radius * sin1,
            y1 - k * radius * cos1,
            x1,
            y1,
        );
        a0 = a1;
    }
}

/// Closed wedge outline: outer arc forward, inner arc back. A zero inner
/// radius collapses the inner arc to the center point (champion ring).
pub fn wedge_path(
    center_x: f32,
    center_y: f32,
    outer: f32,
    inner: f32,
    start_angle: f32,
    end_angle: f32,
) -> Option<Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(
        center_x + outer * start_angle.cos(),
        center_y + outer * start_angle.sin(),
    );
    push_arc(&mut pb, center_x, center_y, outer, start_angle, end_angle);

    if inner > 0.5 {
        pb.line_to(
            center_x + inner * end_angle.cos(),
            center_y + inner * end_angle.sin(),
        );
        push_arc(&mut pb, center_x, center_y, inner, end_angle, start_angle);
    } else {
        pb.line_to(center_x, center_y);
    }

    pb.close();
    pb.finish()
}

pub fn circle_path(center_x: f32, center_y: f32, radius: f32) -> Option<Path> {
    let mut pb = PathBuilder::new();
    pb.push_circle(center_x, center_y, radius);
    pb.finish()
}

/// Radial boundary line between two slots, from the ring's outer edge to its
/// inner edge.
pub fn radial_line_path(
    center_x: f32,
    center_y: f32,
    outer: f32,
    inner: f32,
    angle: f32,
) -> Option<Path> {
    let (sin, cos) = angle.sin_cos();
    let mut pb = PathBuilder::new();
    pb.move_to(center_x + outer * cos, center_y + outer * sin);
    pb.line_to(center_x + inner * cos, center_y + inner * sin);
    pb.finish()
}

// ---------------------------------------------------------------------------
// Containment
// ---------------------------------------------------------------------------

/// Analytic point-in-wedge test: radius within [inner, outer] and angle
/// within the wedge's arc (handles wrap past a full turn).
pub fn point_in_wedge(
    px: f32,
    py: f32,
    center_x: f32,
    center_y: f32,
    outer: f32,
    inner: f32,
    start_angle: f32,
    end_angle: f32,
) -> bool {
    let dx = px - center_x;
    let dy = py - center_y;
    let dist_sq = dx * dx + dy * dy;
    if dist_sq < inner * inner || dist_sq > outer * outer {
        return false;
    }
    let sweep = (end_angle - start_angle).rem_euclid(TAU);
    let offset = (dy.atan2(dx) - start_angle).rem_euclid(TAU);
    offset <= sweep
}

pub fn point_in_disc(px: f32, py: f32, center_x: f32, center_y: f32, radius: f32) -> bool {
    let dx = px - center_x;
    let dy = py - center_y;
    dx * dx + dy * dy <= radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    const HALF: f32 = 800.0;
    const MARGIN: f32 = 10.0;

    #[test]
    fn ring_width_tables_sum_to_one() {
        assert!((RING_WIDTHS_7.iter().sum::<f32>() - 1.0).abs() < 1e-6);
        assert!((RING_WIDTHS_6.iter().sum::<f32>() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn radii_strictly_decrease_with_round() {
        for num_rounds in [6u32, 7] {
            let mut previous = f32::MAX;
            for round in 1..=num_rounds {
                let (outer, inner) = radii_for_round(round, num_rounds, HALF, MARGIN);
                assert!(outer < previous, "round {round}: outer {outer} not decreasing");
                assert!(inner < outer);
                previous = outer;
            }
        }
    }

    #[test]
    fn innermost_ring_reaches_center() {
        for num_rounds in [6u32, 7] {
            let (_, inner) = radii_for_round(num_rounds, num_rounds, HALF, MARGIN);
            assert!(inner.abs() < 1e-3, "inner radius {inner} should be 0");
        }
    }

    #[test]
    fn adjacent_rings_share_a_boundary() {
        for round in 1..7u32 {
            let (_, inner) = radii_for_round(round, 7, HALF, MARGIN);
            let (outer_next, _) = radii_for_round(round + 1, 7, HALF, MARGIN);
            assert!((inner - outer_next).abs() < 1e-3);
        }
    }

    #[test]
    fn outermost_ring_respects_margin() {
        let (outer, _) = radii_for_round(1, 7, HALF, MARGIN);
        assert!((outer - (HALF - MARGIN)).abs() < 1e-3);
    }

    /// Sample the wedge outline and check every sample lands inside the
    /// computed box, for a wedge wholly inside each of the four quadrants.
    #[test]
    fn wedge_bounds_contain_interior_wedges_in_all_quadrants() {
        let (outer, inner, cx, cy) = (300.0f32, 200.0f32, 400.0f32, 400.0f32);
        // slots=8: slots 1, 3, 5, 7 sit strictly inside quadrants 0..=3.
        for slot in [1u32, 3, 5, 7] {
            let bounds = wedge_bounds(outer, inner, cx, cy, 8, slot);
            let (t1, t2) = slot_angles(8, slot);
            for i in 0..=16 {
                let t = t1 + (t2 - t1) * i as f32 / 16.0;
                for r in [inner, outer] {
                    let x = cx + r * t.cos();
                    let y = cy + r * t.sin();
                    assert!(
                        x >= bounds.x as f32 - 1.0
                            && x <= (bounds.x + bounds.max_width as i32) as f32 + 1.0,
                        "slot {slot}: x {x} outside {bounds:?}"
                    );
                    assert!(
                        y >= bounds.y as f32 - 1.0
                            && y <= (bounds.y + bounds.max_height as i32) as f32 + 1.0,
                        "slot {slot}: y {y} outside {bounds:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn wedge_bounds_quadrant_branches_differ() {
        let boxes: Vec<ImageBox> = [1u32, 3, 5, 7]
            .iter()
            .map(|&slot| wedge_bounds(300.0, 200.0, 400.0, 400.0, 8, slot))
            .collect();
        // Mirror symmetry: quadrant 0 and 2 boxes match in size (to a pixel
        // of floor jitter), as do 1 and 3.
        assert!((boxes[0].max_width as i64 - boxes[2].max_width as i64).abs() <= 2);
        assert!((boxes[1].max_height as i64 - boxes[3].max_height as i64).abs() <= 2);
        // But their anchors sit in different corners of the circle.
        assert!(boxes[0].x > boxes[2].x);
        assert!(boxes[1].x < boxes[3].x);
    }

    /// A wedge straddling the 90° quadrant boundary classifies by its
    /// midpoint and still yields a usable, non-degenerate box.
    #[test]
    fn wedge_bounds_handle_quadrant_straddle() {
        // slots=6, slot=1 spans 60°..120°, midpoint 90° → quadrant 1 branch.
        let bounds = wedge_bounds(100.0, 50.0, 200.0, 200.0, 6, 1);
        assert!(bounds.max_width > 0 && bounds.max_height > 0);
        // Quadrant 1 branch: x extremes from the outer radius at t1/t2.
        assert!((bounds.x - 150).abs() <= 1, "{bounds:?}");
        // y spans from inner edge toward the bottom of the circle.
        assert!(bounds.y >= 243 && bounds.y <= 244, "{bounds:?}");
    }

    /// The championship ring has two half-circle wedges; their boundary
    /// angles both sit on the x axis, so the box must pick up the vertical
    /// extremum mid-arc.
    #[test]
    fn wedge_bounds_of_half_circles_are_not_degenerate() {
        let bottom = wedge_bounds(66.0, 41.0, 200.0, 200.0, 2, 0);
        assert!(bottom.max_height >= 60, "{bottom:?}");
        let top = wedge_bounds(66.0, 41.0, 200.0, 200.0, 2, 1);
        assert!(top.max_height >= 60, "{top:?}");
        assert!(top.y < 200 && bottom.y + bottom.max_height as i32 > 200);
    }

    #[test]
    fn scale_to_fit_preserves_aspect_and_bounds() {
        let (w, h) = scale_to_fit(400, 100, 50, 80);
        assert!(w <= 50 && h <= 80);
        assert!((w as f32 / h as f32 - 4.0).abs() < 0.2);

        let (w, h) = scale_to_fit(100, 400, 50, 80);
        assert!(w <= 50 && h <= 80);

        // Larger dimension exactly fills the smaller bound.
        let (w, _) = scale_to_fit(200, 100, 60, 90);
        assert_eq!(w, 60);
    }

    #[test]
    fn scale_to_fit_zero_input_is_zero() {
        assert_eq!(scale_to_fit(0, 0, 100, 100), (0, 0));
    }

    #[test]
    fn wedge_path_closes_for_zero_inner_radius() {
        let path = wedge_path(100.0, 100.0, 50.0, 0.0, 0.0, std::f32::consts::PI).unwrap();
        let b = path.bounds();
        assert!(b.width() > 90.0 && b.height() > 40.0);
    }

    #[test]
    fn point_in_wedge_checks_radius_and_angle() {
        let (cx, cy, outer, inner) = (0.0, 0.0, 100.0, 50.0);
        // Wedge covering quadrant 0 (bottom-right, y-down).
        let (a0, a1) = (0.0, FRAC_PI_2);
        assert!(point_in_wedge(70.0, 20.0, cx, cy, outer, inner, a0, a1));
        // Inside the hole.
        assert!(!point_in_wedge(20.0, 20.0, cx, cy, outer, inner, a0, a1));
        // Right radius, wrong angle.
        assert!(!point_in_wedge(-70.0, 20.0, cx, cy, outer, inner, a0, a1));
        // Beyond the outer edge.
        assert!(!point_in_wedge(95.0, 95.0, cx, cy, outer, inner, a0, a1));
    }

    #[test]
    fn point_in_wedge_handles_wrap_past_full_turn() {
        // Wedge from 315° to 405° crosses the 0° seam.
        let a0 = TAU * 7.0 / 8.0;
        let a1 = TAU * 9.0 / 8.0;
        assert!(point_in_wedge(70.0, 0.0, 0.0, 0.0, 100.0, 50.0, a0, a1));
        assert!(!point_in_wedge(0.0, 70.0, 0.0, 0.0, 100.0, 50.0, a0, a1));
    }

    #[test]
    fn point_in_disc_boundary() {
        assert!(point_in_disc(3.0, 4.0, 0.0, 0.0, 5.0));
        assert!(!point_in_disc(3.1, 4.1, 0.0, 0.0, 5.0));
    }
}
