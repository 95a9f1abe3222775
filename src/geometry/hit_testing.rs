use egui::{Pos2, Rect, Vec2};

pub const HANDLE_HIT_RADIUS: f32 = 15.0;

/// Distance under which a point counts as lying on a polygon edge.
const EDGE_EPSILON: f64 = 1e-4;

/// Distance from `point` to the segment `a`-`b`, computed in f64.
///
/// Canvas coordinates run into the thousands, where f32 rounding alone
/// exceeds `EDGE_EPSILON`.
fn segment_distance(point: Pos2, a: Pos2, b: Pos2) -> f64 {
    let (px, py) = (f64::from(point.x), f64::from(point.y));
    let (ax, ay) = (f64::from(a.x), f64::from(a.y));
    let (dx, dy) = (f64::from(b.x) - ax, f64::from(b.y) - ay);
    let (vx, vy) = (px - ax, py - ay);

    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return vx.hypot(vy);
    }

    let t = (vx * dx + vy * dy) / len_sq;
    if t <= 0.0 {
        vx.hypot(vy)
    } else if t >= 1.0 {
        (px - f64::from(b.x)).hypot(py - f64::from(b.y))
    } else {
        (vx * dy - vy * dx).abs() / len_sq.sqrt()
    }
}

/// True if any vertex lies strictly closer than `radius` to `pos`.
pub fn is_point_near_vertex(pos: Pos2, vertices: &[Pos2], radius: f32) -> bool {
    vertices.iter().any(|v| v.distance(pos) < radius)
}

/// True if `pos` is within grabbing distance of a transform handle.
pub fn is_point_near_handle(pos: Pos2, handle: Pos2) -> bool {
    pos.distance(handle) <= HANDLE_HIT_RADIUS
}

/// Builds a rect from an origin and a possibly negative extent.
///
/// A negative width or height means the shape was dragged left or up from its
/// origin; the resulting rect covers the same area either way.
pub fn normalized_rect(origin: Pos2, size: Vec2) -> Rect {
    Rect::from_two_pos(origin, origin + size)
}

/// Rotates `point` around `origin` by `degrees` (clockwise in screen space).
pub fn rotate_about(point: Pos2, origin: Pos2, degrees: f32) -> Pos2 {
    if degrees == 0.0 {
        return point;
    }
    let (sin, cos) = degrees.to_radians().sin_cos();
    let d = point - origin;
    origin + Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos)
}

/// Containment test for a rect rotated about its origin corner.
pub fn point_in_rotated_rect(pos: Pos2, origin: Pos2, size: Vec2, rotation_degrees: f32) -> bool {
    let local = rotate_about(pos, origin, -rotation_degrees);
    normalized_rect(origin, size).contains(local)
}

pub fn point_on_polygon_boundary(pos: Pos2, polygon: &[Pos2]) -> bool {
    if polygon.is_empty() {
        return false;
    }
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        if segment_distance(pos, polygon[j], polygon[i]) <= EDGE_EPSILON {
            return true;
        }
        j = i;
    }
    false
}

/// Even-odd ray casting. The polygon is implicitly closed.
///
/// Points on an edge or vertex are outside. Edges are half-open in y so a ray
/// passing exactly through a shared vertex is counted once.
pub fn point_in_polygon(pos: Pos2, polygon: &[Pos2]) -> bool {
    if polygon.len() < 3 || point_on_polygon_boundary(pos, polygon) {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (pi, pj) = (polygon[i], polygon[j]);
        if (pi.y > pos.y) != (pj.y > pos.y) {
            let x_cross = (pj.x - pi.x) * (pos.y - pi.y) / (pj.y - pi.y) + pi.x;
            if pos.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    fn square() -> Vec<Pos2> {
        vec![pos2(0.0, 0.0), pos2(10.0, 0.0), pos2(10.0, 10.0), pos2(0.0, 10.0)]
    }

    #[test]
    fn test_point_in_square() {
        assert!(point_in_polygon(pos2(5.0, 5.0), &square()));
        assert!(!point_in_polygon(pos2(15.0, 5.0), &square()));
        assert!(!point_in_polygon(pos2(-1.0, 5.0), &square()));
    }

    #[test]
    fn test_boundary_points_are_outside() {
        let poly = square();
        for p in [
            pos2(0.0, 5.0),
            pos2(10.0, 5.0),
            pos2(5.0, 0.0),
            pos2(5.0, 10.0),
            pos2(0.0, 0.0),
            pos2(10.0, 10.0),
        ] {
            assert!(!point_in_polygon(p, &poly), "{p:?} should be outside");
        }
    }

    #[test]
    fn test_concave_polygon() {
        // U shape opening upwards
        let poly = vec![
            pos2(0.0, 0.0),
            pos2(3.0, 0.0),
            pos2(3.0, 7.0),
            pos2(7.0, 7.0),
            pos2(7.0, 0.0),
            pos2(10.0, 0.0),
            pos2(10.0, 10.0),
            pos2(0.0, 10.0),
        ];
        assert!(point_in_polygon(pos2(1.0, 5.0), &poly));
        assert!(!point_in_polygon(pos2(5.0, 3.0), &poly));
        assert!(point_in_polygon(pos2(5.0, 8.5), &poly));
    }

    #[test]
    fn test_degenerate_polygon() {
        assert!(!point_in_polygon(pos2(0.0, 0.0), &[]));
        assert!(!point_in_polygon(pos2(1.0, 1.0), &[pos2(0.0, 0.0), pos2(2.0, 2.0)]));
    }

    #[test]
    fn test_vertex_radius_is_strict() {
        let vertices = [pos2(0.0, 0.0)];
        assert!(is_point_near_vertex(pos2(9.9, 0.0), &vertices, 10.0));
        assert!(!is_point_near_vertex(pos2(10.0, 0.0), &vertices, 10.0));
    }

    #[test]
    fn test_normalized_rect_negative_width() {
        let rect = normalized_rect(pos2(100.0, 100.0), vec2(-50.0, 40.0));
        assert_eq!(rect.min, pos2(50.0, 100.0));
        assert_eq!(rect.max, pos2(100.0, 140.0));
    }

    #[test]
    fn test_rotated_rect_contains() {
        let origin = pos2(0.0, 0.0);
        let size = vec2(100.0, 10.0);
        assert!(point_in_rotated_rect(pos2(50.0, 5.0), origin, size, 0.0));
        // Rotated 90 degrees clockwise, the strip hangs down the negative x side.
        assert!(point_in_rotated_rect(pos2(-5.0, 50.0), origin, size, 90.0));
        assert!(!point_in_rotated_rect(pos2(50.0, 5.0), origin, size, 90.0));
    }

    #[test]
    fn test_distance_to_degenerate_segment() {
        let d = segment_distance(pos2(3.0, 4.0), pos2(0.0, 0.0), pos2(0.0, 0.0));
        assert!((d - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_diagonal_edge_at_canvas_scale() {
        let (a, b) = (pos2(738.25, 261.75), pos2(2049.75, 1049.25));
        let triangle = [a, b, pos2(738.25, 1049.25)];
        // Every k/64 step along the edge is exactly representable.
        for k in 1..64 {
            let t = k as f32 / 64.0;
            let on_edge = a + (b - a) * t;
            assert!(point_on_polygon_boundary(on_edge, &triangle), "{on_edge:?}");
            assert!(!point_in_polygon(on_edge, &triangle), "{on_edge:?}");
        }

        let (a, b) = (pos2(738.2, 261.8), pos2(2049.8, 1049.2));
        assert!(!point_in_polygon(pos2(1394.0, 655.5), &[a, b, pos2(738.2, 1049.2)]));
        assert!(point_in_polygon(pos2(1300.0, 700.0), &[a, b, pos2(738.2, 1049.2)]));
    }
}
