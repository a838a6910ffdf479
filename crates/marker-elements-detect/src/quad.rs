//! Candidate quadrilaterals and canonical corner ordering.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Four image-space corners.
///
/// Quads produced by [`Quad::ordered`] go clockwise on screen (y down),
/// starting from the corner with the smallest `x + y`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quad {
    pub corners: [Point2<f32>; 4],
}

impl Quad {
    /// Wrap corners as given.
    pub fn new(corners: [Point2<f32>; 4]) -> Self {
        Self { corners }
    }

    /// Wrap corners after putting them in canonical order.
    pub fn ordered(corners: [Point2<f32>; 4]) -> Self {
        Self {
            corners: order_quad(corners),
        }
    }

    pub fn centroid(&self) -> Point2<f32> {
        centroid(&self.corners)
    }

    /// Absolute shoelace area in px².
    pub fn area(&self) -> f32 {
        polygon_area(&self.corners)
    }

    /// Smallest area of the four triangles formed by dropping one corner.
    ///
    /// Near zero when three corners are (almost) collinear.
    pub fn min_corner_triangle_area(&self) -> f32 {
        let c = &self.corners;
        (0..4)
            .map(|skip| {
                let [a, b, d]: [Point2<f32>; 3] = match skip {
                    0 => [c[1], c[2], c[3]],
                    1 => [c[0], c[2], c[3]],
                    2 => [c[0], c[1], c[3]],
                    _ => [c[0], c[1], c[2]],
                };
                0.5 * ((b - a).perp(&(d - a))).abs()
            })
            .fold(f32::INFINITY, f32::min)
    }
}

pub fn centroid(points: &[Point2<f32>]) -> Point2<f32> {
    if points.is_empty() {
        return Point2::origin();
    }
    let n = points.len() as f32;
    let (sx, sy) = points
        .iter()
        .fold((0.0f32, 0.0f32), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point2::new(sx / n, sy / n)
}

/// Absolute area of a closed polygon (shoelace formula).
pub fn polygon_area(points: &[Point2<f32>]) -> f32 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut acc = 0.0f64;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        acc += a.x as f64 * b.y as f64 - b.x as f64 * a.y as f64;
    }
    (0.5 * acc.abs()) as f32
}

/// Order four corners clockwise on screen, starting from the minimum `x + y`.
///
/// Corners are sorted by ascending `atan2(dy, dx)` around their centroid,
/// which is clockwise with y pointing down. The result depends only on the
/// set of points, not on their input order.
pub fn order_quad(corners: [Point2<f32>; 4]) -> [Point2<f32>; 4] {
    let c = centroid(&corners);
    let key = |p: &Point2<f32>| {
        let dx = p.x - c.x;
        let dy = p.y - c.y;
        (dy.atan2(dx), dx * dx + dy * dy)
    };

    let mut sorted = corners;
    sorted.sort_by(|a, b| {
        let (ta, ra) = key(a);
        let (tb, rb) = key(b);
        ta.total_cmp(&tb)
            .then(ra.total_cmp(&rb))
            .then(a.x.total_cmp(&b.x))
            .then(a.y.total_cmp(&b.y))
    });

    let mut start = 0;
    for (i, p) in sorted.iter().enumerate().skip(1) {
        if p.x + p.y < sorted[start].x + sorted[start].y {
            start = i;
        }
    }
    sorted.rotate_left(start);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn pt(x: f32, y: f32) -> Point2<f32> {
        Point2::new(x, y)
    }

    fn permutations(corners: [Point2<f32>; 4]) -> Vec<[Point2<f32>; 4]> {
        let mut out = Vec::new();
        for a in 0..4 {
            for b in 0..4 {
                for c in 0..4 {
                    for d in 0..4 {
                        let idx = [a, b, c, d];
                        let mut seen = [false; 4];
                        if idx.iter().all(|&i| !std::mem::replace(&mut seen[i], true)) {
                            out.push([corners[a], corners[b], corners[c], corners[d]]);
                        }
                    }
                }
            }
        }
        out
    }

    #[test]
    fn axis_aligned_square_orders_tl_tr_br_bl() {
        let ordered = order_quad([pt(10., 90.), pt(90., 10.), pt(10., 10.), pt(90., 90.)]);
        assert_eq!(ordered, [pt(10., 10.), pt(90., 10.), pt(90., 90.), pt(10., 90.)]);
    }

    #[test]
    fn ordering_ignores_input_permutation() {
        let shapes = [
            [pt(10., 10.), pt(90., 12.), pt(95., 88.), pt(8., 80.)],
            // diamond: two corners tie on x + y
            [pt(5., 0.), pt(10., 5.), pt(5., 10.), pt(0., 5.)],
            [pt(120., 40.), pt(300., 20.), pt(330., 260.), pt(100., 200.)],
        ];
        for shape in shapes {
            let expected = order_quad(shape);
            for perm in permutations(shape) {
                assert_eq!(order_quad(perm), expected);
            }
        }
    }

    #[test]
    fn diamond_starts_at_first_tie_in_clockwise_order() {
        let ordered = order_quad([pt(0., 5.), pt(5., 10.), pt(10., 5.), pt(5., 0.)]);
        assert_eq!(ordered, [pt(5., 0.), pt(10., 5.), pt(5., 10.), pt(0., 5.)]);
    }

    #[test]
    fn area_and_centroid_of_rectangle() {
        let q = Quad::ordered([pt(0., 0.), pt(70., 0.), pt(70., 100.), pt(0., 100.)]);
        assert_abs_diff_eq!(q.area(), 7000.0, epsilon = 1e-3);
        assert_abs_diff_eq!(q.centroid().x, 35.0, epsilon = 1e-5);
        assert_abs_diff_eq!(q.centroid().y, 50.0, epsilon = 1e-5);
    }

    #[test]
    fn collinear_corners_have_zero_triangle_area() {
        let q = Quad::new([pt(0., 0.), pt(50., 0.), pt(100., 0.), pt(50., 80.)]);
        assert!(q.min_corner_triangle_area() < 1e-3);

        let square = Quad::new([pt(0., 0.), pt(10., 0.), pt(10., 10.), pt(0., 10.)]);
        assert_abs_diff_eq!(square.min_corner_triangle_area(), 50.0, epsilon = 1e-4);
    }
}
