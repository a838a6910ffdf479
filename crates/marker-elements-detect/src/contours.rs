//! Quadrilateral candidates from a binary image.
//!
//! Dark (off) pixels are the foreground: a marker's black border encloses a
//! dark connected component whose outer boundary is the marker outline.
//! Boundaries come from `imageproc`'s border following and are simplified
//! with a closed Douglas-Peucker pass.

use imageproc::contours::{find_contours, BorderType};
use nalgebra::Point2;

use marker_elements_core::GrayImage;

use crate::binarize::BINARY_OFF;
use crate::quad::{polygon_area, Quad};

/// Turns a binary image into 4-vertex candidates, in discovery order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContourExtractor {
    /// Simplification tolerance in pixels.
    pub epsilon: f32,
    /// Candidates with a smaller polygon area are dropped.
    pub min_area: f32,
}

impl ContourExtractor {
    pub fn new(epsilon: f32, min_area: f32) -> Self {
        Self { epsilon, min_area }
    }

    /// Append every accepted quad of `binary` to `out`.
    ///
    /// Outer borders come first in raster discovery order, then hole
    /// borders in the same order. Boundaries touching the image edge are
    /// skipped: they belong to the background or a cut-off marker.
    ///
    /// `mask` is scratch space for the foreground mask handed to the border
    /// follower; it is reallocated only when the frame size changes.
    pub fn extract_into(
        &self,
        binary: &GrayImage,
        mask: &mut image::GrayImage,
        out: &mut Vec<Quad>,
    ) {
        foreground_mask_into(binary, mask);
        let (w, h) = (binary.width as i32, binary.height as i32);
        let mut holes = Vec::new();
        for contour in find_contours::<i32>(mask) {
            if contour
                .points
                .iter()
                .any(|p| p.x <= 0 || p.y <= 0 || p.x >= w - 1 || p.y >= h - 1)
            {
                continue;
            }
            let Some(quad) = self.accept(&contour.points) else {
                continue;
            };
            match contour.border_type {
                BorderType::Outer => out.push(quad),
                BorderType::Hole => holes.push(quad),
            }
        }
        out.append(&mut holes);
    }

    fn accept(&self, border: &[imageproc::point::Point<i32>]) -> Option<Quad> {
        let points: Vec<Point2<f32>> = border
            .iter()
            .map(|p| Point2::new(p.x as f32, p.y as f32))
            .collect();
        let poly = approximate_closed_polygon(&points, self.epsilon);
        if poly.len() != 4 {
            return None;
        }
        let area = polygon_area(&poly);
        if area < self.min_area {
            log::trace!("dropping quad with area {area:.1}");
            return None;
        }
        Some(Quad::new([poly[0], poly[1], poly[2], poly[3]]))
    }

    pub fn extract(&self, binary: &GrayImage) -> Vec<Quad> {
        let mut mask = image::GrayImage::new(0, 0);
        let mut out = Vec::new();
        self.extract_into(binary, &mut mask, &mut out);
        out
    }
}

/// `255` where `binary` is off, `0` elsewhere.
fn foreground_mask_into(binary: &GrayImage, mask: &mut image::GrayImage) {
    let (w, h) = (binary.width as u32, binary.height as u32);
    if mask.dimensions() != (w, h) {
        *mask = image::GrayImage::new(w, h);
    }
    for (m, &b) in mask.iter_mut().zip(binary.data.iter()) {
        *m = if b == BINARY_OFF { 255 } else { 0 };
    }
}

/// Simplify a closed contour so no dropped point is farther than `epsilon`
/// from the kept outline.
///
/// The ring is split at point 0 and the point farthest from it; each half is
/// simplified independently. Point 0 is then dropped if it lies on the line
/// through its kept neighbours.
pub fn approximate_closed_polygon(points: &[Point2<f32>], epsilon: f32) -> Vec<Point2<f32>> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let first = points[0];
    let (far, far_d2) = points
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, p)| (i, (*p - first).norm_squared()))
        .fold((0, -1.0f32), |best, cur| if cur.1 > best.1 { cur } else { best });
    if far_d2 <= 0.0 {
        return vec![first];
    }

    let head = &points[..=far];
    let mut tail: Vec<Point2<f32>> = points[far..].to_vec();
    tail.push(first);

    let keep_head = douglas_peucker(head, epsilon);
    let keep_tail = douglas_peucker(&tail, epsilon);

    let mut out: Vec<Point2<f32>> = Vec::new();
    out.extend(head.iter().zip(&keep_head).filter(|(_, k)| **k).map(|(p, _)| *p));
    out.pop();
    let tail_open = &tail[..tail.len() - 1];
    out.extend(tail_open.iter().zip(&keep_tail).filter(|(_, k)| **k).map(|(p, _)| *p));

    if out.len() > 3 {
        let prev = out[out.len() - 1];
        let next = out[1];
        if distance_to_line(out[0], prev, next) <= epsilon {
            out.remove(0);
        }
    }
    out
}

/// Open-chain Douglas-Peucker; endpoints are always kept.
fn douglas_peucker(chain: &[Point2<f32>], epsilon: f32) -> Vec<bool> {
    let mut keep = vec![false; chain.len()];
    if chain.is_empty() {
        return keep;
    }
    let last = chain.len() - 1;
    keep[0] = true;
    keep[last] = true;

    let mut stack = vec![(0usize, last)];
    while let Some((a, b)) = stack.pop() {
        if b <= a + 1 {
            continue;
        }
        let (k, d) = (a + 1..b)
            .map(|i| (i, distance_to_line(chain[i], chain[a], chain[b])))
            .fold((a, -1.0f32), |best, cur| if cur.1 > best.1 { cur } else { best });
        if d > epsilon {
            keep[k] = true;
            stack.push((a, k));
            stack.push((k, b));
        }
    }
    keep
}

/// Perpendicular distance from `p` to the line through `a` and `b`, or the
/// distance to `a` when the two coincide.
fn distance_to_line(p: Point2<f32>, a: Point2<f32>, b: Point2<f32>) -> f32 {
    let ab = b - a;
    let len = ab.norm();
    if len <= f32::EPSILON {
        return (p - a).norm();
    }
    ab.perp(&(p - a)).abs() / len
}
