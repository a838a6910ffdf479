//! Perspective rectification of a candidate quad into a square patch.

use nalgebra::Point2;

use marker_elements_core::{
    homography_from_4pt, warp_perspective_gray_into, GrayImage, GrayImageView, Homography,
};

use crate::binarize::binarize_otsu_into;
use crate::quad::Quad;

/// Quads whose smallest corner triangle is below this area (px²) are treated
/// as collinear.
pub const MIN_CORNER_TRIANGLE_AREA: f32 = 1.0;

/// Maps ordered quads onto an `S × S` patch.
///
/// Destination corners are `(0,0)`, `(S-1,0)`, `(S-1,S-1)`, `(0,S-1)`, paired
/// with the quad corners in canonical order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rectifier {
    size: usize,
    dst: [Point2<f32>; 4],
}

impl Rectifier {
    pub fn new(size: usize) -> Self {
        let s = size.saturating_sub(1) as f32;
        Self {
            size,
            dst: [
                Point2::new(0.0, 0.0),
                Point2::new(s, 0.0),
                Point2::new(s, s),
                Point2::new(0.0, s),
            ],
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn patch_corners(&self) -> &[Point2<f32>; 4] {
        &self.dst
    }

    /// Homography taking patch coordinates to image coordinates.
    ///
    /// `None` for degenerate quads: nearly collinear corners or a singular
    /// solve.
    pub fn image_from_patch(&self, quad: &Quad) -> Option<Homography> {
        if quad.min_corner_triangle_area() < MIN_CORNER_TRIANGLE_AREA {
            return None;
        }
        homography_from_4pt(&self.dst, &quad.corners)
    }

    /// Warp `quad` out of `gray` into `warped`, then Otsu-binarize the patch
    /// into `warped_binary`.
    ///
    /// Returns the image-from-patch homography, or `None` (buffers untouched)
    /// when the quad is degenerate.
    pub fn rectify_into(
        &self,
        gray: &GrayImageView<'_>,
        quad: &Quad,
        warped: &mut GrayImage,
        warped_binary: &mut GrayImage,
    ) -> Option<Homography> {
        let h = self.image_from_patch(quad)?;
        warp_perspective_gray_into(gray, &h, self.size, self.size, warped);
        let t = binarize_otsu_into(warped, warped_binary);
        log::trace!("rectified patch threshold {t}");
        Some(h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn pt(x: f32, y: f32) -> Point2<f32> {
        Point2::new(x, y)
    }

    #[test]
    fn homography_maps_patch_corners_to_quad() {
        let quad = Quad::ordered([pt(100., 80.), pt(260., 90.), pt(250., 240.), pt(95., 230.)]);
        let r = Rectifier::new(300);
        let h = r.image_from_patch(&quad).expect("homography");
        for (p, q) in r.patch_corners().iter().zip(quad.corners.iter()) {
            let m = h.apply(*p);
            assert_abs_diff_eq!(m.x, q.x, epsilon = 1e-2);
            assert_abs_diff_eq!(m.y, q.y, epsilon = 1e-2);
        }
    }

    #[test]
    fn collinear_quad_is_rejected() {
        let quad = Quad::new([pt(0., 0.), pt(100., 0.), pt(200., 0.), pt(100., 150.)]);
        assert!(Rectifier::new(300).image_from_patch(&quad).is_none());
    }

    #[test]
    fn rectified_patch_is_binarized() {
        // left half dark, right half bright
        let mut gray = GrayImage::new(100, 100);
        for y in 0..100 {
            for x in 0..100 {
                gray.data[y * 100 + x] = if x < 50 { 20 } else { 220 };
            }
        }
        let quad = Quad::ordered([pt(10., 10.), pt(89., 10.), pt(89., 89.), pt(10., 89.)]);
        let r = Rectifier::new(80);
        let mut warped = GrayImage::default();
        let mut binary = GrayImage::default();
        r.rectify_into(&gray.view(), &quad, &mut warped, &mut binary)
            .expect("rectified");

        assert_eq!((warped.width, warped.height), (80, 80));
        assert_eq!(binary.get(5, 40), 0);
        assert_eq!(binary.get(75, 40), 255);
    }
}
