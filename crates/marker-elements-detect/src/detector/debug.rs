//! Per-stage images of the last processed frame.

use std::path::Path;

use image::{DynamicImage, Luma, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

use marker_elements_core::{GrayImage, RgbaFrame};

use super::workspace::FrameWorkspace;
use crate::quad::Quad;
use crate::sample::GridSampler;

const CANDIDATE_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const MATCH_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const GRID_LINE_COLOR: Rgb<u8> = Rgb([0, 128, 255]);
const CELL_ON_COLOR: Rgb<u8> = Rgb([0, 200, 0]);
const CELL_OFF_COLOR: Rgb<u8> = Rgb([200, 0, 0]);

/// Intermediate images for one frame.
#[derive(Clone, Debug)]
pub struct DebugImages {
    pub grayscale: image::GrayImage,
    pub threshold: image::GrayImage,
    /// Color frame with every accepted candidate outlined.
    pub contours: RgbImage,
    /// Binarized rectified patch; black when there was no usable quad.
    pub warped: image::GrayImage,
    /// Patch with cell boundaries and per-cell on/off markers.
    pub grid: RgbImage,
    /// Color frame with the matched quad outlined.
    pub annotated: RgbImage,
}

impl DebugImages {
    /// Stage name and image, in pipeline order.
    pub fn stages(&self) -> Vec<(&'static str, DynamicImage)> {
        vec![
            ("grayscale", DynamicImage::ImageLuma8(self.grayscale.clone())),
            ("threshold", DynamicImage::ImageLuma8(self.threshold.clone())),
            ("contours", DynamicImage::ImageRgb8(self.contours.clone())),
            ("warped", DynamicImage::ImageLuma8(self.warped.clone())),
            ("grid", DynamicImage::ImageRgb8(self.grid.clone())),
            ("annotated", DynamicImage::ImageRgb8(self.annotated.clone())),
        ]
    }

    /// Write `<stem>_<stage>.png` files into `dir`.
    pub fn save_pngs(&self, dir: &Path, stem: &str) -> image::ImageResult<()> {
        for (name, img) in self.stages() {
            img.save(dir.join(format!("{stem}_{name}.png")))?;
        }
        Ok(())
    }
}

pub(crate) fn build_debug_images(
    frame: &RgbaFrame<'_>,
    ws: &FrameWorkspace,
    sampler: &GridSampler,
    matched: Option<&Quad>,
) -> DebugImages {
    let color = color_frame(frame);

    let mut contours = color.clone();
    for quad in &ws.candidates {
        draw_quad(&mut contours, quad, CANDIDATE_COLOR);
    }

    let mut annotated = color;
    if let Some(quad) = matched {
        draw_quad(&mut annotated, quad, MATCH_COLOR);
        let c = quad.corners[0];
        draw_filled_rect_mut(
            &mut annotated,
            Rect::at(c.x as i32 - 3, c.y as i32 - 3).of_size(7, 7),
            MATCH_COLOR,
        );
    }

    DebugImages {
        grayscale: to_image(&ws.gray),
        threshold: to_image(&ws.binary),
        contours,
        warped: to_image(&ws.warped_binary),
        grid: grid_overlay(&ws.warped_binary, sampler, ws.grid.is_some()),
        annotated,
    }
}

fn to_image(src: &GrayImage) -> image::GrayImage {
    image::GrayImage::from_fn(src.width as u32, src.height as u32, |x, y| {
        Luma([src.get(x as usize, y as usize)])
    })
}

fn color_frame(frame: &RgbaFrame<'_>) -> RgbImage {
    RgbImage::from_fn(frame.width() as u32, frame.height() as u32, |x, y| {
        let [r, g, b, _] = frame.pixel(x as usize, y as usize);
        Rgb([r, g, b])
    })
}

fn draw_quad(img: &mut RgbImage, quad: &Quad, color: Rgb<u8>) {
    for i in 0..4 {
        let a = quad.corners[i];
        let b = quad.corners[(i + 1) % 4];
        draw_line_segment_mut(img, (a.x, a.y), (b.x, b.y), color);
    }
}

fn grid_overlay(patch: &GrayImage, sampler: &GridSampler, sampled: bool) -> RgbImage {
    let mut out = RgbImage::from_fn(patch.width as u32, patch.height as u32, |x, y| {
        let v = patch.get(x as usize, y as usize);
        Rgb([v, v, v])
    });
    if !sampled || patch.width == 0 {
        return out;
    }

    let n = sampler.dimension();
    let cell = (patch.width / n) as f32;
    let extent = (n as f32) * cell;
    for k in 0..=n {
        let p = k as f32 * cell;
        draw_line_segment_mut(&mut out, (p, 0.0), (p, extent), GRID_LINE_COLOR);
        draw_line_segment_mut(&mut out, (0.0, p), (extent, p), GRID_LINE_COLOR);
    }

    let xs = sampler.cell_centers(patch.width);
    let ys = sampler.cell_centers(patch.height);
    let values = sampler.sample_values(&patch.view());
    for (j, &y) in ys.iter().enumerate() {
        for (i, &x) in xs.iter().enumerate() {
            let on = values[j * n + i] >= sampler.cutoff();
            let color = if on { CELL_ON_COLOR } else { CELL_OFF_COLOR };
            draw_filled_rect_mut(
                &mut out,
                Rect::at(x as i32 - 4, y as i32 - 4).of_size(9, 9),
                color,
            );
        }
    }
    out
}
