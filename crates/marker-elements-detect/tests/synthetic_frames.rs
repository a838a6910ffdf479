use std::sync::Arc;

use marker_elements_core::{GrayImage, Homography};
use marker_elements_detect::{DetectorParams, GridSampler, MarkerDetector};
use marker_elements_patterns::{Grid, PatternLibrary, PatternMatcher, Rotation};
use nalgebra::Point2;

const CELL: f32 = 40.0;

/// White RGBA frame with `grid` drawn through `frame_from_marker`.
///
/// Marker space spans `[0, N·CELL)²`; on cells are white, off cells black.
fn render(width: usize, height: usize, grid: &Grid, frame_from_marker: &Homography) -> Vec<u8> {
    let marker_from_frame = frame_from_marker.inverse().expect("invertible");
    let side = grid.dimension() as f32 * CELL;
    let mut px = vec![255u8; width * height * 4];
    for y in 0..height {
        for x in 0..width {
            let m = marker_from_frame.apply(Point2::new(x as f32 + 0.5, y as f32 + 0.5));
            if m.x < 0.0 || m.y < 0.0 || m.x >= side || m.y >= side {
                continue;
            }
            let v = grid.value((m.x / CELL) as usize, (m.y / CELL) as usize);
            let i = (y * width + x) * 4;
            px[i..i + 3].fill(v);
        }
    }
    px
}

fn similarity(scale: f64, angle_deg: f64, tx: f64, ty: f64) -> Homography {
    let (s, c) = angle_deg.to_radians().sin_cos();
    Homography::from_array([
        [scale * c, -scale * s, tx],
        [scale * s, scale * c, ty],
        [0.0, 0.0, 1.0],
    ])
}

fn builtin(id: u32) -> Grid {
    PatternLibrary::builtin()
        .get(id)
        .expect("builtin marker")
        .reference()
}

fn detector() -> MarkerDetector {
    MarkerDetector::with_builtin_library(DetectorParams::default()).expect("detector")
}

#[test]
fn upright_marker_on_white_background() {
    let px = render(640, 480, &builtin(2), &similarity(1.0, 0.0, 200.0, 120.0));
    let d = detector()
        .process_rgba(640, 480, &px)
        .expect("valid frame")
        .expect("detection");

    assert_eq!(d.marker_id, 2);
    assert_eq!(d.rotation, Rotation::Deg0);
    let tl = d.quad.corners[0];
    assert!((tl.x - 200.0).abs() <= 1.0 && (tl.y - 120.0).abs() <= 1.0);
    assert!((d.centroid.x - 320.0).abs() <= 1.5);
    assert!((d.centroid.y - 240.0).abs() <= 1.5);
}

#[test]
fn every_builtin_marker_in_every_rotation() {
    let mut det = detector();
    for id in 1..=4 {
        for q in 0..4u8 {
            let observed = builtin(id).rotated(q);
            let px = render(640, 480, &observed, &similarity(1.0, 0.0, 200.0, 120.0));
            let d = det
                .process_rgba(640, 480, &px)
                .expect("valid frame")
                .expect("detection");
            assert_eq!(d.marker_id, id);
            assert_eq!(d.rotation, Rotation::from_quarter_turns(q));
        }
    }
}

#[test]
fn slightly_tilted_marker() {
    let px = render(640, 480, &builtin(4), &similarity(1.0, 20.0, 330.0, 80.0));
    let d = detector()
        .process_rgba(640, 480, &px)
        .expect("valid frame")
        .expect("detection");
    assert_eq!(d.marker_id, 4);
    assert_eq!(d.rotation, Rotation::Deg0);
}

#[test]
fn marker_under_perspective() {
    let frame_from_marker = Homography::from_array([
        [1.1, 0.12, 180.0],
        [-0.05, 0.95, 110.0],
        [0.0003, 0.0002, 1.0],
    ]);
    let px = render(640, 480, &builtin(1), &frame_from_marker);
    let d = detector()
        .process_rgba(640, 480, &px)
        .expect("valid frame")
        .expect("detection");
    assert_eq!(d.marker_id, 1);
}

#[test]
fn small_marker_is_filtered_by_area() {
    // 6 cells of 13 px: 77² < 6500 px²
    let px = render(640, 480, &builtin(2), &similarity(13.0 / CELL as f64, 0.0, 200.0, 120.0));
    let mut det = detector();
    assert!(det.process_rgba(640, 480, &px).expect("valid frame").is_none());
    assert!(det.last_candidates().is_empty());
}

#[test]
fn frame_size_change_rebuilds_buffers() {
    let mut det = detector();
    let big = render(640, 480, &builtin(3), &similarity(1.0, 0.0, 200.0, 120.0));
    let d = det.process_rgba(640, 480, &big).expect("valid").expect("detection");
    assert_eq!(d.marker_id, 3);
    assert_eq!(det.buffer_dimensions(), Some((640, 480)));

    let small = render(320, 300, &builtin(2), &similarity(1.0, 0.0, 40.0, 30.0));
    let d = det.process_rgba(320, 300, &small).expect("valid").expect("detection");
    assert_eq!(d.marker_id, 2);
    assert_eq!(det.buffer_dimensions(), Some((320, 300)));
}

#[test]
fn rectified_quarter_turn_patch_matches_with_rotation() {
    let matcher = PatternMatcher::new(Arc::new(PatternLibrary::builtin()));
    let sampler = GridSampler::new(6, 128).expect("sampler");
    let turned = builtin(2).rotate_cw();

    let mut patch = GrayImage::new(300, 300);
    for y in 0..300 {
        for x in 0..300 {
            patch.data[y * 300 + x] = turned.value(x / 50, y / 50);
        }
    }

    let m = matcher
        .match_grid(&sampler.sample(&patch.view()))
        .expect("match");
    assert_eq!(m.id, 2);
    assert_eq!(m.rotation.degrees(), 90);
}
