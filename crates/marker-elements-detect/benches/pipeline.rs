use criterion::{black_box, criterion_group, criterion_main, Criterion};
use marker_elements_core::RgbaFrame;
use marker_elements_detect::{DetectorParams, MarkerDetector};
use marker_elements_patterns::PatternLibrary;

/// 640×480 white frame with built-in marker 2 drawn at 40 px per cell.
fn synthetic_frame() -> Vec<u8> {
    let (w, h) = (640usize, 480usize);
    let grid = PatternLibrary::builtin()
        .get(2)
        .expect("builtin marker")
        .reference();
    let mut px = vec![255u8; w * h * 4];
    for y in 120..360 {
        for x in 200..440 {
            let v = grid.value((x - 200) / 40, (y - 120) / 40);
            let i = (y * w + x) * 4;
            px[i..i + 3].fill(v);
        }
    }
    px
}

fn bench_process_frame(c: &mut Criterion) {
    let pixels = synthetic_frame();
    let frame = RgbaFrame::new(640, 480, &pixels).expect("valid frame");
    let mut detector =
        MarkerDetector::with_builtin_library(DetectorParams::default()).expect("detector");

    c.bench_function("process_frame_640x480", |b| {
        b.iter(|| {
            let d = detector.process_frame(black_box(&frame));
            black_box(d);
        });
    });

    let mut debug = MarkerDetector::with_builtin_library(DetectorParams {
        emit_debug_images: true,
        ..DetectorParams::default()
    })
    .expect("detector");
    c.bench_function("process_frame_640x480_debug_images", |b| {
        b.iter(|| {
            let d = debug.process_frame(black_box(&frame));
            black_box(d);
        });
    });
}

criterion_group!(benches, bench_process_frame);
criterion_main!(benches);
