//! Detect a marker in one image and print the element it stands for.
//!
//! ```text
//! cargo run -p marker-elements --example detect_image -- marker.png
//! ```

use std::env;

use log::LevelFilter;
use marker_elements::image_io::load_frame;
use marker_elements::{init_with_level, DetectorParams, Element, MarkerDetector};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = init_with_level(LevelFilter::Info);

    let path = env::args()
        .nth(1)
        .ok_or("usage: detect_image <IMAGE>")?;
    let frame = load_frame(&path)?;

    let mut detector = MarkerDetector::with_builtin_library(DetectorParams::default())?;
    match detector.process_frame(&frame.view()?) {
        Some(d) => println!(
            "{path}: marker {} ({}) rotated {} at ({:.1}, {:.1})",
            d.marker_id,
            Element::from_marker_id(d.marker_id),
            d.rotation,
            d.centroid.x,
            d.centroid.y
        ),
        None => println!("{path}: no marker"),
    }
    Ok(())
}
