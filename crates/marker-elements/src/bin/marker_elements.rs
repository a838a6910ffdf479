//! marker-elements CLI: detect markers in image files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use serde::Serialize;

use marker_elements::image_io::{load_frame, Error};
use marker_elements::{DetectorParams, Element, MarkerDetection, MarkerDetector, PatternLibrary};

#[cfg(feature = "tracing")]
use tracing_log::LogTracer;

type CliResult<T> = Result<T, Error>;

#[derive(Parser)]
#[command(name = "marker-elements")]
#[command(about = "Recognize square binary-grid markers in images")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect a marker in each image and print one JSON line per image.
    Detect(DetectArgs),

    /// Print the default detector parameters as JSON.
    PrintConfig,

    /// List the patterns of a library.
    Patterns {
        /// Pattern library JSON (defaults to the built-in markers).
        #[arg(long)]
        library: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
struct DetectArgs {
    /// Input images.
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Detector parameters JSON; missing keys keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pattern library JSON (defaults to the built-in markers).
    #[arg(long)]
    library: Option<PathBuf>,

    /// Write per-stage PNGs for every image into this directory.
    #[arg(long)]
    debug_dir: Option<PathBuf>,

    /// Flip frames top-to-bottom before detection.
    #[arg(long)]
    mirror_y: bool,

    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,

    /// Log through a tracing subscriber (RUST_LOG filter) instead.
    #[cfg(feature = "tracing")]
    #[arg(long)]
    tracing: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Serialize)]
struct ImageReport<'a> {
    image: &'a Path,
    detection: Option<MarkerDetection>,
    element: Option<Element>,
}

#[derive(Serialize)]
struct PatternReport {
    id: u32,
    distinct_variants: usize,
    rows: Vec<String>,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Detect(args) => run_detect(&args),
        Commands::PrintConfig => run_print_config(),
        Commands::Patterns { library } => run_patterns(library.as_deref()),
    }
}

fn init_logging(args: &DetectArgs) {
    #[cfg(feature = "tracing")]
    {
        if args.tracing {
            let _ = LogTracer::init();
            marker_elements::init_tracing(false);
            return;
        }
    }
    let _ = marker_elements::init_with_level(args.log_level.into());
}

fn load_library(path: Option<&Path>) -> CliResult<PatternLibrary> {
    Ok(match path {
        Some(p) => PatternLibrary::from_json_file(p)?,
        None => PatternLibrary::builtin(),
    })
}

fn run_detect(args: &DetectArgs) -> CliResult<()> {
    init_logging(args);

    let params = match &args.config {
        Some(p) => DetectorParams::from_json_file(p)?,
        None => DetectorParams::default(),
    };
    let params = DetectorParams {
        emit_debug_images: params.emit_debug_images || args.debug_dir.is_some(),
        ..params
    };
    let library = Arc::new(load_library(args.library.as_deref())?);
    let mut detector = MarkerDetector::new(params, library)?;

    if let Some(dir) = &args.debug_dir {
        std::fs::create_dir_all(dir)?;
    }

    for path in &args.images {
        let mut frame = load_frame(path)?;
        if args.mirror_y {
            frame.mirror_vertically()?;
        }
        let detection = detector.process_frame(&frame.view()?);

        if let (Some(dir), Some(images)) = (&args.debug_dir, detector.debug_images()) {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "frame".to_string());
            images.save_pngs(dir, &stem)?;
        }

        let report = ImageReport {
            image: path,
            detection,
            element: detection.map(|d| Element::from_marker_id(d.marker_id)),
        };
        println!("{}", serde_json::to_string(&report)?);
    }
    Ok(())
}

fn run_print_config() -> CliResult<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(&DetectorParams::default())?
    );
    Ok(())
}

fn run_patterns(library: Option<&Path>) -> CliResult<()> {
    let library = load_library(library)?;
    for p in library.patterns() {
        let report = PatternReport {
            id: p.id(),
            distinct_variants: p.distinct_variant_count(),
            rows: p.reference().to_rows(),
        };
        println!("{}", serde_json::to_string(&report)?);
    }
    Ok(())
}
