use pole_detector::hough::assign_display_tags;
use pole_detector::image::io::{load_grayscale_image, save_grayscale, write_json_file};
use pole_detector::image::GrayBuffer;
use pole_detector::regions::Component;
use pole_detector::{PipelineTrace, PoleDetector, PoleParams};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Largest input dimension the pipeline accepts.
const MAX_INPUT_DIM: usize = 512;

#[derive(Debug, Deserialize)]
pub struct DetectToolConfig {
    pub input: PathBuf,
    /// Optional second image cropped in lockstep with the working buffer.
    #[serde(default)]
    pub mask: Option<PathBuf>,
    #[serde(default)]
    pub params: PoleParams,
    pub output: DetectOutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct DetectOutputConfig {
    #[serde(rename = "filtered_image")]
    pub filtered_image: PathBuf,
    #[serde(rename = "report_json")]
    pub report_json: PathBuf,
}

pub fn load_config(path: &Path) -> Result<DetectToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let gray = load_bounded(&config.input)?;
    let mask = match &config.mask {
        Some(path) => Some(load_bounded(path)?),
        None => None,
    };

    let detector = PoleDetector::new(config.params).map_err(|e| e.to_string())?;
    let report = detector
        .process_with_mask(&gray, mask)
        .map_err(|e| e.to_string())?;

    let mut pairs = report.pairs;
    assign_display_tags(&mut pairs, &mut rand::thread_rng());

    let summary = DetectionSummary {
        pair_count: pairs.len(),
        component_count: report.components.len(),
        pairs,
        components: report.components,
        trace: report.trace,
    };
    save_grayscale(&report.filtered, &config.output.filtered_image)?;
    write_json_file(&config.output.report_json, &summary)?;

    println!(
        "Saved filtered components to {}",
        config.output.filtered_image.display()
    );
    println!(
        "Found {} pole candidates ({} line pairs); report at {}",
        summary.component_count,
        summary.pair_count,
        config.output.report_json.display()
    );

    Ok(())
}

fn load_bounded(path: &Path) -> Result<GrayBuffer, String> {
    let image = load_grayscale_image(path)?;
    if image.w == 0 || image.h == 0 || image.w > MAX_INPUT_DIM || image.h > MAX_INPUT_DIM {
        return Err(format!(
            "{}: image dimensions {}x{} outside the supported range (1..={MAX_INPUT_DIM})",
            path.display(),
            image.w,
            image.h
        ));
    }
    Ok(image)
}

fn usage() -> String {
    "Usage: detect_poles <config.json>".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DetectionSummary {
    pair_count: usize,
    component_count: usize,
    pairs: Vec<pole_detector::hough::LinePair>,
    components: Vec<Component>,
    trace: PipelineTrace,
}
