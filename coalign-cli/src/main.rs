use clap::Parser;
use coalign::io::load_layer;
use coalign::preprocess::{identity_map, log1p_map, sqrt_map};
use coalign::{DataMap, EstimatorConfig, Image, ShiftEstimator, ShiftReport};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const EXAMPLE_JSON: &str = r#"{
  "layer_path": "frame_0042.png",
  "reference_path": "frame_0000.png",
  "template_roi": { "x": 64, "y": 48, "width": 128, "height": 96 },
  "data_map": "identity",
  "parallel": false,
  "output_path": null
}"#;

#[derive(Parser, Debug)]
#[command(author, version, about = "Coalign CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum DataMapConfig {
    #[default]
    Identity,
    Log1p,
    Sqrt,
}

impl From<DataMapConfig> for DataMap {
    fn from(value: DataMapConfig) -> Self {
        match value {
            DataMapConfig::Identity => identity_map,
            DataMapConfig::Log1p => log1p_map,
            DataMapConfig::Sqrt => sqrt_map,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
struct RoiConfig {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    layer_path: String,
    /// Template image; mutually exclusive with `reference_path`.
    template_path: Option<String>,
    /// Image the template is cut from using `template_roi`.
    reference_path: Option<String>,
    template_roi: Option<RoiConfig>,
    output_path: Option<String>,
    parallel: bool,
    data_map: DataMapConfig,
}

#[derive(Debug, Serialize)]
struct Output {
    y_shift: f64,
    x_shift: f64,
    /// Shift of the layer relative to the reference, when the template was cut
    /// from a reference image.
    relative: Option<[f64; 2]>,
    peak_x: usize,
    peak_y: usize,
    peak_score: f64,
    repaired_layer: usize,
    repaired_template: usize,
}

impl Output {
    fn new(report: ShiftReport, roi: Option<RoiConfig>) -> Self {
        Self {
            y_shift: report.shift.y,
            x_shift: report.shift.x,
            relative: roi.map(|r| [report.shift.y - r.y as f64, report.shift.x - r.x as f64]),
            peak_x: report.peak.x,
            peak_y: report.peak.y,
            peak_score: report.peak.score,
            repaired_layer: report.repaired_layer,
            repaired_template: report.repaired_template,
        }
    }
}

fn load_template(config: &Config) -> Result<(Image, Option<RoiConfig>), Box<dyn std::error::Error>> {
    // Raw samples; the estimator applies the data map to both inputs.
    match (&config.template_path, &config.reference_path, config.template_roi) {
        (Some(path), None, None) => Ok((load_layer(path, identity_map)?, None)),
        (None, Some(path), Some(roi)) => {
            let reference = load_layer(path, identity_map)?;
            let view = reference.view().roi(roi.x, roi.y, roi.width, roi.height)?;
            Ok((Image::from_view(view)?, Some(roi)))
        }
        _ => Err("set either template_path, or reference_path together with template_roi".into()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("coalign=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.layer_path.is_empty() {
        return Err("layer_path must be set in the config".into());
    }

    let mut layer = load_layer(&config.layer_path, identity_map)?;
    let (mut template, roi) = load_template(&config)?;

    let estimator = ShiftEstimator::new().with_config(EstimatorConfig {
        parallel: config.parallel,
        data_map: config.data_map.into(),
    });
    let report = estimator.estimate_report(&mut layer, &mut template)?;
    if !report.shift.is_finite() {
        tracing::warn!("degenerate correlation peak; shift is not finite");
    }

    let json = serde_json::to_string_pretty(&Output::new(report, roi))?;
    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
