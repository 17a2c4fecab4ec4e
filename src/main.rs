//! pid-isolate - CLI tool to find isolation valves in P&ID drawings.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use pid_isolate::config::{DEFAULT_MAX_SEARCH_DEPTH, DEFAULT_PROXIMITY_THRESHOLD};
use pid_isolate::{
    analyze_drawing, load_drawing, validate_config, viewer_markers, AnalysisConfig, ComponentType,
    DrawingReport, ImageOrientation, ViewerMarker,
};

/// Find the valves that isolate a target valve and print the work procedure.
#[derive(Parser, Debug)]
#[command(name = "pid-isolate")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input drawing (DXF or JSON); repeat for a batch
    #[arg(short, long, required = true)]
    input: Vec<PathBuf>,

    /// Tag of the valve to isolate (e.g. VC-4307)
    #[arg(short, long)]
    target: Option<String>,

    /// Write the analysis reports as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write viewer markers as JSON
    #[arg(long)]
    viewer_output: Option<PathBuf>,

    /// Raster orientation for viewer markers (upright, quarter-turn)
    #[arg(long, default_value = "upright")]
    orientation: ImageOrientation,

    /// Max distance from a component to a line it sits on
    #[arg(long, default_value_t = DEFAULT_PROXIMITY_THRESHOLD)]
    threshold: f64,

    /// Max graph hops searched from the target
    #[arg(long, default_value_t = DEFAULT_MAX_SEARCH_DEPTH)]
    max_depth: usize,

    /// Comma-separated isolation-capable types (e.g. gate,ball,shutoff,hand)
    #[arg(long, value_delimiter = ',')]
    isolation_types: Option<Vec<ComponentType>>,

    /// Validate only, don't analyze
    #[arg(long)]
    validate: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> AnalysisConfig {
        let config = AnalysisConfig::new(self.threshold, self.max_depth);
        match &self.isolation_types {
            Some(types) => config.with_isolation_types(types.iter().copied()),
            None => config,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = args.config();

    let validation = validate_config(&config);
    for warning in &validation.warnings {
        warn!("{}", warning);
    }
    for err in &validation.errors {
        error!("{}", err);
    }
    if !validation.passed {
        anyhow::bail!("Invalid configuration");
    }

    let mut reports: Vec<DrawingReport> = Vec::new();
    let mut markers: Vec<ViewerMarker> = Vec::new();
    let mut failed = 0usize;

    for path in &args.input {
        info!("Processing: {}", path.display());

        let drawing = match load_drawing(path, &config)
            .with_context(|| format!("Failed to read {}", path.display()))
        {
            Ok(drawing) => drawing,
            Err(e) => {
                error!("{:#}", e);
                failed += 1;
                continue;
            }
        };

        info!(
            "{}: {} component(s), {} segment(s)",
            drawing.name,
            drawing.components.len(),
            drawing.segments.len()
        );

        if args.viewer_output.is_some() {
            markers.extend(viewer_markers(&drawing, args.orientation));
        }

        let report = analyze_drawing(&drawing, args.target.as_deref(), &config);

        if args.validate {
            info!("{}: {} warning(s)", drawing.name, report.warnings.len());
            continue;
        }

        if let Some(procedure) = &report.isolation_procedure {
            println!("{}: isolation procedure for {}", report.drawing, procedure.target);
            println!("{}", procedure.render_text());
        }

        reports.push(report);
    }

    if failed == args.input.len() {
        anyhow::bail!("No drawing could be processed");
    }

    if args.validate {
        info!("Validation passed");
        return Ok(());
    }

    if let Some(output_path) = &args.output {
        write_json(output_path, &reports)?;
        info!("Generated: {}", output_path.display());
    }

    if let Some(viewer_path) = &args.viewer_output {
        write_json(viewer_path, &markers)?;
        info!("Generated: {} ({} marker(s))", viewer_path.display(), markers.len());
    }

    Ok(())
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}
