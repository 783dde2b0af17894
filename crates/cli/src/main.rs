#![deny(unsafe_code)]
//! CLI binary for the waveflow particle animation engine.
//!
//! Subcommands:
//! - `render` — run the animation N ticks over a synthetic swell field,
//!   write the final frame as PNG
//! - `list` — print available demo sources and the default color stops

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use std::path::PathBuf;
use std::process;
use waveflow_core::config::DEFAULT_COLOR_STOPS;
use waveflow_core::source::UniformSwell;
use waveflow_core::{
    AnimationDriver, BoxLandMask, Equirectangular, FieldSource, FlowConfig, FlowEngine, GeoBounds,
    LandMask, Sample, SyntheticSwell,
};

/// Demo field sources selectable from the command line.
const SOURCE_NAMES: &[&str] = &["synthetic", "uniform"];

#[derive(Parser)]
#[command(name = "waveflow", about = "Wave-field particle flow animation CLI")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the animation for N ticks and write a PNG of the final frame.
    Render {
        /// Demo field source ("synthetic" or "uniform").
        #[arg(short, long, default_value = "synthetic")]
        source: String,

        /// Viewport width in pixels.
        #[arg(short = 'W', long, default_value_t = 720)]
        width: usize,

        /// Viewport height in pixels.
        #[arg(short = 'H', long, default_value_t = 360)]
        height: usize,

        /// Number of animation ticks to run.
        #[arg(short, long, default_value_t = 200)]
        ticks: usize,

        /// Data time index to render.
        #[arg(long, default_value_t = 0)]
        time_index: usize,

        /// Disable the coarse continental land mask.
        #[arg(long)]
        no_land: bool,

        /// Output file path.
        #[arg(short, long, default_value = "frame.png")]
        output: PathBuf,

        /// Also write an intermediate frame every N ticks.
        #[arg(long, value_name = "N")]
        every: Option<usize>,

        /// Configuration overrides as a JSON object.
        #[arg(long, default_value = "{}")]
        params: String,
    },
    /// List available demo sources and the default color stops.
    List,
}

/// Derives "trail_00040.png" from "trail.png" for intermediate frames.
fn numbered_path(base: &std::path::Path, tick: usize) -> PathBuf {
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("frame");
    let ext = base.extension().and_then(|s| s.to_str()).unwrap_or("png");
    base.with_file_name(format!("{stem}_{tick:05}.{ext}"))
}

fn make_source(name: &str) -> Result<Box<dyn FieldSource>, CliError> {
    match name {
        "synthetic" => Ok(Box::new(SyntheticSwell::default())),
        "uniform" => Ok(Box::new(UniformSwell {
            sample: Sample::new(4.0, 270.0),
        })),
        other => Err(CliError::Input(format!(
            "unknown source '{other}' (expected one of: {})",
            SOURCE_NAMES.join(", ")
        ))),
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            if cli.json {
                let info = serde_json::json!({
                    "sources": SOURCE_NAMES,
                    "color_stops": DEFAULT_COLOR_STOPS,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Sources:");
                for name in SOURCE_NAMES {
                    println!("  {name}");
                }
                println!("Color stops:");
                println!("  {}", DEFAULT_COLOR_STOPS.join(", "));
            }
        }
        Command::Render {
            source,
            width,
            height,
            ticks,
            time_index,
            no_land,
            output,
            every,
            params,
        } => {
            let params: serde_json::Value = serde_json::from_str(&params)
                .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
            let config = FlowConfig::from_json(&params);

            let mask: Box<dyn LandMask> = if no_land {
                Box::new(BoxLandMask::open_ocean())
            } else {
                Box::new(BoxLandMask::continents())
            };
            let projection = Equirectangular::new(GeoBounds::WORLD, width, height)?;
            let engine = FlowEngine::new(make_source(&source)?, mask, projection, config)?;

            let mut driver = AnimationDriver::new(engine);
            driver.set_time_index(time_index)?;
            driver.start();

            // Simulated display refresh: one callback per frame interval,
            // so every callback executes a tick.
            let interval = driver.engine().config().frame_interval_ms();
            for i in 0..ticks {
                driver.frame(i as f64 * interval);
                if let Some(k) = every.filter(|&k| k > 0) {
                    if (i + 1) % k == 0 && i + 1 < ticks {
                        driver.engine().frame().write_png(&numbered_path(&output, i + 1))?;
                    }
                }
            }
            driver.stop();

            driver.engine().frame().write_png(&output)?;

            if cli.json {
                let info = serde_json::json!({
                    "source": source,
                    "width": width,
                    "height": height,
                    "ticks": ticks,
                    "time_index": time_index,
                    "particles": driver.engine().particle_count(),
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {source} ({width}x{height}, {ticks} ticks, {} particles) -> {}",
                    driver.engine().particle_count(),
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
