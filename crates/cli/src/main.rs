#![deny(unsafe_code)]
//! CLI binary for particle-glyph.
//!
//! Subcommands:
//! - `render <image>`: settle an image into particles, write a PNG snapshot
//! - `schema`: print the configuration schema

mod error;
mod snapshot;

use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use error::CliError;
use glam::DVec2;
use log::info;
use particle_glyph_core::pixel::Rasterize;
use particle_glyph_core::{FieldConfig, Srgb};
use particle_glyph_field::{Drag, Swarm};
use particle_glyph_sampler::ContentCategory;

#[derive(Parser)]
#[command(name = "particle-glyph", about = "Settle images into particle fields")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Verbosity level (repeat for more detail).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sample an image, run the simulation, and write a snapshot.
    Render {
        /// Source image (PNG or JPEG); transparent pixels are ignored.
        image: PathBuf,

        /// Content category: text, symbol, or drawable.
        #[arg(short, long, default_value = "drawable")]
        category: ContentCategory,

        /// Number of particles (overrides --params).
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// PRNG seed (overrides --params).
        #[arg(long)]
        seed: Option<u64>,

        /// Ticks of first-appearance damping after creation (overrides --params).
        #[arg(long)]
        first_frame_ticks: Option<usize>,

        /// Number of ticks to simulate.
        #[arg(short, long, default_value_t = 600)]
        ticks: usize,

        /// Canvas width; defaults to the image width.
        #[arg(short = 'W', long)]
        width: Option<u32>,

        /// Canvas height; defaults to the image height.
        #[arg(short = 'H', long)]
        height: Option<u32>,

        /// Pointer drag position as "x,y", held for the last --drag-ticks ticks.
        #[arg(long, value_parser = parse_point)]
        drag: Option<DVec2>,

        /// How many final ticks the drag is held for.
        #[arg(long, default_value_t = 30)]
        drag_ticks: usize,

        /// Background color as hex.
        #[arg(long, default_value = "#000000")]
        background: String,

        /// Output PNG path.
        #[arg(short, long, default_value = "particles.png")]
        output: PathBuf,

        /// Also write per-particle appearances as JSON.
        #[arg(long)]
        json_out: Option<PathBuf>,

        /// Field configuration as a JSON string.
        #[arg(long, default_value = "{}")]
        params: String,
    },
    /// Print the configuration schema.
    Schema,
}

fn parse_point(s: &str) -> Result<DVec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected \"x,y\", got \"{s}\""))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad x in \"{s}\": {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad y in \"{s}\": {e}"))?;
    Ok(DVec2::new(x, y))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

struct RenderArgs<'a> {
    image: &'a Path,
    category: ContentCategory,
    config: FieldConfig,
    ticks: usize,
    canvas: Option<(u32, u32)>,
    drag: Option<DVec2>,
    drag_ticks: usize,
}

/// Loads, samples, and simulates; returns the settled swarm and canvas size.
fn simulate(args: &RenderArgs<'_>) -> Result<(Swarm, u32, u32), CliError> {
    let img = image::open(args.image)?.to_rgba8();
    let (width, height) = args.canvas.unwrap_or(img.dimensions());

    // Center the image on the canvas.
    let mut raster = img.rasterize()?;
    raster.offset = (
        (width as f64 - img.width() as f64) / 2.0,
        (height as f64 - img.height() as f64) / 2.0,
    );

    let mut swarm = Swarm::new(
        args.config.clone(),
        DVec2::new(width as f64, height as f64),
    )?;
    swarm.set_content(&raster, args.category)?;
    info!(
        "sampled {} particles from {} ({})",
        swarm.field().len(),
        args.image.display(),
        args.category
    );

    let drag_start = args.ticks.saturating_sub(args.drag_ticks);
    for tick in 0..args.ticks {
        let drag = args
            .drag
            .filter(|_| tick >= drag_start)
            .map(Drag::at);
        swarm.tick(drag);
    }
    Ok((swarm, width, height))
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&FieldConfig::param_schema())?);
        }
        Command::Render {
            image,
            category,
            count,
            seed,
            first_frame_ticks,
            ticks,
            width,
            height,
            drag,
            drag_ticks,
            background,
            output,
            json_out,
            params,
        } => {
            let params: serde_json::Value = serde_json::from_str(&params)
                .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
            let mut config = FieldConfig::from_json(&params);
            if let Some(count) = count {
                config.particle_count = count;
            }
            if let Some(seed) = seed {
                config.seed = seed;
            }
            if let Some(first_frame_ticks) = first_frame_ticks {
                config.first_appearance_ticks = first_frame_ticks;
            }
            let background =
                Srgb::from_hex(&background).map_err(|e| CliError::Input(e.to_string()))?;
            let canvas = match (width, height) {
                (Some(w), Some(h)) => Some((w, h)),
                (None, None) => None,
                _ => {
                    return Err(CliError::Input(
                        "--width and --height must be given together".into(),
                    ))
                }
            };

            let args = RenderArgs {
                image: &image,
                category,
                config,
                ticks,
                canvas,
                drag,
                drag_ticks,
            };
            let (swarm, width, height) = simulate(&args)?;
            let appearances = swarm.appearances();
            snapshot::write_png(&appearances, width, height, background, &output)?;

            if let Some(path) = &json_out {
                let body = serde_json::to_string_pretty(&appearances)?;
                std::fs::write(path, body).map_err(|e| CliError::Io(e.to_string()))?;
            }

            if cli.json {
                let info = serde_json::json!({
                    "image": image.display().to_string(),
                    "category": category,
                    "particles": appearances.len(),
                    "ticks": ticks,
                    "simulated_seconds": swarm.config().tick_interval().as_secs_f64() * ticks as f64,
                    "seed": swarm.config().seed,
                    "width": width,
                    "height": height,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {} particles ({width}x{height}, {ticks} ticks, seed {}) -> {}",
                    appearances.len(),
                    swarm.config().seed,
                    output.display()
                );
            }
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
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
