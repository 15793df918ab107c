// pathfinder/demo/native-turtle/src/main.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Plays a turtle script in real time and writes out what it drew.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Stdout};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use turtle_engine::{
    svg, Clock, JsonLines, Raster, Scene, Script, SystemClock, Turtle, TurtleConfig,
};

const ASCII_COLUMNS: usize = 80;

#[derive(Debug, Parser)]
#[command(name = "turtle-demo", version, about = "Plays a turtle script onto a canvas")]
struct Args {
    /// A turtle script, or a JSON command list if the extension is `.json`.
    script: PathBuf,

    /// JSON file with canvas and playback settings.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    width: Option<f64>,

    #[arg(long)]
    height: Option<f64>,

    /// Playback speed factor; 0 plays without delay.
    #[arg(long)]
    speed: Option<f64>,

    #[arg(long)]
    base_delay_ms: Option<u64>,

    /// Render immediately instead of pacing commands.
    #[arg(long)]
    instant: bool,

    #[arg(long)]
    svg: Option<PathBuf>,

    #[arg(long)]
    png: Option<PathBuf>,

    /// Print an ASCII preview to stdout when done.
    #[arg(long)]
    ascii: bool,

    /// Stream each segment to stdout as a JSON line while playing.
    #[arg(long)]
    trace: bool,

    #[arg(short, long)]
    verbose: bool,
}

type DemoCanvas = (Scene, (Raster, Option<JsonLines<Stdout>>));

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(code) => code,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(args: &Args) -> Result<ExitCode> {
    let config = load_config(args)?;
    let script = load_script(&args.script)?;
    info!(
        commands = script.len(),
        speed = config.speed,
        "playing {}",
        args.script.display()
    );

    let stream = if args.trace {
        Some(JsonLines::new(io::stdout(), config.size()))
    } else {
        None
    };
    let raster = Raster::new(
        config.width.round() as usize,
        config.height.round() as usize,
        config.background,
    );
    let canvas: DemoCanvas = (Scene::new(config.size()), (raster, stream));
    let mut turtle = Turtle::new(canvas, config);

    let mut clock = SystemClock;
    turtle.execute_commands(script, clock.now());
    let outcome = turtle.run_until_idle(&mut clock);

    if !turtle.flags().is_empty() {
        warn!("{}", turtle.flags());
    }
    write_outputs(args, &turtle)?;

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            error!(
                skipped = turtle.pending_len(),
                "playback aborted: {}", err
            );
            Ok(ExitCode::FAILURE)
        }
    }
}

fn load_config(args: &Args) -> Result<TurtleConfig> {
    let mut config = match args.config {
        Some(ref path) => TurtleConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => TurtleConfig::default(),
    };
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(speed) = args.speed {
        config.speed = speed;
    }
    if let Some(base_delay_ms) = args.base_delay_ms {
        config.base_delay_ms = base_delay_ms;
    }
    if args.instant {
        config.speed = 0.0;
    }
    config.validate()?;
    Ok(config)
}

fn load_script(path: &Path) -> Result<Script> {
    let source =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let is_json = path
        .extension()
        .map_or(false, |extension| extension.eq_ignore_ascii_case("json"));
    let script: Script = if is_json {
        serde_json::from_str(&source)
            .with_context(|| format!("parsing command list {}", path.display()))?
    } else {
        uturtle::parse(&source).with_context(|| format!("parsing {}", path.display()))?
    };
    Ok(script)
}

fn write_outputs(args: &Args, turtle: &Turtle<DemoCanvas>) -> Result<()> {
    let (scene, (raster, _)) = turtle.canvas();

    if let Some(ref path) = args.svg {
        let document = svg::render(scene, turtle.config().background, turtle.cursor());
        fs::write(path, document).with_context(|| format!("writing {}", path.display()))?;
        info!(segments = scene.segments.len(), "wrote {}", path.display());
    }
    if let Some(ref path) = args.png {
        raster
            .save_png(path)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("wrote {}", path.display());
    }
    if args.ascii {
        let cell = (raster.width() + ASCII_COLUMNS - 1) / ASCII_COLUMNS;
        print!("{}", raster.to_ascii(cell));
    }
    Ok(())
}
