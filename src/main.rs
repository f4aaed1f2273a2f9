//! Asciireel CLI
//!
//! Plays a progressively loaded ASCII animation in the terminal, or loads it
//! headless and prints a JSON summary with `--dump`.

use asciireel::frame_source::AnyTransport;
use asciireel::loader::{AnimationSource, LoadOptions};
use asciireel::tui::{frames, App, PlaybackSource};
use asciireel::viewport::natural_size;
use asciireel::{FitMode, LoadStrategy, PlayerConfig, ProgressiveLoader, Quality};
use clap::Parser;
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tokio_stream::{wrappers::WatchStream, StreamExt};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

/// Asciireel - progressive ASCII frame-animation player
#[derive(Parser, Debug)]
#[command(name = "asciireel")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: ~/.config/asciireel/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base URL (http/https) or local directory holding the animation folders
    #[arg(long)]
    origin: Option<String>,

    /// Animation folder under the origin
    #[arg(long)]
    folder: Option<String>,

    /// Number of frames in the folder
    #[arg(short = 'n', long)]
    frame_count: Option<usize>,

    /// Requested quality tier
    #[arg(long, value_enum)]
    quality: Option<Quality>,

    /// Playback rate in frames per second
    #[arg(long)]
    fps: Option<f64>,

    /// Load every frame right away instead of waiting for visibility
    #[arg(long)]
    eager: bool,

    #[arg(long, value_enum)]
    fit: Option<FitMode>,

    #[arg(long)]
    zoom: Option<f64>,

    /// Vertical offset, percent of the frame height
    #[arg(long, allow_hyphen_values = true)]
    offset_y: Option<f64>,

    #[arg(long, value_enum)]
    load_strategy: Option<LoadStrategy>,

    #[arg(long)]
    batch_size: Option<usize>,

    /// Maximum frame fetches in flight
    #[arg(long)]
    max_concurrent: Option<usize>,

    /// Abort loading on the first failed frame
    #[arg(long)]
    strict: bool,

    /// Show the frame counter overlay
    #[arg(long)]
    counter: bool,

    /// Never start playback automatically
    #[arg(long)]
    reduced_motion: bool,

    /// Frame color (name or #rrggbb)
    #[arg(long)]
    color: Option<String>,

    /// Top-to-bottom text gradient, "#rrggbb..#rrggbb" (wins over --color)
    #[arg(long)]
    gradient: Option<String>,

    /// Write logs to this file while the player owns the terminal
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Verbose output: debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Load without a UI and print a JSON summary
    #[arg(long)]
    dump: bool,

    /// With --dump, also print every normalized frame
    #[arg(long, requires = "dump")]
    print_frames: bool,
}

impl Cli {
    /// Command-line values win over the config file.
    fn apply_overrides(&self, mut config: PlayerConfig) -> PlayerConfig {
        if let Some(origin) = &self.origin {
            config.origin = Some(origin.clone());
        }
        if let Some(folder) = &self.folder {
            config.frame_folder = folder.clone();
        }
        if let Some(count) = self.frame_count {
            config.frame_count = count;
        }
        if let Some(quality) = self.quality {
            config = config.with_quality(quality);
        }
        if let Some(fps) = self.fps {
            config = config.with_fps(fps);
        }
        if self.eager {
            config = config.with_lazy(false);
        }
        let fit = self.fit.unwrap_or(config.fit);
        let zoom = self.zoom.unwrap_or(config.zoom);
        let offset_y = self.offset_y.unwrap_or(config.offset_y);
        config = config.with_fit(fit, zoom, offset_y);

        let strategy = self.load_strategy.unwrap_or(config.load_strategy);
        let batch_size = self.batch_size.unwrap_or(config.batch_size);
        let max_concurrent = self.max_concurrent.unwrap_or(config.max_concurrent_fetches);
        config = config.with_batching(strategy, batch_size, max_concurrent);

        if self.strict {
            config = config.with_continue_on_frame_error(false);
        }
        if self.counter {
            config.show_frame_counter = true;
        }
        if self.reduced_motion {
            config.reduced_motion = true;
        }
        if let Some(color) = &self.color {
            config.color = Some(color.clone());
        }
        if let Some(gradient) = &self.gradient {
            config.gradient = Some(gradient.clone());
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = cli.apply_overrides(PlayerConfig::load(cli.config.as_deref())?);
    config.validate()?;

    if cli.dump {
        run_dump_mode(&cli, config).await
    } else {
        run_tui_mode(&cli, config).await
    }
}

async fn run_tui_mode(cli: &Cli, config: PlayerConfig) -> anyhow::Result<()> {
    // The terminal belongs to the UI; logs only go to a file when asked
    if let Some(path) = &cli.log_file {
        let file = File::create(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(env_filter(cli.verbose))
            .with_target(false)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }

    let (source, title, origin) = playback_source(&config);
    info!("starting player for \"{}\" from {}", title, origin);

    let loader = ProgressiveLoader::new(transport_for(&config), LoadOptions::from(&config));
    let mut app = App::new(loader, source, title, origin, &config)?;
    app.run().await?;

    Ok(())
}

/// JSON printed by `--dump`
#[derive(Debug, Serialize)]
struct DumpSummary {
    title: String,
    origin: String,
    state: &'static str,
    loaded: usize,
    total: usize,
    width: usize,
    height: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    fallback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

async fn run_dump_mode(cli: &Cli, config: PlayerConfig) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(cli.verbose))
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let (source, title, origin) = playback_source(&config);
    let options = LoadOptions {
        lazy: false,
        ..LoadOptions::from(&config)
    };
    let loader = ProgressiveLoader::new(transport_for(&config), options);

    let mut updates = WatchStream::new(loader.subscribe());
    let progress = tokio::spawn(async move {
        while let Some(set) = updates.next().await {
            debug!("{}: {}/{} frames", set.state.label(), set.len(), set.total);
        }
    });

    let result = match source {
        PlaybackSource::Explicit(frames) => {
            loader.set_explicit_frames(&frames);
            Ok(())
        }
        PlaybackSource::Remote(source) => {
            loader.set_source(source);
            loader.load_first_frame().await
        }
    };
    progress.abort();

    let set = loader.snapshot();
    let (width, height) = set.frames.first().map(|f| natural_size(f)).unwrap_or((0, 0));
    let summary = DumpSummary {
        title,
        origin,
        state: set.state.label(),
        loaded: set.len(),
        total: set.total,
        width,
        height,
        fallback: set.fallback.as_ref().map(ToString::to_string),
        error: result.as_ref().err().map(|e| e.to_string()),
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", serde_json::to_string_pretty(&summary)?)?;
    if cli.print_frames {
        for (i, frame) in set.frames.iter().enumerate() {
            writeln!(stdout, "\n--- frame {} ---\n{}", i + 1, frame)?;
        }
    }
    stdout.flush()?;

    if let Err(e) = result {
        error!("{}", e);
        return Err(e.into());
    }
    Ok(())
}

/// What to play, plus the header title and origin label.
fn playback_source(config: &PlayerConfig) -> (PlaybackSource, String, String) {
    match AnimationSource::from_config(config) {
        Some(source) => {
            let title = source.folder.clone();
            let origin = source.origin.clone();
            (PlaybackSource::Remote(source), title, origin)
        }
        None => (
            PlaybackSource::Explicit(frames::default_frames()),
            frames::DEFAULT_TITLE.to_string(),
            "built-in".to_string(),
        ),
    }
}

fn transport_for(config: &PlayerConfig) -> AnyTransport {
    AnyTransport::for_origin(
        config.origin.as_deref().unwrap_or_default(),
        Duration::from_secs(config.request_timeout_secs),
    )
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }))
}
