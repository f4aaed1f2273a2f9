//! Player configuration
//!
//! Values come from `~/.config/asciireel/config.toml` (or `--config <path>`)
//! and are then overridden by command-line flags.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_BATCH_SIZE: usize = 24;
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 6;
pub const DEFAULT_FPS: f64 = 24.0;
pub const DEFAULT_FRAME_COUNT: usize = 60;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Requested asset quality tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Low,
    #[default]
    Medium,
    High,
}

impl Quality {
    /// Tiers to probe, in order, when `self` is requested.
    pub fn fallback_order(self) -> [Quality; 3] {
        match self {
            Quality::Low => [Quality::Low, Quality::High, Quality::Medium],
            Quality::Medium => [Quality::Medium, Quality::High, Quality::Low],
            Quality::High => [Quality::High, Quality::Low, Quality::Medium],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Quality::Low => "low",
            Quality::Medium => "medium",
            Quality::High => "high",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the frame is scaled into its container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    #[default]
    Contain,
    Cover,
}

/// How the remaining frames are grouped into batches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LoadStrategy {
    /// Fixed-size batches of `batch_size` frames
    #[default]
    Batch,
    /// A single batch containing every remaining frame
    All,
}

/// Configuration for one animation player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Base URL (`http://`, `https://`) or local directory holding the frame folders.
    /// `None` plays the built-in animation.
    pub origin: Option<String>,

    /// Logical animation name (folder under `origin`)
    pub frame_folder: String,

    /// Number of frames expected in the folder
    pub frame_count: usize,

    pub quality: Quality,

    /// Playback rate in frames per second
    pub fps: f64,

    /// Defer loading frames 1.. until the animation area becomes visible
    pub lazy: bool,

    pub fit: FitMode,
    pub zoom: f64,

    /// Vertical offset as a percentage of the unscaled frame height
    pub offset_y: f64,

    pub load_strategy: LoadStrategy,
    pub batch_size: usize,
    pub max_concurrent_fetches: usize,

    /// Skip frames that fail to load instead of aborting
    pub continue_on_frame_error: bool,

    pub show_frame_counter: bool,

    /// Never start playback automatically
    pub reduced_motion: bool,

    /// Text color: a color name or `#rrggbb`
    pub color: Option<String>,

    /// Top-to-bottom text gradient, `"#rrggbb..#rrggbb"`. Wins over `color`.
    pub gradient: Option<String>,

    pub request_timeout_secs: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            origin: None,
            frame_folder: "frames".to_string(),
            frame_count: DEFAULT_FRAME_COUNT,
            quality: Quality::default(),
            fps: DEFAULT_FPS,
            lazy: true,
            fit: FitMode::default(),
            zoom: 1.0,
            offset_y: 0.0,
            load_strategy: LoadStrategy::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            continue_on_frame_error: true,
            show_frame_counter: false,
            reduced_motion: false,
            color: None,
            gradient: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl PlayerConfig {
    pub fn new(origin: impl Into<String>, frame_folder: impl Into<String>, frame_count: usize) -> Self {
        Self {
            origin: Some(origin.into()),
            frame_folder: frame_folder.into(),
            frame_count,
            ..Self::default()
        }
    }

    /// Load a config file.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// tried and a missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match default_config_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            if required {
                return Err(Error::Config(format!("config file not found: {}", path.display())));
            }
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config: PlayerConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make playback or loading meaningless.
    pub fn validate(&self) -> Result<()> {
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(Error::Config(format!("fps must be positive, got {}", self.fps)));
        }
        if !(self.zoom.is_finite() && self.zoom > 0.0) {
            return Err(Error::Config(format!("zoom must be positive, got {}", self.zoom)));
        }
        if self.frame_count == 0 {
            return Err(Error::Config("frame_count must be positive".to_string()));
        }
        if self.frame_folder.trim().is_empty() {
            return Err(Error::Config("frame_folder must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_fps(mut self, fps: f64) -> Self {
        self.fps = fps;
        self
    }

    pub fn with_lazy(mut self, lazy: bool) -> Self {
        self.lazy = lazy;
        self
    }

    pub fn with_batching(mut self, strategy: LoadStrategy, batch_size: usize, max_concurrent: usize) -> Self {
        self.load_strategy = strategy;
        self.batch_size = batch_size;
        self.max_concurrent_fetches = max_concurrent;
        self
    }

    pub fn with_continue_on_frame_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_frame_error = continue_on_error;
        self
    }

    pub fn with_fit(mut self, fit: FitMode, zoom: f64, offset_y: f64) -> Self {
        self.fit = fit;
        self.zoom = zoom;
        self.offset_y = offset_y;
        self
    }
}

/// `~/.config/asciireel/config.toml` (platform config dir)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("asciireel").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_fallback_order_starts_with_requested() {
        assert_eq!(Quality::Low.fallback_order(), [Quality::Low, Quality::High, Quality::Medium]);
        assert_eq!(Quality::Medium.fallback_order(), [Quality::Medium, Quality::High, Quality::Low]);
        assert_eq!(Quality::High.fallback_order(), [Quality::High, Quality::Low, Quality::Medium]);
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "origin = \"https://example.com\"\nframe_folder = \"hero\"\nquality = \"high\"\nfit = \"cover\"\nload_strategy = \"all\"\ngradient = \"#ff0080..#00c0ff\"\n",
        )
        .unwrap();

        let config = PlayerConfig::load(Some(&path)).unwrap();
        assert_eq!(config.origin.as_deref(), Some("https://example.com"));
        assert_eq!(config.frame_folder, "hero");
        assert_eq!(config.quality, Quality::High);
        assert_eq!(config.fit, FitMode::Cover);
        assert_eq!(config.load_strategy, LoadStrategy::All);
        assert_eq!(config.gradient.as_deref(), Some("#ff0080..#00c0ff"));
        assert_eq!(config.color, None);
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert!(config.continue_on_frame_error);
        assert!(config.lazy);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let result = PlayerConfig::load(Some(&dir.path().join("nope.toml")));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_invalid_fps_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "fps = 0.0\n").unwrap();
        assert!(PlayerConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn test_zero_frame_count_rejected() {
        let config = PlayerConfig::new("https://example.com", "hero", 0);
        assert!(matches!(config.validate(), Err(Error::Config(ref msg)) if msg.contains("frame_count")));
    }
}
