//! Asciireel - progressive ASCII frame-animation player
//!
//! Streams pre-rendered text frames from a remote (or local) source and plays
//! them back in the terminal:
//! - Resolve the frame source across quality tiers and a legacy flat layout
//! - Load frame 0 eagerly, the rest in bounded batches once visible
//! - Crop every frame to a shared bounding box so playback never jitters
//! - Drive playback on a fixed-tick scheduler with catch-up

pub mod config;
pub mod frame_source;
pub mod loader;
pub mod normalize;
pub mod scheduler;
pub mod tui;
pub mod viewport;

pub use config::{FitMode, LoadStrategy, PlayerConfig, Quality};
pub use frame_source::{FileTransport, FrameTransport, HttpTransport, ResolvedSource, SourceFallback};
pub use loader::{FrameSet, LoadState, ProgressiveLoader};
pub use normalize::FrameBounds;
pub use scheduler::{DisplaySurface, PlaybackScheduler};
pub use viewport::{FitLayer, Transform, ViewportGate};

/// Result type for Asciireel operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or playing an animation
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to fetch {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Could not find frames in any quality folder or flat structure for \"{folder}\"")]
    NotFound { folder: String },

    #[error("Partial frame load failure: frame indices {failed:?}")]
    PartialLoad { failed: Vec<usize> },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}
