//! Terminal player
//!
//! ratatui draws the chrome (header, status, key hints); the animation rows
//! are written directly by [`TerminalSurface`].

mod app;
pub mod frames;
mod shimmer;
mod surface;
mod theme;
mod widgets;

pub use app::{App, PlaybackSource};
pub use surface::TerminalSurface;
pub use theme::{parse_color, parse_gradient, Theme};
