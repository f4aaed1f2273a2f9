//! Color theme for the player chrome - ANSI colors for terminal compatibility

use ratatui::style::{Color, Modifier, Style};
use std::str::FromStr;

/// Styles shared by the header, status and help bars
pub struct Theme;

impl Theme {
    pub const CYAN: Color = Color::Cyan;
    pub const GREEN: Color = Color::Green;
    pub const YELLOW: Color = Color::Yellow;
    pub const RED: Color = Color::Red;
    pub const DARK_GRAY: Color = Color::DarkGray;

    pub fn title() -> Style {
        Style::default()
            .fg(Self::CYAN)
            .add_modifier(Modifier::BOLD)
    }

    pub fn dim() -> Style {
        Style::default().add_modifier(Modifier::DIM)
    }

    pub fn success() -> Style {
        Style::default().fg(Self::GREEN)
    }

    pub fn warning() -> Style {
        Style::default().fg(Self::YELLOW)
    }

    pub fn error() -> Style {
        Style::default().fg(Self::RED)
    }

    pub fn accent() -> Style {
        Style::default().fg(Self::CYAN)
    }

    pub fn muted() -> Style {
        Style::default().fg(Self::DARK_GRAY)
    }

    pub fn placeholder() -> Style {
        Style::default()
            .fg(Self::DARK_GRAY)
            .add_modifier(Modifier::ITALIC)
    }

    // Key hints
    pub fn key() -> Style {
        Style::default()
            .fg(Self::CYAN)
            .add_modifier(Modifier::BOLD)
    }

    pub fn key_desc() -> Style {
        Style::default().fg(Self::DARK_GRAY)
    }
}

/// Parse a user-supplied frame color (`"green"`, `"light-blue"`, `"#33ff99"`).
pub fn parse_color(value: &str) -> Option<Color> {
    Color::from_str(value.trim()).ok()
}

/// Parse a two-stop gradient, `"#ff0080..#00c0ff"`. Both stops must be RGB.
pub fn parse_gradient(value: &str) -> Option<(Color, Color)> {
    let (from, to) = value.split_once("..")?;
    match (parse_color(from)?, parse_color(to)?) {
        (from @ Color::Rgb(..), to @ Color::Rgb(..)) => Some((from, to)),
        _ => None,
    }
}

/// Linear blend of two RGB colors; `t` is clamped to `0.0..=1.0`.
pub fn lerp_color(from: Color, to: Color, t: f64) -> Color {
    let (Color::Rgb(r0, g0, b0), Color::Rgb(r1, g1, b1)) = (from, to) else {
        return from;
    };
    let t = t.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
    Color::Rgb(mix(r0, r1), mix(g0, g1), mix(b0, b1))
}
