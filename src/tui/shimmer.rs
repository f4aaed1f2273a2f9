//! Loading indicators for the chrome: a sweeping highlight, a braille
//! spinner and a load-progress bar.

use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

static PROCESS_START: OnceLock<Instant> = OnceLock::new();

fn elapsed_since_start() -> Duration {
    let start = PROCESS_START.get_or_init(Instant::now);
    start.elapsed()
}

/// Text with a highlight band sweeping across it every two seconds.
pub fn shimmer_spans(text: &str, base: Style) -> Vec<Span<'static>> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }

    let padding = 10usize;
    let period = chars.len() + padding * 2;
    let sweep_seconds = 2.0f32;
    let pos = (elapsed_since_start().as_secs_f32() % sweep_seconds) / sweep_seconds * period as f32;
    let band_half_width = 5.0;

    chars
        .iter()
        .enumerate()
        .map(|(i, ch)| {
            let dist = ((i + padding) as f32 - pos).abs();
            let intensity = if dist <= band_half_width {
                let x = std::f32::consts::PI * (dist / band_half_width);
                0.5 * (1.0 + x.cos())
            } else {
                0.0
            };
            Span::styled(ch.to_string(), style_for_intensity(base, intensity))
        })
        .collect()
}

fn style_for_intensity(base: Style, intensity: f32) -> Style {
    if intensity < 0.2 {
        base.add_modifier(Modifier::DIM)
    } else if intensity < 0.6 {
        base
    } else {
        base.add_modifier(Modifier::BOLD)
    }
}

/// Braille spinner, advanced by the render loop
pub struct AnimatedDots {
    frame: usize,
}

impl AnimatedDots {
    const FRAMES: &'static [&'static str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

    pub fn new(frame: usize) -> Self {
        Self { frame }
    }

    pub fn current(&self) -> &'static str {
        Self::FRAMES[self.frame % Self::FRAMES.len()]
    }
}

/// Fixed-width bar for `loaded / total` frames
pub struct ProgressBar;

impl ProgressBar {
    const FULL: char = '█';
    const EMPTY: char = '░';
    const PARTIAL: [char; 8] = ['▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];

    pub fn render(progress: f32, width: usize) -> String {
        let progress = if progress.is_finite() { progress.clamp(0.0, 1.0) } else { 0.0 };
        let filled = (progress * width as f32) as usize;
        let partial_idx = ((progress * width as f32 - filled as f32) * 8.0) as usize;

        (0..width)
            .map(|i| {
                if i < filled {
                    Self::FULL
                } else if i == filled && partial_idx > 0 {
                    Self::PARTIAL[partial_idx.min(7)]
                } else {
                    Self::EMPTY
                }
            })
            .collect()
    }

    pub fn for_frames(loaded: usize, total: usize, width: usize) -> String {
        if total == 0 {
            return Self::render(0.0, width);
        }
        Self::render(loaded as f32 / total as f32, width)
    }
}
