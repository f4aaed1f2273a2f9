//! Terminal display surface.
//!
//! Frames are written straight to the terminal with crossterm, bypassing
//! ratatui's double-buffered diff so every tick only touches the animation
//! rows. ratatui never draws into the animation area while frames are
//! showing, so the two never fight over the same cells.

use std::io::{self, Stdout, Write};

use crossterm::{
    cursor,
    style::{self, Attribute, Print, SetAttribute},
    QueueableCommand,
};
use ratatui::layout::Rect;
use ratatui::style::Color;
use tracing::debug;

use super::theme::lerp_color;
use crate::scheduler::{frame_counter_text, DisplaySurface};
use crate::viewport::{compose, Transform};

/// Writes frames into a fixed rectangle of the terminal.
pub struct TerminalSurface<W: Write = Stdout> {
    out: W,
    area: Rect,
    transform: Option<Transform>,
    color: Option<Color>,
    gradient: Option<(Color, Color)>,
    dim: bool,
    show_counter: bool,
}

impl TerminalSurface<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            area: Rect::default(),
            transform: None,
            color: None,
            gradient: None,
            dim: false,
            show_counter: false,
        }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
    }

    /// `None` hides the frame until the next successful fit.
    pub fn set_transform(&mut self, transform: Option<Transform>) {
        self.transform = transform;
    }

    pub fn set_color(&mut self, color: Option<Color>) {
        self.color = color;
    }

    /// Top-to-bottom gradient across the visible rows of the frame.
    /// Takes precedence over the flat color.
    pub fn set_gradient(&mut self, gradient: Option<(Color, Color)>) {
        self.gradient = gradient;
    }

    pub fn set_dim(&mut self, dim: bool) {
        self.dim = dim;
    }

    pub fn is_dim(&self) -> bool {
        self.dim
    }

    pub fn set_show_counter(&mut self, show: bool) {
        self.show_counter = show;
    }

    pub fn show_counter_enabled(&self) -> bool {
        self.show_counter
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    fn write_frame(&mut self, text: &str) -> io::Result<()> {
        let Rect { x, y, width, height } = self.area;
        if width == 0 || height == 0 {
            return Ok(());
        }

        let mut rows: Vec<String> = vec![String::new(); height as usize];
        let mut painted: Option<(u16, u16)> = None;
        if let Some(transform) = self.transform {
            for placed in compose(text, width, height, transform) {
                let row = &mut rows[placed.row as usize];
                row.push_str(&" ".repeat(placed.col as usize));
                row.push_str(&placed.text);
                let (first, _) = painted.unwrap_or((placed.row, placed.row));
                painted = Some((first, placed.row));
            }
        }

        if let (None, Some(color)) = (self.gradient, self.color) {
            self.out.queue(style::SetForegroundColor(color.into()))?;
        }
        if self.dim {
            self.out.queue(SetAttribute(Attribute::Dim))?;
        }
        for (i, row) in rows.iter().enumerate() {
            if let (Some((from, to)), Some((first, last))) = (self.gradient, painted) {
                let span = f64::from(last - first).max(1.0);
                let t = (i as f64 - f64::from(first)) / span;
                self.out.queue(style::SetForegroundColor(lerp_color(from, to, t).into()))?;
            }
            // Pad every row to the full width so the previous frame is overwritten
            let used = row.chars().count();
            let padded = format!("{}{}", row, " ".repeat((width as usize).saturating_sub(used)));
            self.out.queue(cursor::MoveTo(x, y + i as u16))?;
            self.out.queue(Print(padded))?;
        }
        self.out.queue(SetAttribute(Attribute::Reset))?;
        self.out.queue(style::ResetColor)?;
        self.out.flush()
    }

    fn write_counter(&mut self, index: usize, total: usize) -> io::Result<()> {
        let Rect { x, y, width, height } = self.area;
        let label = format!(" {} ", frame_counter_text(index, total));
        let len = label.chars().count() as u16;
        if height == 0 || len > width {
            return Ok(());
        }
        self.out.queue(cursor::MoveTo(x + width - len, y))?;
        self.out.queue(SetAttribute(Attribute::Reverse))?;
        self.out.queue(Print(label))?;
        self.out.queue(SetAttribute(Attribute::Reset))?;
        self.out.flush()
    }
}

impl<W: Write> DisplaySurface for TerminalSurface<W> {
    fn show_frame(&mut self, text: &str) {
        if let Err(e) = self.write_frame(text) {
            debug!("frame write failed: {}", e);
        }
    }

    fn show_counter(&mut self, index: usize, total: usize) {
        if !self.show_counter {
            return;
        }
        if let Err(e) = self.write_counter(index, total) {
            debug!("counter write failed: {}", e);
        }
    }
}
