//! Chrome widgets around the animation area

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

use super::shimmer::{shimmer_spans, AnimatedDots, ProgressBar};
use super::theme::Theme;
use crate::frame_source::SourceFallback;
use crate::loader::LoadState;

const PROGRESS_WIDTH: usize = 12;

/// Header bar with the animation name and where it comes from
pub struct HeaderBar<'a> {
    pub title: &'a str,
    pub origin: &'a str,
    pub is_loading: bool,
}

impl Widget for HeaderBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        let mut spans = vec![Span::styled("◆ ", Theme::accent())];
        if self.is_loading {
            spans.extend(shimmer_spans(self.title, Theme::title()));
        } else {
            spans.push(Span::styled(self.title, Theme::title()));
        }
        buf.set_line(area.x + 1, area.y, &Line::from(spans), area.width.saturating_sub(2));

        let origin = format!("{} ", self.origin);
        let origin_len = origin.width() as u16;
        let origin_x = area.x + area.width.saturating_sub(origin_len + 1);
        buf.set_span(origin_x, area.y, &Span::styled(origin, Theme::muted()), origin_len + 1);
    }
}

/// Load state, progress and playback state
pub struct StatusBar<'a> {
    pub state: LoadState,
    pub loaded: usize,
    pub total: usize,
    pub fallback: Option<&'a SourceFallback>,
    pub playing: bool,
    pub spinner_frame: usize,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = Vec::new();
        match self.state {
            LoadState::Empty => {
                spans.push(Span::styled("✗ ", Theme::error()));
                spans.push(Span::styled(self.state.label(), Theme::error()));
            }
            LoadState::Aborted => {
                spans.push(Span::styled("✗ ", Theme::error()));
                spans.push(Span::styled(
                    format!("{} ({}/{} frames)", self.state.label(), self.loaded, self.total),
                    Theme::error(),
                ));
            }
            LoadState::FullyLoaded => {
                spans.push(Span::styled("● ", Theme::success()));
                spans.push(Span::styled(format!("{} frames", self.loaded), Theme::dim()));
            }
            state if state.is_loading() => {
                let spinner = AnimatedDots::new(self.spinner_frame);
                spans.push(Span::styled(format!("{} ", spinner.current()), Theme::accent()));
                spans.push(Span::styled(state.label(), Theme::accent()));
                if self.total > 0 {
                    spans.push(Span::raw(" "));
                    spans.push(Span::styled(
                        ProgressBar::for_frames(self.loaded, self.total, PROGRESS_WIDTH),
                        Theme::accent(),
                    ));
                    spans.push(Span::styled(format!(" {}/{}", self.loaded, self.total), Theme::dim()));
                }
            }
            state => {
                spans.push(Span::styled("○ ", Theme::dim()));
                spans.push(Span::styled(state.label(), Theme::dim()));
            }
        }

        spans.push(Span::styled(" │ ", Theme::muted()));
        if self.playing {
            spans.push(Span::styled("▶ playing", Theme::success()));
        } else {
            spans.push(Span::styled("⏸ paused", Theme::dim()));
        }

        if let Some(fallback) = self.fallback {
            spans.push(Span::styled(" │ ", Theme::muted()));
            spans.push(Span::styled(fallback.to_string(), Theme::warning()));
        }

        buf.set_line(area.x + 1, area.y, &Line::from(spans), area.width.saturating_sub(2));
    }
}

/// Centered message shown in the animation area while it has no frames
pub struct Placeholder<'a> {
    pub text: &'a str,
    pub spinner: Option<usize>,
}

impl Widget for Placeholder<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let mut spans = Vec::new();
        if let Some(frame) = self.spinner {
            spans.push(Span::styled(
                format!("{} ", AnimatedDots::new(frame).current()),
                Theme::accent(),
            ));
        }
        spans.push(Span::styled(self.text, Theme::placeholder()));
        let line = Line::from(spans);

        let width = line.width() as u16;
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height / 2;
        buf.set_line(x, y, &line, area.width);
    }
}

/// Help bar showing key bindings
pub struct HelpBar;

impl Widget for HelpBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bindings = [
            ("Space", "Play/Pause"),
            ("r", "Reload"),
            ("+/-", "Zoom"),
            ("f", "Fit"),
            ("c", "Counter"),
            ("q", "Quit"),
        ];

        let mut spans = vec![Span::raw(" ")];
        for (i, (key, desc)) in bindings.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" │ ", Theme::muted()));
            }
            spans.push(Span::styled(*key, Theme::key()));
            spans.push(Span::styled(format!(" {}", desc), Theme::key_desc()));
        }

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}
