//! Main TUI application

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, DisableFocusChange, EnableFocusChange, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Terminal,
};
use tokio::sync::watch;
use tracing::{debug, error, info};

use super::surface::TerminalSurface;
use super::theme::{parse_color, parse_gradient};
use super::widgets::{HeaderBar, HelpBar, Placeholder, StatusBar};
use crate::config::{FitMode, PlayerConfig};
use crate::frame_source::FrameTransport;
use crate::loader::{AnimationSource, FrameSet, LoadState, ProgressiveLoader};
use crate::scheduler::PlaybackScheduler;
use crate::viewport::{intersection_ratio, natural_size, Area, FitLayer, ViewportGate, Visibility};

/// Render loop period (~60 fps), also the key poll timeout
const POLL_INTERVAL: Duration = Duration::from_millis(16);
const SPINNER_INTERVAL: Duration = Duration::from_millis(80);

/// Below this the animation area counts as not visible.
const MIN_ANIMATION_WIDTH: u16 = 8;
const MIN_ANIMATION_HEIGHT: u16 = 3;

const ZOOM_STEP: f64 = 1.1;

/// What the player shows
#[derive(Debug, Clone)]
pub enum PlaybackSource {
    /// Frames fetched progressively from an origin
    Remote(AnimationSource),
    /// A fixed frame set, nothing to fetch
    Explicit(Vec<String>),
}

/// Terminal player for one animation
pub struct App<T: FrameTransport> {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    loader: ProgressiveLoader<T>,
    frames_rx: watch::Receiver<FrameSet>,
    source: PlaybackSource,
    title: String,
    origin: String,
    scheduler: PlaybackScheduler<TerminalSurface>,
    gate: ViewportGate,
    fit: FitLayer,
    /// Frame set currently handed to the scheduler
    frame_set: FrameSet,
    /// Full terminal area as of the last draw
    viewport: Rect,
    focused: bool,
    /// Paused with the space key; visibility changes do not resume
    user_paused: bool,
    spinner_frame: usize,
    should_quit: bool,
    needs_repaint: bool,
}

impl<T: FrameTransport> App<T> {
    /// Take over the terminal. It is restored when the app is dropped.
    pub fn new(
        loader: ProgressiveLoader<T>,
        source: PlaybackSource,
        title: String,
        origin: String,
        config: &PlayerConfig,
    ) -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.hide_cursor()?;

        let mut surface = TerminalSurface::stdout();
        surface.set_show_counter(config.show_frame_counter);
        if let Some(name) = config.color.as_deref() {
            match parse_color(name) {
                Some(color) => surface.set_color(Some(color)),
                None => debug!("ignoring unknown color \"{}\"", name),
            }
        }
        if let Some(spec) = config.gradient.as_deref() {
            match parse_gradient(spec) {
                Some(stops) => surface.set_gradient(Some(stops)),
                None => debug!("ignoring gradient \"{}\", expected \"#rrggbb..#rrggbb\"", spec),
            }
        }

        let frames_rx = loader.subscribe();
        Ok(Self {
            terminal,
            loader,
            frames_rx,
            source,
            title,
            origin,
            scheduler: PlaybackScheduler::new(surface, config.fps),
            gate: ViewportGate::new(config.lazy, config.reduced_motion),
            fit: FitLayer::new(config.fit, config.zoom, config.offset_y),
            frame_set: FrameSet::default(),
            viewport: Rect::default(),
            focused: true,
            user_paused: false,
            spinner_frame: 0,
            should_quit: false,
            needs_repaint: false,
        })
    }

    /// Run the render loop until the user quits
    pub async fn run(&mut self) -> io::Result<()> {
        // Drop events queued during terminal setup
        while event::poll(Duration::from_millis(0))? {
            let _ = event::read()?;
        }

        self.start_loading();
        let mut last_spinner_update = Instant::now();

        while !self.should_quit {
            self.sync_frames();

            if last_spinner_update.elapsed() >= SPINNER_INTERVAL {
                self.spinner_frame = self.spinner_frame.wrapping_add(1);
                last_spinner_update = Instant::now();
            }

            self.draw()?;

            let now = Instant::now();
            self.observe_visibility();
            self.update_fade(now);
            if self.needs_repaint {
                self.scheduler.paint();
                self.needs_repaint = false;
            }
            self.scheduler.on_animation_frame(now);

            if event::poll(POLL_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Resize(width, height) => {
                        debug!("terminal resized to {}x{}", width, height);
                        self.terminal.autoresize()?;
                        self.needs_repaint = true;
                    }
                    Event::FocusGained => self.focused = true,
                    Event::FocusLost => self.focused = false,
                    _ => {}
                }
            }
        }

        Ok(())
    }

    /// (Re)load the configured source from scratch.
    fn start_loading(&mut self) {
        self.scheduler.pause();
        self.gate.reset();
        self.fit.reset();
        self.scheduler.surface_mut().set_transform(None);

        match &self.source {
            PlaybackSource::Explicit(frames) => {
                self.loader.set_explicit_frames(frames);
            }
            PlaybackSource::Remote(source) => {
                self.loader.set_source(source.clone());
                let loader = self.loader.clone();
                tokio::spawn(async move {
                    if let Err(e) = loader.load_first_frame().await {
                        error!("{}", e);
                    }
                });
            }
        }
    }

    /// Adopt the latest published frame set, if any.
    fn sync_frames(&mut self) {
        if !matches!(self.frames_rx.has_changed(), Ok(true)) {
            return;
        }
        let set = self.frames_rx.borrow_and_update().clone();

        let new_source = set.generation != self.frame_set.generation;
        let resized = set.len() != self.frame_set.len();
        if new_source {
            self.scheduler.replace_frames(set.frames.clone());
        } else {
            self.scheduler.set_frames(set.frames.clone());
        }
        // A different frame count re-arms visibility tracking from scratch
        if new_source || resized {
            self.scheduler.pause();
            self.gate.reset();
        }
        if set.state == LoadState::FullyLoaded && self.frame_set.state != LoadState::FullyLoaded {
            info!("playing {} frames", set.len());
        }

        self.frame_set = set;
        self.refit(Instant::now());
    }

    fn refit(&mut self, now: Instant) {
        let area = self.scheduler.surface().area();
        let (natural_w, natural_h) = self.scheduler.current_frame().map(natural_size).unwrap_or((0, 0));
        let transform = self.fit.update(
            (f64::from(area.width), f64::from(area.height)),
            (natural_w as f64, natural_h as f64),
            now,
        );
        if transform.is_some() {
            self.scheduler.surface_mut().set_transform(transform);
        }
        self.needs_repaint = true;
    }

    fn observe_visibility(&mut self) {
        if self.frame_set.is_empty() {
            return;
        }
        let area = self.scheduler.surface().area();
        let ratio = if !self.focused || area.width < MIN_ANIMATION_WIDTH || area.height < MIN_ANIMATION_HEIGHT {
            0.0
        } else {
            intersection_ratio(to_area(area), to_area(self.viewport))
        };

        match self.gate.observe(ratio, &mut self.scheduler, &self.loader) {
            Some(Visibility::Entered) => {
                if self.user_paused {
                    self.scheduler.pause();
                }
                debug!("animation in view");
            }
            Some(Visibility::Left) => debug!("animation out of view"),
            None => {}
        }
    }

    fn update_fade(&mut self, now: Instant) {
        let dim = self.fit.transform().is_some() && self.fit.opacity(now) < 1.0;
        if dim != self.scheduler.surface().is_dim() {
            self.scheduler.surface_mut().set_dim(dim);
            self.needs_repaint = true;
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(' ') => {
                if self.scheduler.is_running() {
                    self.scheduler.pause();
                    self.user_paused = true;
                } else {
                    self.user_paused = false;
                    self.scheduler.start();
                }
            }
            KeyCode::Char('r') => {
                info!("reloading \"{}\"", self.title);
                self.start_loading();
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.fit.set_zoom(self.fit.zoom() * ZOOM_STEP);
                self.refit(Instant::now());
            }
            KeyCode::Char('-') => {
                self.fit.set_zoom(self.fit.zoom() / ZOOM_STEP);
                self.refit(Instant::now());
            }
            KeyCode::Char('f') => {
                let fit = match self.fit.fit() {
                    FitMode::Contain => FitMode::Cover,
                    FitMode::Cover => FitMode::Contain,
                };
                self.fit.set_fit(fit);
                self.refit(Instant::now());
            }
            KeyCode::Char('c') => {
                let surface = self.scheduler.surface_mut();
                let show = !surface.show_counter_enabled();
                surface.set_show_counter(show);
                self.needs_repaint = true;
            }
            _ => {}
        }
    }

    fn draw(&mut self) -> io::Result<()> {
        let title = self.title.as_str();
        let origin = self.origin.as_str();
        let set = &self.frame_set;
        let playing = self.scheduler.is_running();
        let spinner_frame = self.spinner_frame;
        let loaded = set.len();

        let mut animation_area = Rect::default();
        let mut viewport = Rect::default();

        self.terminal.draw(|f| {
            let size = f.area();
            viewport = size;

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(1), // Header
                    Constraint::Length(1), // Status
                    Constraint::Min(1),    // Animation
                    Constraint::Length(1), // Help
                ])
                .split(size);

            f.render_widget(
                HeaderBar {
                    title,
                    origin,
                    is_loading: set.state.is_loading(),
                },
                chunks[0],
            );

            f.render_widget(
                StatusBar {
                    state: set.state,
                    loaded,
                    total: set.total,
                    fallback: set.fallback.as_ref(),
                    playing,
                    spinner_frame,
                },
                chunks[1],
            );

            // The animation itself is written by the surface, not by ratatui
            animation_area = chunks[2];
            if set.is_empty() {
                let placeholder = if set.state.is_loading() {
                    Placeholder {
                        text: "Loading frames...",
                        spinner: Some(spinner_frame),
                    }
                } else {
                    Placeholder {
                        text: "No frames loaded",
                        spinner: None,
                    }
                };
                f.render_widget(placeholder, chunks[2]);
            }

            f.render_widget(HelpBar, chunks[3]);
        })?;

        self.viewport = viewport;
        if animation_area != self.scheduler.surface().area() {
            self.scheduler.surface_mut().set_area(animation_area);
            self.refit(Instant::now());
        }
        Ok(())
    }
}

fn to_area(rect: Rect) -> Area {
    Area::new(rect.x, rect.y, rect.width, rect.height)
}

impl<T: FrameTransport> Drop for App<T> {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            DisableFocusChange,
            LeaveAlternateScreen
        );
        let _ = self.terminal.show_cursor();
    }
}
