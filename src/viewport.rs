//! Visibility gating and fit/scale computation for the animation area.

use crate::config::FitMode;
use crate::scheduler::{DisplaySurface, PlaybackScheduler};
use std::time::{Duration, Instant};

/// Fraction of the area that must be visible to count as "in view".
pub const VISIBILITY_THRESHOLD: f64 = 0.1;

/// Contain mode leaves a small margin around the frame.
const CONTAIN_MARGIN: f64 = 0.95;

pub const FADE_IN: Duration = Duration::from_millis(500);

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 20.0;

// ─── Viewport gate ───────────────────────────────────────────────────

/// Starts the deferred full load when the animation first comes into view.
pub trait LazyLoadTrigger {
    fn full_load_triggered(&self) -> bool;
    fn trigger_full_load(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Entered,
    Left,
}

/// A rectangle in terminal cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Area {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Area {
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    fn cells(&self) -> u32 {
        u32::from(self.width) * u32::from(self.height)
    }
}

/// Share of `target` that lies inside `viewport`, in `0.0..=1.0`.
pub fn intersection_ratio(target: Area, viewport: Area) -> f64 {
    if target.cells() == 0 {
        return 0.0;
    }
    let left = target.x.max(viewport.x);
    let top = target.y.max(viewport.y);
    let right = (u32::from(target.x) + u32::from(target.width))
        .min(u32::from(viewport.x) + u32::from(viewport.width));
    let bottom = (u32::from(target.y) + u32::from(target.height))
        .min(u32::from(viewport.y) + u32::from(viewport.height));
    if right <= u32::from(left) || bottom <= u32::from(top) {
        return 0.0;
    }
    let visible = (right - u32::from(left)) * (bottom - u32::from(top));
    f64::from(visible) / f64::from(target.cells())
}

/// Turns visibility observations into playback and lazy-load decisions.
#[derive(Debug, Clone)]
pub struct ViewportGate {
    lazy: bool,
    reduced_motion: bool,
    threshold: f64,
    intersecting: Option<bool>,
}

impl ViewportGate {
    pub fn new(lazy: bool, reduced_motion: bool) -> Self {
        Self {
            lazy,
            reduced_motion,
            threshold: VISIBILITY_THRESHOLD,
            intersecting: None,
        }
    }

    pub fn is_intersecting(&self) -> bool {
        self.intersecting.unwrap_or(false)
    }

    /// Forget the last observation; the next one always reports a transition.
    pub fn reset(&mut self) {
        self.intersecting = None;
    }

    /// Record a visible ratio and act on a crossing of the threshold.
    ///
    /// Entering view starts the deferred load (if lazy and not yet started)
    /// and, unless reduced motion is requested, playback. Leaving view always
    /// pauses playback.
    pub fn observe<S, L>(
        &mut self,
        ratio: f64,
        scheduler: &mut PlaybackScheduler<S>,
        loader: &L,
    ) -> Option<Visibility>
    where
        S: DisplaySurface,
        L: LazyLoadTrigger + ?Sized,
    {
        let now_intersecting = ratio >= self.threshold && ratio > 0.0;
        if self.intersecting == Some(now_intersecting) {
            return None;
        }
        self.intersecting = Some(now_intersecting);

        if now_intersecting {
            if self.lazy && !loader.full_load_triggered() {
                loader.trigger_full_load();
            }
            if !self.reduced_motion {
                scheduler.start();
            }
            Some(Visibility::Entered)
        } else {
            scheduler.pause();
            Some(Visibility::Left)
        }
    }
}

// ─── Fit / scale ─────────────────────────────────────────────────────

/// Uniform scale plus vertical offset applied to the frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: f64,
    /// Percent of the unscaled frame height
    pub offset_y: f64,
}

/// Scale for fitting `natural` into `available`. `None` if the content has
/// no size yet.
pub fn compute_scale(fit: FitMode, zoom: f64, available: (f64, f64), natural: (f64, f64)) -> Option<f64> {
    let (available_w, available_h) = available;
    let (natural_w, natural_h) = natural;
    if natural_w <= 0.0 || natural_h <= 0.0 {
        return None;
    }

    let scale_x = available_w / natural_w;
    let scale_y = available_h / natural_h;
    let scale = match fit {
        FitMode::Contain => scale_x.min(scale_y) * CONTAIN_MARGIN,
        FitMode::Cover => scale_x.max(scale_y),
    };
    Some(scale * zoom)
}

fn clamp_zoom(zoom: f64) -> Option<f64> {
    (zoom.is_finite() && zoom > 0.0).then(|| zoom.clamp(MIN_ZOOM, MAX_ZOOM))
}

/// Tracks the current transform and the fade-in that follows the first fit.
#[derive(Debug, Clone)]
pub struct FitLayer {
    fit: FitMode,
    zoom: f64,
    offset_y: f64,
    transform: Option<Transform>,
    revealed_at: Option<Instant>,
}

impl FitLayer {
    pub fn new(fit: FitMode, zoom: f64, offset_y: f64) -> Self {
        Self {
            fit,
            zoom: clamp_zoom(zoom).unwrap_or(1.0),
            offset_y,
            transform: None,
            revealed_at: None,
        }
    }

    pub fn fit(&self) -> FitMode {
        self.fit
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn set_fit(&mut self, fit: FitMode) {
        self.fit = fit;
    }

    /// Clamped to `MIN_ZOOM..=MAX_ZOOM`; non-positive values are ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        if let Some(zoom) = clamp_zoom(zoom) {
            self.zoom = zoom;
        }
    }

    pub fn transform(&self) -> Option<Transform> {
        self.transform
    }

    /// Hide the frame again until the next successful fit (new source).
    pub fn reset(&mut self) {
        self.transform = None;
        self.revealed_at = None;
    }

    /// Recompute on resize or frame change. A zero-sized frame leaves the
    /// previous transform in place.
    pub fn update(&mut self, available: (f64, f64), natural: (f64, f64), now: Instant) -> Option<Transform> {
        let scale = compute_scale(self.fit, self.zoom, available, natural)?;
        let transform = Transform {
            scale,
            offset_y: self.offset_y,
        };
        self.transform = Some(transform);
        if self.revealed_at.is_none() {
            self.revealed_at = Some(now);
        }
        Some(transform)
    }

    /// 0.0 before the first fit, then ramps to 1.0 over [`FADE_IN`].
    pub fn opacity(&self, now: Instant) -> f64 {
        let Some(revealed_at) = self.revealed_at else {
            return 0.0;
        };
        let elapsed = now.saturating_duration_since(revealed_at);
        (elapsed.as_secs_f64() / FADE_IN.as_secs_f64()).min(1.0)
    }
}

// ─── Applying the transform to text ──────────────────────────────────

/// Natural size of a frame: (widest row in chars, row count).
pub fn natural_size(frame: &str) -> (usize, usize) {
    let rows: Vec<&str> = frame.split('\n').collect();
    let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
    let height = if frame.is_empty() { 0 } else { rows.len() };
    (width, height)
}

/// A frame resampled by `scale`, evaluated lazily one cell at a time so
/// only the visible window is ever materialized.
struct ScaledFrame {
    rows: Vec<Vec<char>>,
    width: usize,
    scale: f64,
    target_h: i64,
    target_w: i64,
}

impl ScaledFrame {
    fn new(frame: &str, scale: f64) -> Option<Self> {
        let rows: Vec<Vec<char>> = frame.split('\n').map(|r| r.chars().collect()).collect();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        if rows.is_empty() || width == 0 || !(scale.is_finite() && scale > 0.0) {
            return None;
        }
        // `as` saturates, so absurd scales cannot wrap
        let target_h = (rows.len() as f64 * scale).round() as i64;
        let target_w = (width as f64 * scale).round() as i64;
        Some(Self {
            rows,
            width,
            scale,
            target_h,
            target_w,
        })
    }

    /// Nearest-neighbour sample of scaled columns `from..to` in scaled row `y`.
    fn sample(&self, y: i64, from: i64, to: i64) -> String {
        let src_y = ((y as f64 / self.scale) as usize).min(self.rows.len() - 1);
        let row = &self.rows[src_y];
        (from..to)
            .map(|x| {
                let src_x = ((x as f64 / self.scale) as usize).min(self.width - 1);
                row.get(src_x).copied().unwrap_or(' ')
            })
            .collect()
    }
}

/// Nearest-neighbour resample of a whole frame by `scale`.
pub fn scale_lines(frame: &str, scale: f64) -> Vec<String> {
    let Some(scaled) = ScaledFrame::new(frame, scale) else {
        return Vec::new();
    };
    (0..scaled.target_h)
        .map(|y| scaled.sample(y, 0, scaled.target_w))
        .collect()
}

/// One clipped row of the transformed frame, relative to the container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedRow {
    pub row: u16,
    pub col: u16,
    pub text: String,
}

/// Scale the frame, center it in a `width`×`height` container, shift it by
/// the vertical offset and clip whatever falls outside.
///
/// Only cells inside the container are sampled, so the cost is bounded by
/// the container size whatever the scale.
pub fn compose(frame: &str, width: u16, height: u16, transform: Transform) -> Vec<PlacedRow> {
    let Some(scaled) = ScaledFrame::new(frame, transform.scale) else {
        return Vec::new();
    };
    let (_, natural_h) = natural_size(frame);
    let (width, height) = (i64::from(width), i64::from(height));

    let offset_rows = (transform.offset_y / 100.0 * natural_h as f64).round() as i64;
    let top = ((height - scaled.target_h) / 2).saturating_add(offset_rows);
    let left = (width - scaled.target_w) / 2;

    let col = left.max(0);
    let right = left.saturating_add(scaled.target_w).min(width);
    if col >= right {
        return Vec::new();
    }

    (0..height)
        .filter_map(|y| {
            let src = y.saturating_sub(top);
            if src < 0 || src >= scaled.target_h {
                return None;
            }
            Some(PlacedRow {
                row: y as u16,
                col: col as u16,
                text: scaled.sample(src, col - left, right - left),
            })
        })
        .collect()
}
