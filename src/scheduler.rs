//! Fixed-tick playback scheduler.
//!
//! The host render loop calls [`PlaybackScheduler::on_animation_frame`] once
//! per display frame. The scheduler only reacts while it has a pending frame
//! request (between `start` and `pause`). Elapsed time is accumulated and the
//! cursor advances once per whole frame interval, so a late callback catches
//! up instead of drifting. New frames are written straight into the display
//! surface; nothing else is redrawn.

use std::sync::Arc;
use std::time::{Duration, Instant};

/// Something that can show one frame of text, updated in place.
pub trait DisplaySurface {
    fn show_frame(&mut self, text: &str);

    /// Update the `Frame: N/Total` overlay. `index` is 0-based.
    fn show_counter(&mut self, _index: usize, _total: usize) {}
}

/// Overlay text for the frame counter.
pub fn frame_counter_text(index: usize, total: usize) -> String {
    format!("Frame: {}/{}", index + 1, total)
}

/// Owns the playback cursor and the surface it paints.
pub struct PlaybackScheduler<S> {
    surface: S,
    frames: Arc<[String]>,
    cursor: usize,
    frame_interval: Duration,
    /// Timestamp the cursor is synced to; `None` until the first tick after `start`
    last_frame: Option<Instant>,
    /// Id of the outstanding frame request while running
    pending: Option<u64>,
    next_request: u64,
}

impl<S: DisplaySurface> PlaybackScheduler<S> {
    pub fn new(surface: S, fps: f64) -> Self {
        Self {
            surface,
            frames: Arc::from(Vec::new()),
            cursor: 0,
            frame_interval: interval_for(fps),
            last_frame: None,
            pending: None,
            next_request: 0,
        }
    }

    pub fn set_fps(&mut self, fps: f64) {
        self.frame_interval = interval_for(fps);
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Adopt a rebuilt frame list from the same source. The cursor is kept
    /// unless it no longer fits, in which case it goes back to 0.
    pub fn set_frames(&mut self, frames: Arc<[String]>) {
        self.frames = frames;
        if self.cursor >= self.frames.len() {
            self.cursor = 0;
        }
        self.paint();
    }

    /// Adopt frames from a different source: cursor back to 0.
    pub fn replace_frames(&mut self, frames: Arc<[String]>) {
        self.frames = frames;
        self.cursor = 0;
        self.paint();
    }

    /// Back to the first frame and repaint.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.paint();
    }

    /// Begin requesting frames. No-op while already running.
    pub fn start(&mut self) {
        if self.pending.is_some() {
            return;
        }
        self.next_request += 1;
        self.pending = Some(self.next_request);
    }

    /// Cancel the pending request and forget the last timestamp, so resuming
    /// does not catch up through the paused time. No-op while paused.
    pub fn pause(&mut self) {
        if self.pending.take().is_none() {
            return;
        }
        self.last_frame = None;
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_request(&self) -> Option<u64> {
        self.pending
    }

    /// Frame callback. Returns how many frames the cursor advanced.
    pub fn on_animation_frame(&mut self, now: Instant) -> usize {
        if self.pending.is_none() {
            return 0;
        }

        let Some(mut last_frame) = self.last_frame else {
            self.last_frame = Some(now);
            return 0;
        };

        let mut delta = now.saturating_duration_since(last_frame);
        let mut advanced = 0;
        while delta >= self.frame_interval {
            if self.advance() {
                advanced += 1;
            }
            delta -= self.frame_interval;
            last_frame += self.frame_interval;
        }
        self.last_frame = Some(last_frame);
        advanced
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn frames(&self) -> &Arc<[String]> {
        &self.frames
    }

    pub fn current_frame(&self) -> Option<&str> {
        self.frames.get(self.cursor).map(String::as_str)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Write the current frame to the surface again (after a resize, say).
    pub fn paint(&mut self) {
        if let Some(frame) = self.frames.get(self.cursor) {
            self.surface.show_frame(frame);
            self.surface.show_counter(self.cursor, self.frames.len());
        }
    }

    fn advance(&mut self) -> bool {
        let len = self.frames.len();
        if len < 2 {
            return false;
        }
        self.cursor = (self.cursor + 1) % len;
        self.paint();
        true
    }
}

fn interval_for(fps: f64) -> Duration {
    if fps.is_finite() && fps > 0.0 {
        Duration::from_secs_f64(1.0 / fps)
    } else {
        Duration::from_secs(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSurface {
        shown: Vec<String>,
        counters: Vec<String>,
    }

    impl DisplaySurface for RecordingSurface {
        fn show_frame(&mut self, text: &str) {
            self.shown.push(text.to_string());
        }

        fn show_counter(&mut self, index: usize, total: usize) {
            self.counters.push(frame_counter_text(index, total));
        }
    }

    fn frames(count: usize) -> Arc<[String]> {
        (0..count).map(|i| format!("f{i}")).collect::<Vec<_>>().into()
    }

    /// 20 fps gives an exact 50 ms interval.
    fn scheduler(count: usize) -> PlaybackScheduler<RecordingSurface> {
        let mut scheduler = PlaybackScheduler::new(RecordingSurface::default(), 20.0);
        scheduler.set_frames(frames(count));
        scheduler
    }

    #[test]
    fn test_first_tick_only_records_time() {
        let mut s = scheduler(3);
        s.start();
        let t0 = Instant::now();
        assert_eq!(s.on_animation_frame(t0), 0);
        assert_eq!(s.cursor(), 0);
        assert_eq!(s.on_animation_frame(t0 + Duration::from_millis(49)), 0);
        assert_eq!(s.on_animation_frame(t0 + Duration::from_millis(50)), 1);
        assert_eq!(s.cursor(), 1);
    }

    #[test]
    fn test_catch_up_advances_whole_intervals() {
        let mut s = scheduler(10);
        s.start();
        let t0 = Instant::now();
        s.on_animation_frame(t0);
        // 3.5 intervals late
        assert_eq!(s.on_animation_frame(t0 + Duration::from_millis(175)), 3);
        assert_eq!(s.cursor(), 3);
        // The leftover half interval carries over
        assert_eq!(s.on_animation_frame(t0 + Duration::from_millis(200)), 1);
        assert_eq!(s.cursor(), 4);
    }

    #[test]
    fn test_cursor_wraps() {
        let mut s = scheduler(5);
        s.start();
        let t0 = Instant::now();
        s.on_animation_frame(t0);
        s.on_animation_frame(t0 + Duration::from_millis(200));
        assert_eq!(s.cursor(), 4);
        s.on_animation_frame(t0 + Duration::from_millis(250));
        assert_eq!(s.cursor(), 0);
        assert_eq!(s.surface().shown.last().map(String::as_str), Some("f0"));
        assert_eq!(s.surface().counters.last().map(String::as_str), Some("Frame: 1/5"));
    }

    #[test]
    fn test_start_and_pause_are_idempotent() {
        let mut s = scheduler(3);
        s.start();
        let request = s.pending_request();
        s.start();
        assert_eq!(s.pending_request(), request);

        s.pause();
        assert!(!s.is_running());
        s.pause();
        assert!(!s.is_running());
        assert_eq!(s.pending_request(), None);
    }

    #[test]
    fn test_pause_forgets_elapsed_time() {
        let mut s = scheduler(4);
        s.start();
        let t0 = Instant::now();
        s.on_animation_frame(t0);
        s.pause();
        assert_eq!(s.on_animation_frame(t0 + Duration::from_secs(5)), 0);

        s.start();
        assert_eq!(s.on_animation_frame(t0 + Duration::from_secs(10)), 0);
        assert_eq!(s.cursor(), 0);
        assert_eq!(s.on_animation_frame(t0 + Duration::from_millis(10_050)), 1);
    }

    #[test]
    fn test_single_frame_never_advances() {
        let mut s = scheduler(1);
        s.start();
        let t0 = Instant::now();
        s.on_animation_frame(t0);
        assert_eq!(s.on_animation_frame(t0 + Duration::from_secs(1)), 0);
        assert_eq!(s.cursor(), 0);
    }

    #[test]
    fn test_cursor_clamped_when_list_shrinks() {
        let mut s = scheduler(6);
        s.start();
        let t0 = Instant::now();
        s.on_animation_frame(t0);
        s.on_animation_frame(t0 + Duration::from_millis(250));
        assert_eq!(s.cursor(), 5);

        s.set_frames(frames(3));
        assert_eq!(s.cursor(), 0);

        s.on_animation_frame(t0 + Duration::from_millis(300));
        assert_eq!(s.cursor(), 1);
        s.set_frames(frames(8));
        assert_eq!(s.cursor(), 1);

        s.replace_frames(frames(8));
        assert_eq!(s.cursor(), 0);
    }

    #[test]
    fn test_reset_repaints_first_frame() {
        let mut s = scheduler(3);
        s.start();
        let t0 = Instant::now();
        s.on_animation_frame(t0);
        s.on_animation_frame(t0 + Duration::from_millis(100));
        assert_eq!(s.cursor(), 2);

        s.reset();
        assert_eq!(s.cursor(), 0);
        assert_eq!(s.surface().shown.last().map(String::as_str), Some("f0"));
    }
}
