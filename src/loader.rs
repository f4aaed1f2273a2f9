//! Progressive frame loader
//!
//! Loads frame 0 as soon as a source is set so something can be shown right
//! away, then streams the remaining frames in fixed-size batches with a cap
//! on in-flight fetches. After every batch the whole renderable set is
//! rebuilt from the frame store against the grown bounding box and published
//! on a `watch` channel.
//!
//! ```text
//! Idle → LoadingFirstFrame → FirstFrameReady → LazyWaiting ─┐
//!                  │                     └──────────────────┴→ LoadingRemaining → FullyLoaded
//!                  └→ Empty                                          └→ Aborted (strict mode)
//! ```
//!
//! Fetches cannot be cancelled. Every source change bumps a generation
//! counter and results that come back for an older generation are dropped.

use crate::config::{LoadStrategy, PlayerConfig, Quality};
use crate::frame_source::{
    fetch_frame_lines, frame_filename, resolve_frame_source, split_frame_lines, FrameTransport,
    ResolvedSource, SourceFallback,
};
use crate::normalize::{
    compute_bounds, merge_bounds, normalize_frames, normalize_single_frame, render_frames, FrameBounds,
};
use crate::viewport::LazyLoadTrigger;
use crate::{Error, Result};
use futures::stream::{self, StreamExt};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Where the loader is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    LoadingFirstFrame,
    FirstFrameReady,
    /// First frame shown, waiting for visibility before loading the rest
    LazyWaiting,
    LoadingRemaining,
    FullyLoaded,
    /// No source could be found; nothing will be shown
    Empty,
    /// A frame failed with `continue_on_frame_error` off
    Aborted,
}

impl LoadState {
    pub fn is_loading(self) -> bool {
        matches!(
            self,
            LoadState::Idle | LoadState::LoadingFirstFrame | LoadState::LoadingRemaining
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            LoadState::Idle => "Idle",
            LoadState::LoadingFirstFrame => "Loading first frame",
            LoadState::FirstFrameReady => "First frame ready",
            LoadState::LazyWaiting => "Waiting for visibility",
            LoadState::LoadingRemaining => "Loading frames",
            LoadState::FullyLoaded => "Loaded",
            LoadState::Empty => "No frames",
            LoadState::Aborted => "Load aborted",
        }
    }
}

/// Identifies one remote frame set. Changing any field is a source change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationSource {
    pub origin: String,
    pub folder: String,
    pub quality: Quality,
    pub frame_count: usize,
}

impl AnimationSource {
    /// `None` when the config has no origin.
    pub fn from_config(config: &PlayerConfig) -> Option<Self> {
        let origin = config.origin.clone()?;
        Some(Self {
            origin,
            folder: config.frame_folder.clone(),
            quality: config.quality,
            frame_count: config.frame_count,
        })
    }
}

/// Loading policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    pub lazy: bool,
    pub load_strategy: LoadStrategy,
    pub batch_size: usize,
    pub max_concurrent_fetches: usize,
    pub continue_on_frame_error: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::from(&PlayerConfig::default())
    }
}

impl From<&PlayerConfig> for LoadOptions {
    fn from(config: &PlayerConfig) -> Self {
        Self {
            lazy: config.lazy,
            load_strategy: config.load_strategy,
            batch_size: config.batch_size,
            max_concurrent_fetches: config.max_concurrent_fetches,
            continue_on_frame_error: config.continue_on_frame_error,
        }
    }
}

impl LoadOptions {
    fn batch_size(&self, remaining: usize) -> usize {
        match self.load_strategy {
            LoadStrategy::All => remaining.max(1),
            LoadStrategy::Batch => self.batch_size.max(1),
        }
    }
}

/// The renderable frames as of the latest publish
#[derive(Debug, Clone, Default)]
pub struct FrameSet {
    /// Source generation these frames belong to
    pub generation: u64,
    /// Normalized frames, all the same size, in frame order
    pub frames: Arc<[String]>,
    pub state: LoadState,
    /// Frames expected from the source
    pub total: usize,
    pub fallback: Option<SourceFallback>,
}

impl FrameSet {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Frame store plus everything derived from it
#[derive(Debug, Default)]
struct LoaderInner {
    generation: u64,
    source: Option<AnimationSource>,
    resolved: Option<ResolvedSource>,
    /// One slot per expected frame, filled in completion order
    store: Vec<Option<Vec<String>>>,
    /// Union of the bounds of every stored frame
    bounds: Option<FrameBounds>,
    state: LoadState,
    full_load_triggered: bool,
}

impl LoaderInner {
    fn rebuild(&self) -> Vec<String> {
        let loaded: Vec<&[String]> = self.store.iter().flatten().map(Vec::as_slice).collect();
        render_frames(&loaded, self.bounds)
    }

    fn store_frame(&mut self, index: usize, lines: Vec<String>) {
        self.bounds = merge_bounds(self.bounds, compute_bounds(&lines));
        if let Some(slot) = self.store.get_mut(index) {
            *slot = Some(lines);
        }
    }

    fn reset(&mut self) {
        self.generation += 1;
        self.source = None;
        self.resolved = None;
        self.store.clear();
        self.bounds = None;
        self.state = LoadState::Idle;
        self.full_load_triggered = false;
    }
}

struct Shared<T> {
    transport: T,
    options: LoadOptions,
    inner: Mutex<LoaderInner>,
    publisher: watch::Sender<FrameSet>,
}

/// Loads one animation at a time and publishes its renderable frames.
///
/// Cheap to clone; clones share the same store and channel.
pub struct ProgressiveLoader<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for ProgressiveLoader<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: FrameTransport> ProgressiveLoader<T> {
    pub fn new(transport: T, options: LoadOptions) -> Self {
        let (publisher, _) = watch::channel(FrameSet::default());
        Self {
            shared: Arc::new(Shared {
                transport,
                options,
                inner: Mutex::new(LoaderInner::default()),
                publisher,
            }),
        }
    }

    /// Receive every published frame set.
    pub fn subscribe(&self) -> watch::Receiver<FrameSet> {
        self.shared.publisher.subscribe()
    }

    /// Latest published frame set.
    pub fn snapshot(&self) -> FrameSet {
        self.shared.publisher.borrow().clone()
    }

    pub fn state(&self) -> LoadState {
        self.lock().state
    }

    pub fn options(&self) -> &LoadOptions {
        &self.shared.options
    }

    pub fn full_load_triggered(&self) -> bool {
        self.lock().full_load_triggered
    }

    /// Switch to a new source: drop every frame and the bounds, back to `Idle`.
    /// Returns the new generation.
    pub fn set_source(&self, source: AnimationSource) -> u64 {
        let mut inner = self.lock();
        inner.reset();
        inner.store = vec![None; source.frame_count];
        info!(
            "source changed to \"{}\" ({} frames, quality {})",
            source.folder, source.frame_count, source.quality
        );
        inner.source = Some(source);
        self.publish(&inner);
        inner.generation
    }

    /// Play a fixed set of frames with no fetching. Returns the new generation.
    pub fn set_explicit_frames(&self, frames: &[String]) -> u64 {
        let mut inner = self.lock();
        inner.reset();
        let split: Vec<Vec<String>> = frames.iter().map(|text| split_frame_lines(text)).collect();
        let normalized = normalize_frames(&split);
        for lines in split {
            inner.bounds = merge_bounds(inner.bounds, compute_bounds(&lines));
            inner.store.push(Some(lines));
        }
        inner.full_load_triggered = true;
        inner.state = LoadState::FullyLoaded;
        self.publish_frames(&inner, normalized);
        inner.generation
    }

    /// Resolve the source and show frame 0. Continues straight into
    /// [`load_remaining`](Self::load_remaining) unless loading is lazy.
    pub async fn load_first_frame(&self) -> Result<()> {
        let (generation, source) = {
            let mut inner = self.lock();
            let Some(source) = inner.source.clone() else {
                return Err(Error::Config("no animation source set".to_string()));
            };
            if source.frame_count == 0 {
                warn!("\"{}\" has a frame count of 0, nothing to load", source.folder);
                inner.state = LoadState::Empty;
                self.publish(&inner);
                return Err(Error::Config("frame_count must be positive".to_string()));
            }
            inner.state = LoadState::LoadingFirstFrame;
            self.publish(&inner);
            (inner.generation, source)
        };

        let resolved = resolve_frame_source(
            &self.shared.transport,
            &source.origin,
            &source.folder,
            source.quality,
            &frame_filename(0),
        )
        .await;

        {
            let mut inner = self.lock();
            if inner.generation != generation {
                debug!("discarding first frame for stale source \"{}\"", source.folder);
                return Ok(());
            }

            let Some(resolved) = resolved else {
                error!(
                    "could not find frames in any quality folder or flat structure for \"{}\"",
                    source.folder
                );
                inner.state = LoadState::Empty;
                self.publish(&inner);
                return Err(Error::NotFound {
                    folder: source.folder,
                });
            };

            let first = normalize_single_frame(&resolved.first_frame);
            inner.store_frame(0, split_frame_lines(&resolved.first_frame));
            inner.resolved = Some(resolved);
            inner.state = LoadState::FirstFrameReady;
            self.publish_frames(&inner, vec![first]);
            if self.shared.options.lazy {
                inner.state = LoadState::LazyWaiting;
                self.publish_state(&inner);
            }
        }

        if self.shared.options.lazy {
            Ok(())
        } else {
            self.load_remaining().await
        }
    }

    /// Fetch frames `1..frame_count` batch by batch. Runs at most once per source.
    pub async fn load_remaining(&self) -> Result<()> {
        let (generation, base_url, pending) = {
            let mut inner = self.lock();
            if inner.full_load_triggered {
                return Ok(());
            }
            inner.full_load_triggered = true;

            let Some(resolved) = inner.resolved.as_ref() else {
                debug!("no resolved source, nothing left to load");
                return Ok(());
            };
            let base_url = resolved.base_url.clone();
            let pending: Vec<usize> = (1..inner.store.len())
                .filter(|&index| inner.store[index].is_none())
                .collect();

            inner.state = LoadState::LoadingRemaining;
            self.publish(&inner);
            (inner.generation, base_url, pending)
        };

        let options = &self.shared.options;
        let batch_size = options.batch_size(pending.len());
        let concurrency = options.max_concurrent_fetches.max(1);
        let mut failed: Vec<usize> = Vec::new();

        for batch in pending.chunks(batch_size) {
            let transport = &self.shared.transport;
            let base_url = base_url.as_str();
            // Settle every fetch in the batch; one failure never cancels its siblings.
            let results: Vec<(usize, Result<Vec<String>>)> = stream::iter(batch.iter().copied())
                .map(|index| async move {
                    let filename = frame_filename(index);
                    (index, fetch_frame_lines(transport, base_url, &filename).await)
                })
                .buffer_unordered(concurrency)
                .collect()
                .await;

            let mut inner = self.lock();
            if inner.generation != generation {
                debug!("discarding {} stale frame results", results.len());
                return Ok(());
            }

            let mut batch_failed = Vec::new();
            let mut loaded = 0usize;
            for (index, result) in results {
                match result {
                    Ok(lines) => {
                        inner.store_frame(index, lines);
                        loaded += 1;
                    }
                    Err(e) => {
                        if options.continue_on_frame_error {
                            warn!("skipping frame index {}: {}", index, e);
                        } else {
                            error!("failed to load frame index {}: {}", index, e);
                        }
                        batch_failed.push(index);
                    }
                }
            }
            debug!(
                "batch of {} settled: {} loaded, {} failed",
                batch.len(),
                loaded,
                batch_failed.len()
            );

            batch_failed.sort_unstable();
            failed.extend(batch_failed);

            if !options.continue_on_frame_error && !failed.is_empty() {
                inner.state = LoadState::Aborted;
                self.publish(&inner);
                error!("partial frame load failure, stopping");
                return Err(Error::PartialLoad { failed });
            }

            if loaded > 0 {
                self.publish(&inner);
            }
        }

        let mut inner = self.lock();
        if inner.generation != generation {
            return Ok(());
        }
        inner.state = LoadState::FullyLoaded;
        self.publish(&inner);
        info!(
            "loaded {} of {} frames ({} failed)",
            inner.store.iter().flatten().count(),
            inner.store.len(),
            failed.len()
        );
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, LoaderInner> {
        self.shared.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Rebuild the renderable list from the store and publish it.
    fn publish(&self, inner: &LoaderInner) {
        self.publish_frames(inner, inner.rebuild());
    }

    /// Publish a state change, keeping the frames already out there.
    fn publish_state(&self, inner: &LoaderInner) {
        self.shared.publisher.send_modify(|set| set.state = inner.state);
    }

    fn publish_frames(&self, inner: &LoaderInner, frames: Vec<String>) {
        self.shared.publisher.send_replace(FrameSet {
            generation: inner.generation,
            frames: frames.into(),
            state: inner.state,
            total: inner.store.len(),
            fallback: inner.resolved.as_ref().and_then(|r| r.fallback.clone()),
        });
    }
}

impl<T: FrameTransport> LazyLoadTrigger for ProgressiveLoader<T> {
    fn full_load_triggered(&self) -> bool {
        ProgressiveLoader::full_load_triggered(self)
    }

    fn trigger_full_load(&self) {
        let loader = self.clone();
        tokio::spawn(async move {
            if let Err(e) = loader.load_remaining().await {
                error!("{}", e);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory transport. Paths in `failing` return 500; paths for frames at
    /// or beyond `gate_from` wait until the gate is opened.
    struct FakeTransport {
        bodies: HashMap<String, String>,
        failing: HashSet<String>,
        gate_from: Option<usize>,
        gate: watch::Sender<bool>,
        requests: AtomicUsize,
    }

    impl FakeTransport {
        fn new(base: &str, frames: &[&str]) -> Self {
            let bodies = frames
                .iter()
                .enumerate()
                .map(|(i, body)| (format!("{base}/{}", frame_filename(i)), body.to_string()))
                .collect();
            let (gate, _) = watch::channel(false);
            Self {
                bodies,
                failing: HashSet::new(),
                gate_from: None,
                gate,
                requests: AtomicUsize::new(0),
            }
        }

        fn failing(mut self, base: &str, indices: &[usize]) -> Self {
            self.failing = indices
                .iter()
                .map(|&i| format!("{base}/{}", frame_filename(i)))
                .collect();
            self
        }

        fn gated_from(mut self, index: usize) -> Self {
            self.gate_from = Some(index);
            self
        }

        fn frame_index(location: &str) -> Option<usize> {
            let name = location.rsplit('/').next()?;
            let digits = name.strip_prefix("frame_")?.strip_suffix(".txt")?;
            digits.parse::<usize>().ok().map(|n| n - 1)
        }
    }

    impl FrameTransport for FakeTransport {
        async fn get_text(&self, location: &str) -> Result<String> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            if let (Some(from), Some(index)) = (self.gate_from, Self::frame_index(location)) {
                if index >= from {
                    let mut rx = self.gate.subscribe();
                    let _ = rx.wait_for(|open| *open).await;
                }
            }
            if self.failing.contains(location) {
                return Err(Error::Status {
                    url: location.to_string(),
                    status: 500,
                });
            }
            self.bodies.get(location).cloned().ok_or_else(|| Error::Status {
                url: location.to_string(),
                status: 404,
            })
        }
    }

    fn source(folder: &str, frame_count: usize) -> AnimationSource {
        AnimationSource {
            origin: "/site".to_string(),
            folder: folder.to_string(),
            quality: Quality::Medium,
            frame_count,
        }
    }

    fn options(lazy: bool, batch_size: usize, continue_on_frame_error: bool) -> LoadOptions {
        LoadOptions {
            lazy,
            load_strategy: LoadStrategy::Batch,
            batch_size,
            max_concurrent_fetches: 6,
            continue_on_frame_error,
        }
    }

    fn numbered_frames(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("  F{i:03}  \n")).collect()
    }

    #[tokio::test]
    async fn test_non_lazy_loads_everything() {
        let frames = numbered_frames(5);
        let refs: Vec<&str> = frames.iter().map(String::as_str).collect();
        let transport = FakeTransport::new("/site/hero/medium", &refs);
        let loader = ProgressiveLoader::new(transport, options(false, 2, true));

        loader.set_source(source("hero", 5));
        loader.load_first_frame().await.unwrap();

        let set = loader.snapshot();
        assert_eq!(set.state, LoadState::FullyLoaded);
        assert_eq!(set.len(), 5);
        assert_eq!(set.frames[0], "F000");
        assert_eq!(set.frames[4], "F004");
        assert!(set.fallback.is_none());
    }

    #[tokio::test]
    async fn test_lazy_waits_then_loads_once() {
        let frames = numbered_frames(4);
        let refs: Vec<&str> = frames.iter().map(String::as_str).collect();
        let transport = FakeTransport::new("/site/hero/medium", &refs);
        let loader = ProgressiveLoader::new(transport, options(true, 24, true));

        loader.set_source(source("hero", 4));
        loader.load_first_frame().await.unwrap();
        assert_eq!(loader.state(), LoadState::LazyWaiting);
        assert_eq!(loader.snapshot().len(), 1);
        assert!(!loader.full_load_triggered());

        loader.load_remaining().await.unwrap();
        assert_eq!(loader.snapshot().len(), 4);
        let requests = loader.shared.transport.requests.load(Ordering::SeqCst);

        loader.load_remaining().await.unwrap();
        assert_eq!(loader.shared.transport.requests.load(Ordering::SeqCst), requests);
        assert_eq!(loader.state(), LoadState::FullyLoaded);
    }

    #[tokio::test]
    async fn test_partial_failure_publishes_batch_and_continues() {
        let frames = numbered_frames(49);
        let refs: Vec<&str> = frames.iter().map(String::as_str).collect();
        let base = "/site/hero/medium";
        // Batch 1 holds indices 1..=24; indices 5 and 17 fail. Batch 2 is held back.
        let transport = FakeTransport::new(base, &refs)
            .failing(base, &[5, 17])
            .gated_from(25);
        let loader = ProgressiveLoader::new(transport, options(true, 24, true));
        let mut rx = loader.subscribe();

        loader.set_source(source("hero", 49));
        loader.load_first_frame().await.unwrap();

        let task = tokio::spawn({
            let loader = loader.clone();
            async move { loader.load_remaining().await }
        });

        let after_batch = rx
            .wait_for(|set| set.len() > 1)
            .await
            .unwrap()
            .clone();
        // Frame 0 plus the 22 frames of the batch that loaded
        assert_eq!(after_batch.len(), 1 + 22);
        assert_eq!(after_batch.state, LoadState::LoadingRemaining);
        assert!(!after_batch.frames.iter().any(|f| f == "F005" || f == "F017"));

        loader.shared.transport.gate.send_replace(true);
        task.await.unwrap().unwrap();

        let set = loader.snapshot();
        assert_eq!(set.state, LoadState::FullyLoaded);
        assert_eq!(set.len(), 47);
    }

    #[tokio::test]
    async fn test_strict_mode_aborts_after_batch_drains() {
        let frames = numbered_frames(9);
        let refs: Vec<&str> = frames.iter().map(String::as_str).collect();
        let base = "/site/hero/medium";
        let transport = FakeTransport::new(base, &refs).failing(base, &[3]);
        let loader = ProgressiveLoader::new(transport, options(false, 4, false));

        loader.set_source(source("hero", 9));
        let err = loader.load_first_frame().await.unwrap_err();
        assert!(matches!(err, Error::PartialLoad { ref failed } if failed == &vec![3]));

        let set = loader.snapshot();
        assert_eq!(set.state, LoadState::Aborted);
        // Siblings of the failed frame in batch 1..=4 still landed
        assert_eq!(set.len(), 4);
        // resolver probe + first batch, second batch never requested
        assert_eq!(loader.shared.transport.requests.load(Ordering::SeqCst), 1 + 4);
    }

    #[tokio::test]
    async fn test_missing_source_is_empty() {
        let transport = FakeTransport::new("/elsewhere", &["x"]);
        let loader = ProgressiveLoader::new(transport, options(false, 24, true));

        loader.set_source(source("hero", 3));
        let err = loader.load_first_frame().await.unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
        let set = loader.snapshot();
        assert_eq!(set.state, LoadState::Empty);
        assert!(set.is_empty());
    }

    #[tokio::test]
    async fn test_zero_frame_count_is_empty_without_probing() {
        let transport = FakeTransport::new("/site/hero/medium", &["x"]);
        let loader = ProgressiveLoader::new(transport, options(false, 24, true));

        loader.set_source(source("hero", 0));
        let err = loader.load_first_frame().await.unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("frame_count")));
        assert_eq!(loader.snapshot().state, LoadState::Empty);
        assert_eq!(loader.shared.transport.requests.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_stale_results_dropped_after_source_change() {
        let frames = numbered_frames(3);
        let refs: Vec<&str> = frames.iter().map(String::as_str).collect();
        let transport = FakeTransport::new("/site/hero/medium", &refs).gated_from(1);
        let loader = ProgressiveLoader::new(transport, options(true, 24, true));

        loader.set_source(source("hero", 3));
        loader.load_first_frame().await.unwrap();
        let task = tokio::spawn({
            let loader = loader.clone();
            async move { loader.load_remaining().await }
        });
        let mut rx = loader.subscribe();
        rx.wait_for(|set| set.state == LoadState::LoadingRemaining)
            .await
            .unwrap();

        let generation = loader.set_source(source("other", 2));
        loader.shared.transport.gate.send_replace(true);
        task.await.unwrap().unwrap();

        let set = loader.snapshot();
        assert_eq!(set.generation, generation);
        assert_eq!(set.state, LoadState::Idle);
        assert!(set.is_empty());
        assert!(!loader.full_load_triggered());
    }

    #[test]
    fn test_remaining_load_pending_until_frames_arrive() {
        let frames = numbered_frames(3);
        let refs: Vec<&str> = frames.iter().map(String::as_str).collect();
        let transport = FakeTransport::new("/site/hero/medium", &refs).gated_from(1);
        let loader = ProgressiveLoader::new(transport, options(true, 24, true));

        loader.set_source(source("hero", 3));
        tokio_test::block_on(loader.load_first_frame()).unwrap();

        let mut task = tokio_test::task::spawn(loader.load_remaining());
        tokio_test::assert_pending!(task.poll());
        assert_eq!(loader.state(), LoadState::LoadingRemaining);
        assert_eq!(loader.snapshot().len(), 1);

        loader.shared.transport.gate.send_replace(true);
        assert!(task.is_woken());
        tokio_test::assert_ready_ok!(task.poll());
        assert_eq!(loader.snapshot().len(), 3);
    }

    #[tokio::test]
    async fn test_earlier_frames_recropped_as_bounds_grow() {
        let base = "/site/grow/medium";
        let transport = FakeTransport::new(base, &["\n   ab\n", "x\n", "\n\n       y\n"]);
        let loader = ProgressiveLoader::new(transport, options(false, 1, true));

        loader.set_source(source("grow", 3));
        loader.load_first_frame().await.unwrap();

        let set = loader.snapshot();
        assert_eq!(
            set.frames.to_vec(),
            vec![
                "        \n   ab   \n        ".to_string(),
                "x       \n        \n        ".to_string(),
                "        \n        \n       y".to_string(),
            ]
        );
    }

    #[test]
    fn test_batch_size_follows_strategy() {
        let mut opts = options(true, 0, true);
        assert_eq!(opts.batch_size(59), 1);
        opts.load_strategy = LoadStrategy::All;
        assert_eq!(opts.batch_size(59), 59);
        assert_eq!(opts.batch_size(0), 1);
    }

    #[tokio::test]
    async fn test_explicit_frames_bypass_fetching() {
        let transport = FakeTransport::new("/unused", &[]);
        let loader = ProgressiveLoader::new(transport, options(true, 24, true));

        let first = loader.set_explicit_frames(&["  a\n".to_string(), "b  \n  c".to_string()]);
        let set = loader.snapshot();
        assert_eq!(set.generation, first);
        assert_eq!(set.state, LoadState::FullyLoaded);
        assert_eq!(set.frames.to_vec(), vec!["  a\n   ".to_string(), "b  \n  c".to_string()]);

        loader.load_remaining().await.unwrap();
        assert_eq!(loader.shared.transport.requests.load(Ordering::SeqCst), 0);

        let second = loader.set_explicit_frames(&["z".to_string()]);
        assert!(second > first);
    }
}
