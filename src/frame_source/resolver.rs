//! Resolves where an animation's frames actually live.
//!
//! The requested quality tier is probed first, then the other tiers in that
//! tier's fallback order, then the legacy flat layout. The probe fetches the
//! first frame itself, and its body is handed back so it is not fetched twice.

use super::transport::{join_location, FrameTransport};
use crate::config::Quality;
use std::fmt;
use tracing::{debug, warn};

/// How the delivered source differs from what was requested
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceFallback {
    /// Another quality tier was used
    Quality { requested: Quality, delivered: Quality },
    /// No quality subfolder exists; frames sit directly in the folder
    Legacy,
}

impl fmt::Display for SourceFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFallback::Quality { requested, delivered } => {
                write!(f, "{requested} unavailable, playing {delivered}")
            }
            SourceFallback::Legacy => f.write_str("legacy flat layout"),
        }
    }
}

/// A located frame source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    /// Base location for every frame file of this animation
    pub base_url: String,
    /// Tier actually delivered; `None` for the flat layout
    pub quality: Option<Quality>,
    pub fallback: Option<SourceFallback>,
    /// Raw text of the first frame, fetched while probing
    pub first_frame: String,
}

impl ResolvedSource {
    pub fn is_flat(&self) -> bool {
        self.quality.is_none()
    }
}

/// Probe `origin/folder/{tier}/first_file` for each tier in fallback order,
/// then `origin/folder/first_file`. Returns `None` when nothing answers.
pub async fn resolve_frame_source<T: FrameTransport>(
    transport: &T,
    origin: &str,
    folder: &str,
    quality: Quality,
    first_file: &str,
) -> Option<ResolvedSource> {
    let folder_base = join_location(origin, folder);

    for candidate in quality.fallback_order() {
        let base_url = join_location(&folder_base, candidate.as_str());
        let probe_url = join_location(&base_url, first_file);
        match transport.get_text(&probe_url).await {
            Ok(first_frame) => {
                let fallback = if candidate != quality {
                    warn!(
                        "quality \"{}\" not found in \"{}\", falling back to \"{}\"",
                        quality, folder, candidate
                    );
                    Some(SourceFallback::Quality {
                        requested: quality,
                        delivered: candidate,
                    })
                } else {
                    None
                };
                return Some(ResolvedSource {
                    base_url,
                    quality: Some(candidate),
                    fallback,
                    first_frame,
                });
            }
            Err(e) => debug!("probe {} failed: {}", probe_url, e),
        }
    }

    let legacy_url = join_location(&folder_base, first_file);
    match transport.get_text(&legacy_url).await {
        Ok(first_frame) => {
            warn!(
                "no quality subfolders found in \"{}\", using flat folder structure",
                folder
            );
            Some(ResolvedSource {
                base_url: folder_base,
                quality: None,
                fallback: Some(SourceFallback::Legacy),
                first_frame,
            })
        }
        Err(e) => {
            debug!("legacy probe {} failed: {}", legacy_url, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, Result};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves a fixed set of locations and records every request.
    struct MapTransport {
        bodies: HashMap<String, String>,
        requests: Mutex<Vec<String>>,
    }

    impl MapTransport {
        fn new(paths: &[&str]) -> Self {
            Self {
                bodies: paths
                    .iter()
                    .map(|p| (p.to_string(), format!("body of {p}")))
                    .collect(),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl FrameTransport for MapTransport {
        async fn get_text(&self, location: &str) -> Result<String> {
            self.requests.lock().unwrap().push(location.to_string());
            self.bodies.get(location).cloned().ok_or_else(|| Error::Status {
                url: location.to_string(),
                status: 404,
            })
        }
    }

    const FIRST: &str = "frame_00001.txt";

    #[tokio::test]
    async fn test_requested_quality_found() {
        let transport = MapTransport::new(&["/site/hero/medium/frame_00001.txt"]);
        let source = resolve_frame_source(&transport, "/site", "hero", Quality::Medium, FIRST)
            .await
            .unwrap();
        assert_eq!(source.base_url, "/site/hero/medium");
        assert_eq!(source.quality, Some(Quality::Medium));
        assert_eq!(source.fallback, None);
        assert_eq!(source.first_frame, "body of /site/hero/medium/frame_00001.txt");
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_low_falls_back_to_high_first() {
        let transport = MapTransport::new(&[
            "/site/hero/high/frame_00001.txt",
            "/site/hero/medium/frame_00001.txt",
        ]);
        let source = resolve_frame_source(&transport, "/site", "hero", Quality::Low, FIRST)
            .await
            .unwrap();
        assert_eq!(source.base_url, "/site/hero/high");
        assert_eq!(
            source.fallback,
            Some(SourceFallback::Quality {
                requested: Quality::Low,
                delivered: Quality::High,
            })
        );
        assert_eq!(
            transport.requests(),
            vec![
                "/site/hero/low/frame_00001.txt".to_string(),
                "/site/hero/high/frame_00001.txt".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_legacy_layout() {
        let transport = MapTransport::new(&["/site/hero/frame_00001.txt"]);
        let source = resolve_frame_source(&transport, "/site", "hero", Quality::Low, FIRST)
            .await
            .unwrap();
        assert!(source.is_flat());
        assert_eq!(source.base_url, "/site/hero");
        assert_eq!(source.fallback, Some(SourceFallback::Legacy));
        assert_eq!(
            transport.requests(),
            vec![
                "/site/hero/low/frame_00001.txt".to_string(),
                "/site/hero/high/frame_00001.txt".to_string(),
                "/site/hero/medium/frame_00001.txt".to_string(),
                "/site/hero/frame_00001.txt".to_string(),
            ]
        );
    }

    #[test]
    fn test_fallback_display() {
        let quality = SourceFallback::Quality {
            requested: Quality::High,
            delivered: Quality::Medium,
        };
        assert_eq!(quality.to_string(), "high unavailable, playing medium");
        assert_eq!(SourceFallback::Legacy.to_string(), "legacy flat layout");
    }

    #[tokio::test]
    async fn test_nothing_found() {
        let transport = MapTransport::new(&[]);
        let source = resolve_frame_source(&transport, "/site", "hero", Quality::Low, FIRST).await;
        assert!(source.is_none());
        assert_eq!(transport.requests().len(), 4);
    }
}
