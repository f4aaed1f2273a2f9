//! Transports that turn a frame location into its text body.

use crate::{Error, Result};
use reqwest::Client;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches the text body at a location.
///
/// Any non-success outcome (non-2xx status, connection failure, missing
/// file) is an error; callers decide whether it is fatal.
pub trait FrameTransport: Send + Sync + 'static {
    fn get_text(&self, location: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Join a base location and a path segment with exactly one `/`.
pub fn join_location(base: &str, segment: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        segment.trim_start_matches('/')
    )
}

// ─── HTTP ────────────────────────────────────────────────────────────

/// Plain-text frame fetches over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(request_timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("asciireel/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }

    /// Use a preconfigured client (proxy settings, custom TLS, ...).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn map_reqwest_error(url: &str, e: reqwest::Error) -> Error {
        let message = if e.is_timeout() {
            format!("timeout: {e}")
        } else if e.is_connect() {
            format!("network: {e}")
        } else {
            e.to_string()
        };
        Error::Transport {
            url: url.to_string(),
            message,
        }
    }
}

impl FrameTransport for HttpTransport {
    async fn get_text(&self, location: &str) -> Result<String> {
        debug!("GET {}", location);
        let response = self
            .client
            .get(location)
            .send()
            .await
            .map_err(|e| Self::map_reqwest_error(location, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: location.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| Self::map_reqwest_error(location, e))
    }
}

// ─── Local files ─────────────────────────────────────────────────────

/// Frame files read from a local directory tree
#[derive(Debug, Clone, Default)]
pub struct FileTransport;

impl FileTransport {
    pub fn new() -> Self {
        Self
    }
}

impl FrameTransport for FileTransport {
    async fn get_text(&self, location: &str) -> Result<String> {
        let path = PathBuf::from(location);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| Error::Transport {
                url: location.to_string(),
                message: e.to_string(),
            })
    }
}

// ─── Origin dispatch ─────────────────────────────────────────────────

/// Transport chosen from the shape of the configured origin
#[derive(Debug, Clone)]
pub enum AnyTransport {
    Http(HttpTransport),
    File(FileTransport),
}

impl AnyTransport {
    /// `http://` and `https://` origins use HTTP; anything else is a directory.
    pub fn for_origin(origin: &str, request_timeout: Duration) -> Self {
        if origin.starts_with("http://") || origin.starts_with("https://") {
            AnyTransport::Http(HttpTransport::new(request_timeout))
        } else {
            AnyTransport::File(FileTransport::new())
        }
    }
}

impl FrameTransport for AnyTransport {
    async fn get_text(&self, location: &str) -> Result<String> {
        match self {
            AnyTransport::Http(http) => http.get_text(location).await,
            AnyTransport::File(file) => file.get_text(location).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_join_location() {
        assert_eq!(join_location("https://a.dev/", "/hero"), "https://a.dev/hero");
        assert_eq!(join_location("https://a.dev", "hero"), "https://a.dev/hero");
        assert_eq!(join_location("/srv/frames", "frame_00001.txt"), "/srv/frames/frame_00001.txt");
    }

    #[test]
    fn test_for_origin() {
        let timeout = Duration::from_secs(1);
        assert!(matches!(AnyTransport::for_origin("https://a.dev", timeout), AnyTransport::Http(_)));
        assert!(matches!(AnyTransport::for_origin("http://127.0.0.1:8080", timeout), AnyTransport::Http(_)));
        assert!(matches!(AnyTransport::for_origin("./public", timeout), AnyTransport::File(_)));
    }

    #[tokio::test]
    async fn test_file_transport_reads_and_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("frame_00001.txt");
        std::fs::write(&path, " /\\ \n").unwrap();

        let transport = FileTransport::new();
        let text = transport.get_text(&path.to_string_lossy()).await.unwrap();
        assert_eq!(text, " /\\ \n");

        let missing = dir.path().join("frame_00002.txt");
        let err = transport.get_text(&missing.to_string_lossy()).await.unwrap_err();
        assert!(matches!(err, Error::Transport { .. }));
    }
}
