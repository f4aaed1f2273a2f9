//! Frame source module
//!
//! Locates an animation's frame files and fetches them, either over HTTP or
//! from a local directory laid out the same way:
//!
//! ```text
//! {origin}/{folder}/{quality}/frame_00001.txt
//! {origin}/{folder}/frame_00001.txt        (legacy flat layout)
//! ```

mod fetcher;
mod resolver;
mod transport;

pub use fetcher::{fetch_frame_lines, frame_filename, split_frame_lines};
pub use resolver::{resolve_frame_source, ResolvedSource, SourceFallback};
pub use transport::{join_location, AnyTransport, FileTransport, FrameTransport, HttpTransport};
