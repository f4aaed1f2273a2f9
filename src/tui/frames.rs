//! Built-in demo animation, embedded at compile time.
//!
//! Played as an explicit frame set when no origin is configured.

// Embed the frames of one variant directory.
macro_rules! frames_for {
    ($dir:literal) => {
        [
            include_str!(concat!("../../frames/", $dir, "/frame_1.txt")),
            include_str!(concat!("../../frames/", $dir, "/frame_2.txt")),
            include_str!(concat!("../../frames/", $dir, "/frame_3.txt")),
            include_str!(concat!("../../frames/", $dir, "/frame_4.txt")),
            include_str!(concat!("../../frames/", $dir, "/frame_5.txt")),
            include_str!(concat!("../../frames/", $dir, "/frame_6.txt")),
            include_str!(concat!("../../frames/", $dir, "/frame_7.txt")),
            include_str!(concat!("../../frames/", $dir, "/frame_8.txt")),
            include_str!(concat!("../../frames/", $dir, "/frame_9.txt")),
            include_str!(concat!("../../frames/", $dir, "/frame_10.txt")),
            include_str!(concat!("../../frames/", $dir, "/frame_11.txt")),
            include_str!(concat!("../../frames/", $dir, "/frame_12.txt")),
            include_str!(concat!("../../frames/", $dir, "/frame_13.txt")),
            include_str!(concat!("../../frames/", $dir, "/frame_14.txt")),
            include_str!(concat!("../../frames/", $dir, "/frame_15.txt")),
            include_str!(concat!("../../frames/", $dir, "/frame_16.txt")),
        ]
    };
}

/// Bouncing ball, 16 frames
pub const FRAMES_DEFAULT: [&str; 16] = frames_for!("default");

/// Name shown in the header for the built-in animation
pub const DEFAULT_TITLE: &str = "bounce (built-in)";

/// The built-in frames as owned strings, ready for
/// [`ProgressiveLoader::set_explicit_frames`](crate::loader::ProgressiveLoader::set_explicit_frames).
pub fn default_frames() -> Vec<String> {
    FRAMES_DEFAULT.iter().map(|f| f.to_string()).collect()
}
