use super::transport::{join_location, FrameTransport};
use crate::Result;

/// File name of the frame at 0-based `index`: `frame_00001.txt` for index 0.
pub fn frame_filename(index: usize) -> String {
    format!("frame_{:05}.txt", index + 1)
}

/// Split raw frame text into rows, dropping `\r` and the empty rows a
/// trailing newline leaves behind.
pub fn split_frame_lines(text: &str) -> Vec<String> {
    let cleaned = text.replace('\r', "");
    let mut lines: Vec<String> = cleaned.split('\n').map(str::to_string).collect();
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

/// Fetch one frame file and split it into rows.
pub async fn fetch_frame_lines<T: FrameTransport>(
    transport: &T,
    base_url: &str,
    filename: &str,
) -> Result<Vec<String>> {
    let text = transport.get_text(&join_location(base_url, filename)).await?;
    Ok(split_frame_lines(&text))
}
