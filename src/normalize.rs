//! Bounding-box normalization of ASCII frames.
//!
//! Raw frames often carry different whitespace margins. Cropping every frame
//! to the union of their glyph extents gives a set of identically sized
//! frames, so swapping one for the next never shifts the picture.
//!
//! Columns are counted in `char`s.

/// Inclusive rectangle enclosing every non-whitespace glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameBounds {
    pub min_row: usize,
    pub max_row: usize,
    pub min_col: usize,
    pub max_col: usize,
}

impl FrameBounds {
    pub fn width(&self) -> usize {
        self.max_col - self.min_col + 1
    }

    pub fn height(&self) -> usize {
        self.max_row - self.min_row + 1
    }

    /// Whether `other` lies entirely inside `self`.
    pub fn contains(&self, other: &FrameBounds) -> bool {
        self.min_row <= other.min_row
            && self.max_row >= other.max_row
            && self.min_col <= other.min_col
            && self.max_col >= other.max_col
    }
}

/// Tightest box around the glyphs of one frame, `None` if it is all whitespace.
pub fn compute_bounds<S: AsRef<str>>(lines: &[S]) -> Option<FrameBounds> {
    let mut bounds: Option<FrameBounds> = None;

    for (row, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        let Some(first) = line.chars().position(|c| !c.is_whitespace()) else {
            continue;
        };
        let last = line
            .chars()
            .enumerate()
            .filter(|(_, c)| !c.is_whitespace())
            .map(|(col, _)| col)
            .last()
            .unwrap_or(first);

        let row_bounds = FrameBounds {
            min_row: row,
            max_row: row,
            min_col: first,
            max_col: last,
        };
        bounds = merge_bounds(bounds, Some(row_bounds));
    }

    bounds
}

/// Null-safe union of two boxes.
pub fn merge_bounds(a: Option<FrameBounds>, b: Option<FrameBounds>) -> Option<FrameBounds> {
    match (a, b) {
        (None, other) | (other, None) => other,
        (Some(a), Some(b)) => Some(FrameBounds {
            min_row: a.min_row.min(b.min_row),
            max_row: a.max_row.max(b.max_row),
            min_col: a.min_col.min(b.min_col),
            max_col: a.max_col.max(b.max_col),
        }),
    }
}

/// Crop (and pad) a frame to `bounds`.
///
/// Rows past the end of the frame are treated as empty, which happens when a
/// later frame is taller than this one. Every returned row is exactly
/// `bounds.width()` chars.
pub fn crop_to_bounds<S: AsRef<str>>(lines: &[S], bounds: &FrameBounds) -> Vec<String> {
    let width = bounds.width();
    (bounds.min_row..=bounds.max_row)
        .map(|row| {
            let line = lines.get(row).map(AsRef::as_ref).unwrap_or("");
            let mut sliced: String = line.chars().skip(bounds.min_col).take(width).collect();
            let len = sliced.chars().count();
            sliced.extend(std::iter::repeat(' ').take(width - len));
            sliced
        })
        .collect()
}

/// Pad every frame to the largest row count and row width in the set.
/// Used when no frame has any glyph, so there is no box to crop to.
fn pad_to_rectangle<S: AsRef<str>>(frames: &[&[S]]) -> Vec<Vec<String>> {
    let height = frames.iter().map(|f| f.len()).max().unwrap_or(0);
    let width = frames
        .iter()
        .flat_map(|f| f.iter())
        .map(|l| l.as_ref().chars().count())
        .max()
        .unwrap_or(0);

    frames
        .iter()
        .map(|frame| {
            (0..height)
                .map(|row| {
                    let line = frame.get(row).map(AsRef::as_ref).unwrap_or("");
                    let len = line.chars().count();
                    let mut padded = line.to_string();
                    padded.extend(std::iter::repeat(' ').take(width - len));
                    padded
                })
                .collect()
        })
        .collect()
}

/// Crop every frame to `bounds` (or pad them to a common rectangle when
/// there are no bounds) and join rows into renderable text.
pub fn render_frames<S: AsRef<str>>(frames: &[&[S]], bounds: Option<FrameBounds>) -> Vec<String> {
    match bounds {
        Some(bounds) => frames
            .iter()
            .map(|lines| crop_to_bounds(lines, &bounds).join("\n"))
            .collect(),
        None => pad_to_rectangle(frames)
            .into_iter()
            .map(|lines| lines.join("\n"))
            .collect(),
    }
}

/// Crop a set of frames to the union of all their bounds.
pub fn normalize_frames<S: AsRef<str>>(frames: &[Vec<S>]) -> Vec<String> {
    let bounds = frames
        .iter()
        .fold(None, |acc, lines| merge_bounds(acc, compute_bounds(lines)));
    let views: Vec<&[S]> = frames.iter().map(Vec::as_slice).collect();
    render_frames(&views, bounds)
}

/// Crop a single frame to its own bounds. All-whitespace text is returned as is.
pub fn normalize_single_frame(text: &str) -> String {
    let lines = crate::frame_source::split_frame_lines(text);
    match compute_bounds(&lines) {
        Some(bounds) => crop_to_bounds(&lines, &bounds).join("\n"),
        None => text.to_string(),
    }
}
