//! Markdown-aware text chunking with overlap and position tracking

use unicode_segmentation::UnicodeSegmentation;
use uuid::Uuid;

use crate::types::Chunk;

/// Text chunker with configurable size and overlap
///
/// Splits on structural markdown boundaries (headings, paragraph breaks)
/// first and falls back to word/character splits only when a single unit
/// exceeds the maximum size. Separators stay inside the chunk content so
/// retrieved excerpts remain readable. Invariant (enforced by config
/// validation): `overlap < max_size`.
pub struct MarkdownChunker {
    /// Maximum chunk size in bytes
    max_size: usize,
    /// Overlap carried between consecutive chunks
    overlap: usize,
}

impl MarkdownChunker {
    /// Create a new chunker
    pub fn new(max_size: usize, overlap: usize) -> Self {
        debug_assert!(overlap < max_size);
        Self { max_size, overlap }
    }

    /// Split `text` into overlapping chunks tagged with `source`
    ///
    /// Pure function of its inputs. Empty text yields an empty sequence,
    /// not an error. Chunk indices are sequential starting at 0.
    pub fn chunk(&self, text: &str, source: Uuid) -> Vec<Chunk> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut ranges: Vec<(usize, usize)> = Vec::new();
        // Buffer is the byte range [cur_start, cur_end); units tile the text,
        // so each unit starts exactly at the current buffer end.
        let mut cur_start = 0usize;
        let mut cur_end = 0usize;
        let mut units_in_buffer = 0usize;

        for (u_start, u_end) in structural_units(text) {
            let unit_len = u_end - u_start;

            if unit_len > self.max_size {
                if units_in_buffer > 0 {
                    ranges.push((cur_start, cur_end));
                    cur_start = self.overlap_start(text, cur_start, cur_end);
                }
                // Hard-split the oversized unit, carrying overlap between pieces
                let mut start = cur_start.min(u_start);
                while u_end - start > self.max_size {
                    let cut = start + self.split_point(&text[start..u_end]);
                    ranges.push((start, cut));
                    start = self.overlap_start(text, start, cut);
                }
                cur_start = start;
                cur_end = u_end;
                units_in_buffer = 1;
                continue;
            }

            if units_in_buffer > 0 && (cur_end - cur_start) + unit_len > self.max_size {
                ranges.push((cur_start, cur_end));
                cur_start = self.overlap_start(text, cur_start, cur_end);
            }

            // Shrink the carried overlap if it would push the next chunk over budget
            if u_end - cur_start > self.max_size {
                cur_start = snap_up(text, u_end - self.max_size);
            }

            cur_end = u_end;
            units_in_buffer += 1;
        }

        if cur_end > cur_start {
            ranges.push((cur_start, cur_end));
        }

        ranges
            .into_iter()
            .filter(|(s, e)| !text[*s..*e].trim().is_empty())
            .enumerate()
            .map(|(i, (s, e))| Chunk::new(source, text[s..e].to_string(), i as u32, s, e))
            .collect()
    }

    /// Start offset of the chunk following a flush at `[start, end)`
    ///
    /// Carries `overlap` bytes back from the flushed end when the chunk is
    /// long enough; a chunk no longer than the overlap gets no carry, which
    /// keeps the splitter making forward progress.
    fn overlap_start(&self, text: &str, start: usize, end: usize) -> usize {
        if end - start > self.overlap {
            snap_down(text, end - self.overlap)
        } else {
            end
        }
    }

    /// Byte length of the next piece of an oversized unit
    ///
    /// Prefers the last word boundary within the size budget; falls back to
    /// a raw char boundary for pathological unbroken runs.
    fn split_point(&self, s: &str) -> usize {
        let limit = snap_down(s, self.max_size.min(s.len()));
        let mut best = 0;
        for (idx, _) in s.split_word_bound_indices() {
            if idx == 0 {
                continue;
            }
            if idx <= limit {
                best = idx;
            } else {
                break;
            }
        }
        if best == 0 {
            limit.max(first_char_len(s))
        } else {
            best
        }
    }
}

/// Byte ranges of structural units, tiling the full text
///
/// A new unit begins at every heading line and at the first non-blank line
/// after a blank run. Separator bytes are never dropped: the heading marker
/// opens its unit, the blank run closes the previous one.
fn structural_units(text: &str) -> Vec<(usize, usize)> {
    let mut boundaries = vec![0];
    let mut offset = 0;
    let mut prev_blank = false;

    for line in text.split_inclusive('\n') {
        let is_blank = line.trim().is_empty();
        if offset > 0 {
            if is_heading_line(line) || (prev_blank && !is_blank) {
                boundaries.push(offset);
            }
        }
        prev_blank = is_blank;
        offset += line.len();
    }
    boundaries.push(text.len());
    boundaries.dedup();

    boundaries.windows(2).map(|w| (w[0], w[1])).collect()
}

/// True for ATX heading lines (`# ` through `###### `)
fn is_heading_line(line: &str) -> bool {
    let hashes = line.bytes().take_while(|b| *b == b'#').count();
    (1..=6).contains(&hashes) && line[hashes..].starts_with(' ')
}

/// Snap a byte index down to the nearest UTF-8 char boundary
fn snap_down(s: &str, index: usize) -> usize {
    let mut i = index.min(s.len());
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Snap a byte index up to the nearest UTF-8 char boundary
fn snap_up(s: &str, index: usize) -> usize {
    let mut i = index.min(s.len());
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

/// Byte length of the first char of `s`
fn first_char_len(s: &str) -> usize {
    s.chars().next().map(|c| c.len_utf8()).unwrap_or(0)
}
