//! Fixed-size text chunking with overlap.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Window geometry for [`chunk_text`].
///
/// `chunk_size` and `overlap` are measured in characters, not bytes, so a
/// window never splits a multi-byte code point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            overlap: 200,
        }
    }
}

impl ChunkingConfig {
    /// Distance between the starts of consecutive windows.
    pub fn stride(&self) -> usize {
        self.chunk_size - self.overlap
    }

    /// Rejects geometries whose stride would be zero or negative.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidConfig(
                "chunking.chunk_size must be greater than 0".to_string(),
            ));
        }
        if self.overlap >= self.chunk_size {
            return Err(Error::InvalidConfig(format!(
                "chunking.overlap ({}) must be smaller than chunking.chunk_size ({})",
                self.overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

/// Splits `text` into overlapping windows of `chunk_size` characters.
///
/// Consecutive windows share `overlap` characters. Windows are trimmed and
/// windows that trim to nothing are dropped, so the returned chunks carry no
/// blank padding. The final window may be shorter than `chunk_size`, and
/// iteration stops as soon as a window reaches the end of the text.
pub fn chunk_text(text: &str, config: &ChunkingConfig) -> Result<Vec<String>> {
    config.validate()?;

    // Byte offset of every char boundary, with the end of the text appended
    // so `boundaries[i]..boundaries[j]` is always a valid slice.
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(offset, _)| offset)
        .chain([text.len()])
        .collect();
    let total_chars = boundaries.len() - 1;

    let mut chunks = Vec::new();
    let mut start = 0usize;
    while start < total_chars {
        let end = (start + config.chunk_size).min(total_chars);
        let window = text[boundaries[start]..boundaries[end]].trim();
        if !window.is_empty() {
            chunks.push(window.to_string());
        }
        if end >= total_chars {
            break;
        }
        start += config.stride();
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(chunk_size: usize, overlap: usize) -> ChunkingConfig {
        ChunkingConfig {
            chunk_size,
            overlap,
        }
    }

    fn digits(len: usize) -> String {
        "0123456789".chars().cycle().take(len).collect()
    }

    #[test]
    fn windows_have_configured_size_and_stride() {
        let text = digits(2500);
        let chunks = chunk_text(&text, &config(1000, 200)).unwrap();

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 1000);
        assert_eq!(chunks[1].len(), 1000);
        assert_eq!(chunks[2].len(), 900);
        // Consecutive windows start 800 chars apart and share the last 200
        // chars of the previous window.
        assert_eq!(chunks[0][800..], chunks[1][..200]);
        assert_eq!(chunks[1][800..], chunks[2][..200]);
    }

    #[test]
    fn text_shorter_than_window_is_one_chunk() {
        let chunks = chunk_text("hello world", &config(1000, 200)).unwrap();
        assert_eq!(chunks, vec!["hello world".to_string()]);
    }

    #[test]
    fn text_exactly_one_window_is_one_chunk() {
        let text = digits(1000);
        let chunks = chunk_text(&text, &config(1000, 200)).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], text);
    }

    #[test]
    fn one_char_past_the_window_adds_a_tail_chunk() {
        let text = digits(1001);
        let chunks = chunk_text(&text, &config(1000, 200)).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].len(), 201);
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(chunk_text("", &config(1000, 200)).unwrap().is_empty());
    }

    #[test]
    fn whitespace_only_windows_are_dropped() {
        let text = format!("ab{}yz", " ".repeat(30));
        let chunks = chunk_text(&text, &config(10, 0)).unwrap();
        assert_eq!(chunks, vec!["ab".to_string(), "yz".to_string()]);
    }

    #[test]
    fn chunk_edges_are_trimmed() {
        let chunks = chunk_text("  hello  ", &config(1000, 200)).unwrap();
        assert_eq!(chunks, vec!["hello".to_string()]);
    }

    #[test]
    fn multibyte_text_splits_on_char_boundaries() {
        // Three bytes per char, so byte-based slicing at 100 would panic.
        let text: String = "語".repeat(250);
        let chunks = chunk_text(&text, &config(100, 20)).unwrap();

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 100);
        assert_eq!(chunks[1].chars().count(), 100);
        assert_eq!(chunks[2].chars().count(), 90);
    }

    #[test]
    fn overlap_equal_to_chunk_size_is_rejected() {
        let err = chunk_text("anything", &config(100, 100)).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let err = chunk_text("anything", &config(0, 0)).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
