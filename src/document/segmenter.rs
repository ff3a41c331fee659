use serde::{Deserialize, Serialize};

use crate::core::errors::CoreError;

/// Segmentation parameters, in characters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Maximum passage length.
    pub target_size: usize,
    /// Trailing characters repeated at the start of the next passage.
    pub overlap: usize,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            target_size: 2000,
            overlap: 300,
        }
    }
}

/// An overlapping slice of document text, the unit of embedding and
/// retrieval. Passages are written as a batch and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passage {
    /// Position within the source document, starting at 0.
    pub ordinal: usize,
    pub text: String,
    /// Source document name this passage was cut from.
    pub source: String,
}

/// Split `text` into overlapping passages using a sliding window.
///
/// Each passage after the first begins `target_size - overlap` characters
/// into the prior passage's span, so trailing content is duplicated across
/// the boundary. The split is deterministic, covers every character, and
/// keeps the trailing partial passage.
pub fn segment(text: &str, config: &SegmenterConfig, source: &str) -> Result<Vec<Passage>, CoreError> {
    if config.target_size == 0 {
        return Err(CoreError::BadRequest(
            "segmenter target_size must be positive".to_string(),
        ));
    }
    if config.overlap >= config.target_size {
        return Err(CoreError::BadRequest(format!(
            "segmenter overlap ({}) must be smaller than target_size ({})",
            config.overlap, config.target_size
        )));
    }

    let chars: Vec<char> = text.chars().collect();
    let total = chars.len();
    let step = config.target_size - config.overlap;

    let mut passages = Vec::new();
    let mut start = 0;

    while start < total {
        let end = (start + config.target_size).min(total);
        passages.push(Passage {
            ordinal: passages.len(),
            text: chars[start..end].iter().collect(),
            source: source.to_string(),
        });

        if end == total {
            break;
        }
        start += step;
    }

    Ok(passages)
}
