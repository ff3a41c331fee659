//! Document loading and segmentation.
//!
//! A document exists only for the duration of one ingestion call: bytes in,
//! extracted text through the segmenter, passages out. Nothing here talks to
//! the network.

pub mod loader;
pub mod segmenter;

pub use segmenter::{segment, Passage, SegmenterConfig};
