//! Path geometry: segmentation and UV parameterization.

mod segment;
mod uv;

pub use segment::{segment_path, Segment, SegmentedPath};
pub use uv::{parameterize, UvRange};
