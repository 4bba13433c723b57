//! Utility types and functions for stormlight.
//!
//! - [`Error`] / [`Result`] - Error handling
//! - Math type re-exports from glam and 2D bounds

mod error;
mod math;

pub use error::*;
pub use math::*;
