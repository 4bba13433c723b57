//! Per-frame time update for a glow path.

use crate::material::MaterialHandle;

/// Writes host frame timestamps into the shared `Time` uniform.
///
/// Has no clock of its own; the host passes the timestamp of each frame.
#[derive(Debug)]
pub struct AnimationDriver {
    material: MaterialHandle,
    last_timestamp: Option<f64>,
}

impl AnimationDriver {
    pub(crate) fn new(material: MaterialHandle) -> Self {
        Self {
            material,
            last_timestamp: None,
        }
    }

    /// Set `Time` to `timestamp_millis / 1000` seconds.
    ///
    /// Never fails. Calling again with the same timestamp changes nothing.
    pub fn advance(&mut self, timestamp_millis: f64) {
        let seconds = (timestamp_millis / 1000.0) as f32;
        self.material.set_time(seconds);
        self.last_timestamp = Some(timestamp_millis);
        tracing::trace!(timestamp_millis, seconds, "advance");
    }

    /// Timestamp of the most recent `advance`, in milliseconds.
    pub fn last_timestamp(&self) -> Option<f64> {
        self.last_timestamp
    }
}
