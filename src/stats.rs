//! Pooling statistics for monitoring slot reuse.

/// Counters for pooled appends on a work buffer.
///
/// A pooled append either reuses an instance parked in a retained slot
/// or invokes the element factory. The ratio between the two is the
/// whole point of the buffer, so it is worth watching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Pooled appends served by a retained instance (no allocation).
    pub reused: usize,
    /// Pooled appends that invoked the element factory.
    pub created: usize,
}

impl PoolStats {
    /// Calculate reuse rate (0.0 to 1.0).
    pub fn reuse_rate(&self) -> f64 {
        let total = self.reused + self.created;
        if total == 0 {
            0.0
        } else {
            self.reused as f64 / total as f64
        }
    }
}
