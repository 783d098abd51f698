//! Touch panel abstractions
//!
//! The toolkit consumes at most one touch sample per frame. Multi-touch
//! controllers report their primary contact only.

/// A raw touch coordinate in panel pixels (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchPoint {
    pub x: i32,
    pub y: i32,
}

impl TouchPoint {
    /// Create a new touch point
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Single-point touch panel
pub trait TouchPanel {
    /// Driver-specific error type
    type Error;

    /// Sample the panel once
    ///
    /// Returns `Ok(Some(point))` while the panel is touched and `Ok(None)`
    /// when it is released.
    fn sample(&mut self) -> Result<Option<TouchPoint>, Self::Error>;
}
