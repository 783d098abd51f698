//! Touch sample conditioning
//!
//! Panels report "touched at (x, y)" every frame for as long as a finger
//! rests on them. Widgets need to tell the first frame of a contact apart
//! from a hold, and the coordinates need the panel calibration applied.

use tapui_display::Rect;
use tapui_hal::TouchPoint;

use crate::config::TouchCalibration;

/// A calibrated touch sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchInput {
    pub x: i32,
    pub y: i32,
    /// First frame of this contact
    pub fresh: bool,
}

/// Turns per-frame raw samples into calibrated [`TouchInput`]s
#[derive(Debug, Clone)]
pub struct TouchTracker {
    calibration: TouchCalibration,
    touching: bool,
}

impl TouchTracker {
    pub const fn new(calibration: TouchCalibration) -> Self {
        Self {
            calibration,
            touching: false,
        }
    }

    /// Feed one frame's raw sample
    ///
    /// Returns `None` while released. The first touched frame after a
    /// release is `fresh`.
    pub fn update(&mut self, sample: Option<TouchPoint>) -> Option<TouchInput> {
        let Some(point) = sample else {
            self.touching = false;
            return None;
        };
        let fresh = !self.touching;
        self.touching = true;
        Some(TouchInput {
            x: point.x + self.calibration.offset_x,
            y: point.y + self.calibration.offset_y,
            fresh,
        })
    }

    /// Raw position after calibration, without edge tracking
    pub fn calibrate(&self, point: TouchPoint) -> TouchPoint {
        TouchPoint::new(
            point.x + self.calibration.offset_x,
            point.y + self.calibration.offset_y,
        )
    }

    pub fn is_touching(&self) -> bool {
        self.touching
    }
}

/// Fixed touch-sensitive area outside the widget layers
///
/// Typically one of the printed buttons below the display. Zones see raw
/// panel coordinates.
#[derive(Debug, Clone)]
pub struct TouchZone {
    rect: Rect,
    pressed: bool,
}

impl TouchZone {
    pub const fn new(rect: Rect) -> Self {
        Self {
            rect,
            pressed: false,
        }
    }

    /// Feed one frame's raw sample; returns `true` on the frame the zone
    /// becomes pressed
    pub fn update(&mut self, sample: Option<TouchPoint>) -> bool {
        let inside = sample.is_some_and(|p| self.rect.contains(p.x, p.y));
        let just_pressed = inside && !self.pressed;
        self.pressed = inside;
        just_pressed
    }

    /// Check if the zone is held this frame
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }
}
