//! Gesture routing from the preview surface to the session.

use log::debug;

use crate::intents::flags::IntentFlags;
use crate::models::camera_models::{Point, Size};
use crate::models::config::SessionConfiguration;
use crate::traits::gesture_target::GestureTarget;

/// Map a tap in preview coordinates to the device point of interest.
///
/// The sensor is mounted landscape, so the axes swap: `x = tap.y / height`,
/// `y = 1 - tap.x / width`, clamped to `[0, 1]`. A degenerate preview maps
/// to the center.
pub fn point_of_interest(tap: Point, preview_size: Size) -> Point {
    let usable = |v: f64| v.is_finite() && v > 0.0;
    if !usable(preview_size.width) || !usable(preview_size.height) {
        return Point::new(0.5, 0.5);
    }

    let unit = |v: f64| if v.is_nan() { 0.5 } else { v.clamp(0.0, 1.0) };
    Point::new(
        unit(tap.y / preview_size.height),
        unit(1.0 - tap.x / preview_size.width),
    )
}

/// Applies the configured gesture toggles before forwarding to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureRouter {
    tap_to_focus: bool,
    double_tap_camera_switch: bool,
    pinch_to_zoom: bool,
}

impl GestureRouter {
    pub fn new(config: &SessionConfiguration) -> Self {
        Self {
            tap_to_focus: config.tap_to_focus,
            double_tap_camera_switch: config.double_tap_camera_switch,
            pinch_to_zoom: config.pinch_to_zoom,
        }
    }

    /// Returns whether the gesture was forwarded.
    pub fn single_tap<T: GestureTarget + ?Sized>(&self, target: &T, tap: Point, preview_size: Size) -> bool {
        if !self.tap_to_focus {
            debug!("tap ignored, tap to focus disabled");
            return false;
        }
        target.focus(tap, preview_size);
        true
    }

    /// Double tap raises the rotate intent rather than calling the session.
    pub fn double_tap(&self, intents: &IntentFlags) -> bool {
        if !self.double_tap_camera_switch {
            debug!("double tap ignored, camera switch disabled");
            return false;
        }
        intents.rotate_camera()
    }

    pub fn pinch_began<T: GestureTarget + ?Sized>(&self, target: &T) -> bool {
        if !self.pinch_to_zoom {
            return false;
        }
        target.begin_zoom();
        true
    }

    pub fn pinch_changed<T: GestureTarget + ?Sized>(&self, target: &T, gesture_scale: f64) -> bool {
        if !self.pinch_to_zoom {
            return false;
        }
        target.zoom_by_gesture(gesture_scale);
        true
    }
}
