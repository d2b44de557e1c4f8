use crate::models::camera_models::{Point, Size};

/// Operations a `GestureRouter` drives directly (no intent latch involved).
pub trait GestureTarget {
    /// Focus at `tap`, given in preview coordinates of a preview of `preview_size`.
    fn focus(&self, tap: Point, preview_size: Size);

    /// Snapshot the current zoom as the base for the next pinch.
    fn begin_zoom(&self);

    /// Zoom to the gesture base multiplied by `gesture_scale`.
    fn zoom_by_gesture(&self, gesture_scale: f64);
}
