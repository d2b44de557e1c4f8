/// Operations an `IntentQueue` dispatches for raised intent latches.
pub trait IntentTarget {
    fn capture_photo(&self);

    fn start_recording(&self);

    fn stop_recording(&self);

    fn rotate_camera(&self);

    fn cycle_flash_mode(&self);
}
