pub mod authorization;
pub mod camera_hardware;
pub mod gesture_target;
pub mod intent_target;
pub mod media_sink;
