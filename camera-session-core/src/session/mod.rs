pub mod camera_session;
pub mod gestures;
pub mod notifier;
pub mod worker;
