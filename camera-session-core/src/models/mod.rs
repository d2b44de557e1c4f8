pub mod camera_models;
pub mod config;
pub mod device;
pub mod error;
pub mod event;
pub mod recording;
pub mod state;
