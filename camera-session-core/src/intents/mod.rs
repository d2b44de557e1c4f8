pub mod flags;
pub mod queue;
