pub mod directory_sink;
pub mod metadata;
