//! Mover simulation and the height to volume mapping.

mod grid;
mod mover;
mod voice_map;

// Re-export public types
pub use grid::MoverGrid;
pub use mover::Mover;
pub use voice_map::{gain_to_db, map_linear, VoiceMapping};
