//! Wavegrid library - noise-driven mover grid with one synth voice per row

pub mod audio;
pub mod camera;
pub mod cli;
pub mod noise;
pub mod params;
pub mod recording;
pub mod rendering;
pub mod scene;
pub mod scheduler;
pub mod session;
pub mod sim;
