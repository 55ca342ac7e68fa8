//! Parameter definitions with units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Units (world units, seconds, Hz, dB)
//! - Documented ranges and meanings
//! - Validation where a bad value would break the simulation

mod audio;
mod mover;
mod render;

// Re-export all types
pub use audio::{SynthParams, Timbre, VoiceMappingParams, Waveform};
pub use mover::{midi_to_hz, GridParams, MoverParams};
pub use render::{ClockParams, OrbitParams, RecordingConfig, RenderConfig};

/// Volume standing in for silence (dB)
/// Replaces the -inf that a zero gain would convert to
pub const SILENCE_DB: f32 = -100.0;

/// Complete session configuration
#[derive(Debug, Clone, Default)]
pub struct SessionParams {
    pub grid: GridParams,
    pub mover: MoverParams,
    pub mapping: VoiceMappingParams,
    pub synth: SynthParams,
    pub clock: ClockParams,
    pub orbit: OrbitParams,
    pub render: RenderConfig,
}

impl SessionParams {
    /// Validate every section
    pub fn validate(&self) -> Result<(), String> {
        self.grid.validate()?;
        self.mapping.validate()?;
        self.synth.validate()?;
        if !(self.clock.interval_s > 0.0) {
            return Err(format!(
                "Clock interval must be > 0, got {}",
                self.clock.interval_s
            ));
        }
        Ok(())
    }
}
