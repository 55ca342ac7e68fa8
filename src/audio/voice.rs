//! Voice interfaces between the simulation and a synthesizer.

use crate::params::Timbre;

/// A continuously sounding synth voice
pub trait VoiceHandle {
    /// Begin sounding at `frequency_hz` after `start_time_s`, fading in over `fade_time_s`
    fn start(&mut self, frequency_hz: f32, start_time_s: f32, fade_time_s: f32);

    /// Ramp the voice volume to `db` over `ramp_time_s`
    fn set_volume_smoothed(&mut self, db: f32, ramp_time_s: f32);
}

/// Creates voices for the grid rows
pub trait VoiceFactory {
    type Voice: VoiceHandle;

    fn create_voice(&mut self, timbre: &Timbre) -> Self::Voice;
}
