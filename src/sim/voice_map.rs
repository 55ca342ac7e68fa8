//! Mover height to voice volume mapping.

use crate::audio::VoiceHandle;
use crate::params::VoiceMappingParams;

/// Re-map `value` linearly from `[a1, a2]` to `[b1, b2]` without clamping
pub fn map_linear(value: f64, a1: f64, a2: f64, b1: f64, b2: f64) -> f64 {
    b1 + (value - a1) * (b2 - b1) / (a2 - a1)
}

/// Convert linear gain to decibels, substituting `floor_db` for silence
///
/// Non-positive and non-finite gains never reach `log10`.
pub fn gain_to_db(gain: f64, floor_db: f32) -> f32 {
    if gain > 0.0 && gain.is_finite() {
        ((20.0 * gain.log10()) as f32).max(floor_db)
    } else {
        floor_db
    }
}

/// Maps a row's reference height to a bounded, smoothed volume
#[derive(Debug, Clone)]
pub struct VoiceMapping {
    params: VoiceMappingParams,
}

impl VoiceMapping {
    pub fn new(params: VoiceMappingParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &VoiceMappingParams {
        &self.params
    }

    /// Volume (dB) for a mover at height `y` with vertical amplitude `amp_y`
    ///
    /// The height is remapped from `[-amp_y / 10, amp_y]` to `[-1, 1]`,
    /// clamped to the gain range and converted to decibels. Anything that
    /// lands at or below zero gain returns the silence floor.
    pub fn map_to_control(&self, y: f64, amp_y: f64) -> f32 {
        let floor = -amp_y / self.params.source_floor_divisor;
        if !(amp_y > floor) {
            return self.params.silence_db;
        }

        let (min_gain, max_gain) = self.params.gain_range;
        let gain = map_linear(y, floor, amp_y, -1.0, 1.0).clamp(min_gain, max_gain);
        gain_to_db(gain, self.params.silence_db)
    }

    /// Map the height and ramp the voice to the result
    pub fn apply<V: VoiceHandle>(&self, voice: &mut V, y: f64, amp_y: f64) -> f32 {
        let db = self.map_to_control(y, amp_y);
        voice.set_volume_smoothed(db, self.params.ramp_time_s);
        db
    }
}

impl Default for VoiceMapping {
    fn default() -> Self {
        Self::new(VoiceMappingParams::default())
    }
}
