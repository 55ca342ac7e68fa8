//! Voice timbre, volume mapping and synth output configuration.

/// Oscillator shape for a voice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    #[default]
    Sawtooth,
    Square,
    Triangle,
    Sine,
}

impl Waveform {
    /// Parse waveform name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "saw" | "sawtooth" => Some(Self::Sawtooth),
            "square" => Some(Self::Square),
            "triangle" | "tri" => Some(Self::Triangle),
            "sine" | "sin" => Some(Self::Sine),
            _ => None,
        }
    }
}

/// Sound of a single voice
#[derive(Debug, Clone)]
pub struct Timbre {
    pub waveform: Waveform,

    /// Amplitude envelope attack (seconds)
    pub attack_s: f32,
}

impl Default for Timbre {
    fn default() -> Self {
        Self {
            waveform: Waveform::Sawtooth,
            attack_s: 0.01,
        }
    }
}

/// Mapping from a mover height to a voice volume
#[derive(Debug, Clone)]
pub struct VoiceMappingParams {
    /// Source range lower bound as a fraction of the amplitude
    /// Formula: lower = -amplitude / this_divisor
    pub source_floor_divisor: f64,

    /// Clamp applied to the remapped linear gain
    pub gain_range: (f64, f64),

    /// Volume used for silent (non-positive) gains (dB)
    pub silence_db: f32,

    /// Volume ramp duration per tick (seconds)
    pub ramp_time_s: f32,

    /// Fade-in time passed to each voice when it starts (seconds)
    pub start_fade_s: f32,
}

impl Default for VoiceMappingParams {
    fn default() -> Self {
        Self {
            source_floor_divisor: 10.0,
            gain_range: (0.0, 3.0),
            silence_db: super::SILENCE_DB,
            ramp_time_s: 0.01,
            start_fade_s: 0.01,
        }
    }
}

impl VoiceMappingParams {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.source_floor_divisor.is_finite() && self.source_floor_divisor > 0.0) {
            return Err(format!(
                "Source floor divisor must be finite and > 0, got {}",
                self.source_floor_divisor
            ));
        }
        let (min_gain, max_gain) = self.gain_range;
        if !(min_gain <= max_gain) {
            return Err(format!(
                "Gain range must be ordered, got ({}, {})",
                min_gain, max_gain
            ));
        }
        if !self.silence_db.is_finite() {
            return Err(format!("Silence level must be finite, got {}", self.silence_db));
        }
        if !(self.ramp_time_s >= 0.0) {
            return Err(format!(
                "Ramp time must be non-negative, got {}",
                self.ramp_time_s
            ));
        }
        if !(self.start_fade_s >= 0.0) {
            return Err(format!(
                "Start fade must be non-negative, got {}",
                self.start_fade_s
            ));
        }
        Ok(())
    }
}

/// Synth bank output configuration
#[derive(Debug, Clone)]
pub struct SynthParams {
    /// Sample rate for offline rendering (Hz)
    /// Live output uses the device rate instead
    pub sample_rate_hz: u32,

    /// Gain applied to the summed voices before limiting
    pub master_gain: f32,

    /// Hard clip applied to every output sample
    pub limit: f32,

    pub timbre: Timbre,
}

impl Default for SynthParams {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44100,
            master_gain: 0.05,
            // Safety limiter: hard clip to ±0.5 to prevent ear damage
            limit: 0.5,
            timbre: Timbre::default(),
        }
    }
}

impl SynthParams {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_rate_hz == 0 {
            return Err("Sample rate must be > 0".to_string());
        }
        if !(self.limit > 0.0) {
            return Err(format!("Limiter must be > 0, got {}", self.limit));
        }
        if !(self.timbre.attack_s >= 0.0) {
            return Err(format!(
                "Attack must be non-negative, got {}",
                self.timbre.attack_s
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waveform_from_name() {
        assert_eq!(Waveform::from_name("Saw"), Some(Waveform::Sawtooth));
        assert_eq!(Waveform::from_name("sine"), Some(Waveform::Sine));
        assert_eq!(Waveform::from_name("tri"), Some(Waveform::Triangle));
        assert_eq!(Waveform::from_name("noise"), None);
    }

    #[test]
    fn test_mapping_params_validate() {
        let mut params = VoiceMappingParams::default();
        assert!(params.validate().is_ok());

        params.gain_range = (3.0, 0.0);
        assert!(params.validate().is_err());

        params.gain_range = (f64::NAN, 3.0);
        assert!(params.validate().is_err());

        params = VoiceMappingParams {
            source_floor_divisor: 0.0,
            ..VoiceMappingParams::default()
        };
        assert!(params.validate().is_err());

        params.source_floor_divisor = f64::INFINITY;
        assert!(params.validate().is_err());

        params = VoiceMappingParams {
            ramp_time_s: -0.01,
            ..VoiceMappingParams::default()
        };
        assert!(params.validate().is_err());

        params = VoiceMappingParams {
            start_fade_s: -1.0,
            ..VoiceMappingParams::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_synth_params_validate() {
        let mut params = SynthParams::default();
        assert!(params.validate().is_ok());

        params.sample_rate_hz = 0;
        assert!(params.validate().is_err());
    }
}
