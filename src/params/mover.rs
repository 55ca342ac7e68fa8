//! Mover kinematics and grid layout parameters.

use glam::DVec3;

/// Per-mover oscillation parameters
#[derive(Debug, Clone)]
pub struct MoverParams {
    /// Phase increment per accumulation step (radians)
    /// Applied twice per tick, only `y` drives the height
    pub velocity: DVec3,

    /// Oscillation amplitude (world units)
    /// `y` is the sinusoid height, `x`/`z` are carried but unused
    pub amplitude: DVec3,

    /// Scale applied to the `[-1, 1]` noise sample (world units)
    pub noise_scale: f64,
}

impl Default for MoverParams {
    fn default() -> Self {
        Self {
            velocity: DVec3::new(0.1, 0.01, 0.01),
            amplitude: DVec3::new(0.5, 2.5, 0.5),
            noise_scale: 5.0,
        }
    }
}

impl MoverParams {
    /// Largest height a mover can reach (sinusoid plus full noise swing)
    pub fn height_bound(&self) -> f64 {
        self.amplitude.y.abs() + self.noise_scale.abs()
    }
}

/// Grid layout and voice pitch assignment
#[derive(Debug, Clone)]
pub struct GridParams {
    /// Number of rows (one audio voice per row)
    pub rows: usize,

    /// Movers per row
    pub cols: usize,

    /// MIDI note of row 0 (36 = C2)
    pub base_note: u8,

    /// Scale degrees in semitones above the base note
    pub scale: Vec<u8>,

    /// Starting phase step between consecutive rows (radians)
    pub row_phase_step: f64,

    /// Upper bound of the random detune added to each voice (Hz)
    pub detune_max_hz: f32,

    /// Seed for noise, detune and box colours
    pub seed: u64,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            rows: 36,
            cols: 18,
            base_note: 36,
            // Major 7th arpeggio plus the 9th
            scale: vec![0, 4, 7, 11, 14],
            row_phase_step: 0.25,
            detune_max_hz: 1.0,
            seed: 0,
        }
    }
}

impl GridParams {
    /// MIDI pitch for a row: scale degree plus one octave per 12 rows
    pub fn row_pitch(&self, row: usize) -> f32 {
        let octave = row / 12;
        let degree = self.scale[row % self.scale.len()] as usize;
        (self.base_note as usize + degree + octave * 12) as f32
    }

    /// Validate configuration (non-empty grid and scale)
    pub fn validate(&self) -> Result<(), String> {
        if self.rows == 0 || self.cols == 0 {
            return Err(format!(
                "Grid must have at least one row and column, got {}x{}",
                self.rows, self.cols
            ));
        }
        if self.scale.is_empty() {
            return Err("Musical scale must not be empty".to_string());
        }
        if !(self.detune_max_hz >= 0.0) {
            return Err(format!(
                "Detune must be non-negative, got {}",
                self.detune_max_hz
            ));
        }
        Ok(())
    }
}

/// Convert MIDI note number to frequency (Hz), A4 = 69 = 440 Hz
pub fn midi_to_hz(note: f32) -> f32 {
    440.0 * 2f32.powf((note - 69.0) / 12.0)
}
