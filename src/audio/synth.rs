//! Bank of continuously sounding mono voices with smoothed volume.
//!
//! The bank is shared between the simulation thread (voice handles) and the
//! audio callback behind a mutex. Volume ramps run per sample, linearly in
//! decibels, so per-tick volume changes never step.

use std::f32::consts::TAU;
use std::sync::{Arc, Mutex, MutexGuard};

use super::voice::{VoiceFactory, VoiceHandle};
use crate::params::{SynthParams, Timbre, Waveform, SILENCE_DB};

/// Convert decibels to linear gain, treating the floor as silence
pub fn db_to_gain(db: f32) -> f32 {
    if db <= SILENCE_DB {
        0.0
    } else {
        10f32.powf(db / 20.0)
    }
}

/// Oscillator output for `phase` in `[0, 1)`
fn oscillator(waveform: Waveform, phase: f32) -> f32 {
    match waveform {
        Waveform::Sawtooth => 2.0 * phase - 1.0,
        Waveform::Square => {
            if phase < 0.5 {
                1.0
            } else {
                -1.0
            }
        }
        Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
        Waveform::Sine => (phase * TAU).sin(),
    }
}

/// Audio-thread state of one voice
#[derive(Debug, Clone)]
struct VoiceState {
    waveform: Waveform,
    attack_s: f32,
    frequency_hz: f32,
    phase: f32,
    /// Samples left before the voice begins sounding
    delay_samples: u64,
    sounding: bool,
    envelope: f32,
    envelope_step: f32,
    volume_db: f32,
    target_db: f32,
    db_step: f32,
    ramp_samples: u64,
}

impl VoiceState {
    fn new(timbre: &Timbre) -> Self {
        Self {
            waveform: timbre.waveform,
            attack_s: timbre.attack_s,
            frequency_hz: 0.0,
            phase: 0.0,
            delay_samples: 0,
            sounding: false,
            envelope: 0.0,
            envelope_step: 1.0,
            // Silent until the first volume update arrives
            volume_db: SILENCE_DB,
            target_db: SILENCE_DB,
            db_step: 0.0,
            ramp_samples: 0,
        }
    }

    fn next_sample(&mut self, sample_rate: f32) -> f32 {
        if !self.sounding {
            return 0.0;
        }
        if self.delay_samples > 0 {
            self.delay_samples -= 1;
            return 0.0;
        }

        if self.ramp_samples > 0 {
            self.ramp_samples -= 1;
            self.volume_db = if self.ramp_samples == 0 {
                self.target_db
            } else {
                self.volume_db + self.db_step
            };
        }
        self.envelope = (self.envelope + self.envelope_step).min(1.0);

        let out = oscillator(self.waveform, self.phase) * self.envelope * db_to_gain(self.volume_db);
        self.phase = (self.phase + self.frequency_hz / sample_rate).fract();
        out
    }
}

/// Mixer for all voices of a session
#[derive(Debug)]
pub struct SynthBank {
    sample_rate: f32,
    master_gain: f32,
    limit: f32,
    voices: Vec<VoiceState>,
}

impl SynthBank {
    pub fn new(sample_rate_hz: u32, params: &SynthParams) -> Self {
        Self {
            sample_rate: sample_rate_hz as f32,
            master_gain: params.master_gain,
            limit: params.limit,
            voices: Vec::new(),
        }
    }

    /// Current volume of a voice (dB)
    pub fn voice_volume_db(&self, index: usize) -> Option<f32> {
        self.voices.get(index).map(|v| v.volume_db)
    }

    fn add_voice(&mut self, timbre: &Timbre) -> usize {
        self.voices.push(VoiceState::new(timbre));
        self.voices.len() - 1
    }

    fn start_voice(&mut self, index: usize, frequency_hz: f32, start_time_s: f32, fade_time_s: f32) {
        let sample_rate = self.sample_rate;
        if let Some(voice) = self.voices.get_mut(index) {
            // The envelope attack is the longer of the timbre attack and the requested fade
            let attack_samples = (voice.attack_s.max(fade_time_s) * sample_rate).max(1.0);
            voice.frequency_hz = frequency_hz;
            voice.phase = 0.0;
            voice.delay_samples = (start_time_s.max(0.0) * sample_rate) as u64;
            voice.envelope = 0.0;
            voice.envelope_step = 1.0 / attack_samples;
            voice.sounding = true;
        }
    }

    fn ramp_voice(&mut self, index: usize, db: f32, ramp_time_s: f32) {
        let sample_rate = self.sample_rate;
        if let Some(voice) = self.voices.get_mut(index) {
            let db = if db.is_finite() { db.max(SILENCE_DB) } else { SILENCE_DB };
            let samples = (ramp_time_s.max(0.0) * sample_rate).round() as u64;
            if samples == 0 {
                voice.volume_db = db;
                voice.ramp_samples = 0;
            } else {
                voice.db_step = (db - voice.volume_db) / samples as f32;
                voice.ramp_samples = samples;
            }
            voice.target_db = db;
        }
    }

    /// Fill an interleaved buffer of `channels` channels
    ///
    /// Every channel receives the same mono mix.
    pub fn render(&mut self, data: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        for frame in data.chunks_mut(channels) {
            let mut mix = 0.0;
            for voice in &mut self.voices {
                mix += voice.next_sample(self.sample_rate);
            }
            // Safety limiter
            let sample = (mix * self.master_gain).clamp(-self.limit, self.limit);
            frame.fill(sample);
        }
    }
}

/// Lock the bank, recovering it if a previous holder panicked
///
/// Bank state is plain data and stays usable after a panic mid-render.
pub(crate) fn lock_bank(bank: &Mutex<SynthBank>) -> MutexGuard<'_, SynthBank> {
    bank.lock().unwrap_or_else(|poisoned| {
        log::warn!("Synth bank lock poisoned, recovering");
        bank.clear_poison();
        poisoned.into_inner()
    })
}

/// Handle to one voice inside a shared `SynthBank`
#[derive(Debug, Clone)]
pub struct SynthVoice {
    index: usize,
    bank: Arc<Mutex<SynthBank>>,
}

impl VoiceHandle for SynthVoice {
    fn start(&mut self, frequency_hz: f32, start_time_s: f32, fade_time_s: f32) {
        lock_bank(&self.bank).start_voice(self.index, frequency_hz, start_time_s, fade_time_s);
    }

    fn set_volume_smoothed(&mut self, db: f32, ramp_time_s: f32) {
        lock_bank(&self.bank).ramp_voice(self.index, db, ramp_time_s);
    }
}

/// Adds voices to a shared `SynthBank`
#[derive(Debug, Clone)]
pub struct SynthFactory {
    bank: Arc<Mutex<SynthBank>>,
}

impl SynthFactory {
    pub fn new(bank: Arc<Mutex<SynthBank>>) -> Self {
        Self { bank }
    }
}

impl VoiceFactory for SynthFactory {
    type Voice = SynthVoice;

    fn create_voice(&mut self, timbre: &Timbre) -> SynthVoice {
        let index = lock_bank(&self.bank).add_voice(timbre);
        SynthVoice {
            index,
            bank: Arc::clone(&self.bank),
        }
    }
}
