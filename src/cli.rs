//! Command-line argument parsing.

use clap::Parser;

use crate::params::{RecordingConfig, SessionParams, Waveform};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "wavegrid")]
#[command(about = "Grid of noise-driven oscillating boxes, one synth voice per row", long_about = None)]
pub struct Args {
    /// Number of rows (one synth voice each)
    #[arg(long, value_name = "N", default_value = "36")]
    pub rows: usize,

    /// Boxes per row
    #[arg(long, value_name = "N", default_value = "18")]
    pub cols: usize,

    /// Seed for noise, detune and colours
    #[arg(long, value_name = "SEED", default_value = "0")]
    pub seed: u64,

    /// Voice waveform: sawtooth (default), square, triangle, sine
    #[arg(long, value_name = "SHAPE", default_value = "sawtooth")]
    pub waveform: String,

    /// Record offline to WAV instead of opening a window (duration in seconds)
    #[arg(long, value_name = "SECONDS")]
    pub record: Option<f32>,

    /// Output path for --record
    #[arg(long, value_name = "PATH", default_value = "wavegrid.wav")]
    pub output: String,
}

impl Args {
    /// Parse waveform from command-line arguments
    pub fn parse_waveform(&self) -> Waveform {
        Waveform::from_name(&self.waveform).unwrap_or_else(|| {
            log::warn!("Unknown waveform '{}', using sawtooth", self.waveform);
            Waveform::Sawtooth
        })
    }

    /// Session parameters with command-line overrides applied
    pub fn session_params(&self) -> SessionParams {
        let mut params = SessionParams::default();
        params.grid.rows = self.rows;
        params.grid.cols = self.cols;
        params.grid.seed = self.seed;
        params.synth.timbre.waveform = self.parse_waveform();
        params
    }

    /// Create recording configuration if recording mode is enabled
    pub fn recording_config(&self) -> Option<RecordingConfig> {
        self.record
            .map(|duration| RecordingConfig::new(duration, self.output.clone()))
    }
}
