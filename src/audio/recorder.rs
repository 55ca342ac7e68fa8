//! Offline WAV capture of a `SynthBank`.

use anyhow::Context;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use super::synth::SynthBank;

const CHANNELS: u16 = 2;

/// Writes bank output to a 32-bit float stereo WAV file
pub struct WavRecorder {
    writer: hound::WavWriter<BufWriter<File>>,
    sample_rate: u32,
    /// Fractional frames carried between calls so no drift accumulates
    frame_remainder: f64,
    frames_written: u64,
    buffer: Vec<f32>,
}

impl WavRecorder {
    pub fn create(path: impl AsRef<Path>, sample_rate: u32) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let spec = hound::WavSpec {
            channels: CHANNELS,
            sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let writer = hound::WavWriter::create(path, spec)
            .with_context(|| format!("Failed to create WAV writer at {}", path.display()))?;

        Ok(Self {
            writer,
            sample_rate,
            frame_remainder: 0.0,
            frames_written: 0,
            buffer: Vec::new(),
        })
    }

    /// Render and write `duration_s` seconds of audio from the bank
    pub fn capture(&mut self, bank: &mut SynthBank, duration_s: f32) -> anyhow::Result<()> {
        let exact = duration_s as f64 * self.sample_rate as f64 + self.frame_remainder;
        let frames = exact.floor();
        self.frame_remainder = exact - frames;

        self.buffer.clear();
        self.buffer.resize(frames as usize * CHANNELS as usize, 0.0);
        bank.render(&mut self.buffer, CHANNELS as usize);

        for &sample in &self.buffer {
            self.writer
                .write_sample(sample)
                .context("Failed to write WAV sample")?;
        }
        self.frames_written += frames as u64;
        Ok(())
    }

    /// Flush the header and close the file
    pub fn finalize(self) -> anyhow::Result<u64> {
        let frames = self.frames_written;
        self.writer.finalize().context("Failed to finalize WAV file")?;
        Ok(frames)
    }
}
