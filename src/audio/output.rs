//! Live audio output through the default cpal device.

use anyhow::{anyhow, Context};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::{Arc, Mutex};

use super::synth::{lock_bank, SynthBank, SynthFactory};
use crate::params::SynthParams;

/// Audio output playing a shared `SynthBank`
pub struct AudioOutput {
    bank: Arc<Mutex<SynthBank>>,

    /// Audio output stream (kept alive)
    _stream: cpal::Stream,
}

impl AudioOutput {
    /// Open the default output device and start streaming an empty bank
    pub fn start(params: &SynthParams) -> anyhow::Result<Self> {
        params
            .validate()
            .map_err(|e| anyhow!("Invalid synth config: {}", e))?;

        // Setup audio output device
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("No audio output device found"))?;

        let config = device
            .default_output_config()
            .context("Failed to get audio config")?;

        let sample_rate = config.sample_rate().0;
        let channels = config.channels() as usize;
        log::info!(
            "Audio: {} @ {}Hz, {} channels",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            sample_rate,
            channels
        );

        let bank = Arc::new(Mutex::new(SynthBank::new(sample_rate, params)));
        let bank_clone = Arc::clone(&bank);

        // Build audio output stream
        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    lock_bank(&bank_clone).render(data, channels);
                },
                |err| log::error!("Audio stream error: {}", err),
                None,
            )
            .context("Failed to build audio stream")?;

        stream.play().context("Failed to start audio stream")?;

        Ok(Self {
            bank,
            _stream: stream,
        })
    }

    /// Factory adding voices to the playing bank
    pub fn voice_factory(&self) -> SynthFactory {
        SynthFactory::new(Arc::clone(&self.bank))
    }
}
