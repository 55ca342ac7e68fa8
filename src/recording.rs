//! Headless offline run: simulate at a fixed frame rate and capture audio.

use std::sync::{Arc, Mutex};

use anyhow::anyhow;

use crate::audio::{lock_bank, SynthBank, SynthFactory, WavRecorder};
use crate::params::{RecordingConfig, SessionParams};
use crate::scene::HeadlessScene;
use crate::session::Bootstrap;

/// Result of an offline recording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordingSummary {
    pub frames_simulated: u64,
    pub audio_frames_written: u64,
}

/// Run a session without a window and write its audio to a WAV file
///
/// Audio for each frame is rendered right after that frame's update, so
/// volume ramps line up with the simulation exactly as they would live.
pub fn record_offline(
    params: &SessionParams,
    config: &RecordingConfig,
) -> anyhow::Result<RecordingSummary> {
    if config.fps == 0 {
        return Err(anyhow!("Recording frame rate must be > 0"));
    }

    let sample_rate = params.synth.sample_rate_hz;
    let bank = Arc::new(Mutex::new(SynthBank::new(sample_rate, &params.synth)));
    let mut factory = SynthFactory::new(Arc::clone(&bank));

    let mut session = Bootstrap::new().launch(params, &mut factory, HeadlessScene::new())?;
    let mut recorder = WavRecorder::create(&config.output_path, sample_rate)?;

    let frame_time_s = config.frame_time_s();
    let total_frames = config.total_frames();
    log::info!(
        "Recording {} frames ({:.1}s) to {}",
        total_frames,
        config.duration_secs,
        config.output_path
    );

    for frame in 0..total_frames {
        session.on_refresh(frame_time_s);

        recorder.capture(&mut lock_bank(&bank), frame_time_s)?;

        if frame > 0 && frame % (config.fps as usize * 10) == 0 {
            log::info!("Recorded {}s", frame / config.fps as usize);
        }
    }
    session.stop();

    let audio_frames_written = recorder.finalize()?;
    log::info!("Recording complete: {}", config.output_path);

    Ok(RecordingSummary {
        frames_simulated: session.scheduler().ticks(),
        audio_frames_written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::GridParams;

    #[test]
    fn test_record_offline_small_grid() {
        let path = std::env::temp_dir().join(format!("wavegrid_offline_{}.wav", std::process::id()));
        let params = SessionParams {
            grid: GridParams {
                rows: 4,
                cols: 2,
                ..GridParams::default()
            },
            ..SessionParams::default()
        };
        let config = RecordingConfig::new(0.5, path.to_string_lossy());

        let summary = record_offline(&params, &config).unwrap();

        assert_eq!(summary.frames_simulated, 30);
        assert!((22049..=22050).contains(&summary.audio_frames_written));

        let mut reader = hound::WavReader::open(&path).unwrap();
        assert!(reader
            .samples::<f32>()
            .all(|s| s.map(|v| v.is_finite() && v.abs() <= 0.5).unwrap_or(false)));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_zero_fps_is_rejected() {
        let mut config = RecordingConfig::new(1.0, "unused.wav");
        config.fps = 0;
        assert!(record_offline(&SessionParams::default(), &config).is_err());
    }
}
