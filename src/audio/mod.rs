//! Audio voices for the grid rows.
//!
//! A `SynthBank` of mono voices is played live through cpal or captured
//! offline to WAV. The simulation only sees the `VoiceHandle` trait.

mod output;
mod recorder;
mod synth;
mod voice;

// Re-export public types
pub use output::AudioOutput;
pub use recorder::WavRecorder;
pub use synth::{db_to_gain, SynthBank, SynthFactory, SynthVoice};
pub(crate) use synth::lock_bank;
pub use voice::{VoiceFactory, VoiceHandle};
