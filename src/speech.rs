//! Speech collaborator boundaries.
//!
//! The pipeline treats speech synthesis as "may be unavailable": hosts plug in
//! a real synthesizer behind [`SpeechOutput`], and [`NullSpeech`] keeps the
//! assistant fully functional when none exists. Speech failures are absorbed
//! at the call site and never stall the queue.

use crate::error::Result;
use async_trait::async_trait;

/// Voice parameters forwarded opaquely to the synthesizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceSettings {
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            rate: 1.0,
            pitch: 1.0,
            volume: 0.8,
        }
    }
}

/// Speech-output boundary.
#[async_trait]
pub trait SpeechOutput: Send + Sync {
    /// Synthesize and play `text`, resolving on playback completion.
    async fn speak(&self, text: &str, settings: VoiceSettings) -> Result<()>;

    /// Whether a working synthesizer is available.
    fn is_available(&self) -> bool {
        true
    }

    /// Cancel any in-flight speech.
    fn stop(&self) {}
}

/// No-op speech output for hosts without a synthesizer.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSpeech;

#[async_trait]
impl SpeechOutput for NullSpeech {
    async fn speak(&self, _text: &str, _settings: VoiceSettings) -> Result<()> {
        Ok(())
    }

    fn is_available(&self) -> bool {
        false
    }
}
