//! Configuration for the commentary assistant.

use serde::{Deserialize, Serialize};

/// Lower bound for `voice_volume`.
pub const MIN_VOLUME: f32 = 0.1;
/// Upper bound for `voice_volume`.
pub const MAX_VOLUME: f32 = 1.0;
/// Lower bound for `voice_rate`.
pub const MIN_RATE: f32 = 0.5;
/// Upper bound for `voice_rate`.
pub const MAX_RATE: f32 = 2.0;

/// Process-wide assistant configuration.
///
/// Mutated only through explicit update calls on the running assistant or
/// through voice-command handling; the pipeline reads a snapshot per message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Master switch for the voice features (TTS + STT).
    pub enable_voice: bool,
    /// Whether messages and opinions are spoken aloud.
    pub enable_tts: bool,
    /// Whether voice-command recognition is active.
    pub enable_stt: bool,
    /// Read every admitted message aloud instead of applying the
    /// attention heuristic.
    pub read_all_messages: bool,
    /// Whether commentary is generated for admitted messages.
    pub generate_opinions: bool,
    /// Speech rate, clamped to [`MIN_RATE`]..=[`MAX_RATE`].
    pub voice_rate: f32,
    /// Speech pitch.
    pub voice_pitch: f32,
    /// Speech volume, clamped to [`MIN_VOLUME`]..=[`MAX_VOLUME`].
    pub voice_volume: f32,
    /// Delay between processed messages in milliseconds.
    pub message_pacing_ms: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            enable_voice: true,
            enable_tts: true,
            enable_stt: true,
            // Only read selected messages to avoid spam.
            read_all_messages: false,
            generate_opinions: true,
            voice_rate: 1.0,
            voice_pitch: 1.0,
            voice_volume: 0.8,
            message_pacing_ms: 1000,
        }
    }
}

impl AssistantConfig {
    /// Adjust the speech volume by `delta`, saturating at the documented range.
    pub fn adjust_volume(&mut self, delta: f32) {
        self.voice_volume = (self.voice_volume + delta).clamp(MIN_VOLUME, MAX_VOLUME);
    }

    /// Adjust the speech rate by `delta`, saturating at the documented range.
    pub fn adjust_rate(&mut self, delta: f32) {
        self.voice_rate = (self.voice_rate + delta).clamp(MIN_RATE, MAX_RATE);
    }
}
