//! Voice command detection for hands-free assistant control.
//!
//! Finalized transcripts from the speech-input boundary are scanned for
//! command phrases before anything else happens; recognized commands mutate
//! the assistant configuration and are acknowledged aloud.
//!
//! # Supported Commands
//!
//! | Phrase | Command |
//! |--------|---------|
//! | "read chat" | `ReadAllMessages` |
//! | "stop reading" | `ReadSelectedOnly` |
//! | "volume up" / "volume down" | `VolumeUp` / `VolumeDown` |
//! | "speak faster" / "speak slower" | `SpeakFaster` / `SpeakSlower` |
//! | "stop talking" | `StopSpeaking` |
//! | "say hello" | `SayHello` |

use crate::config::AssistantConfig;

/// Volume adjustment per command.
pub const VOLUME_STEP: f32 = 0.2;
/// Rate adjustment per command.
pub const RATE_STEP: f32 = 0.2;

/// A voice command detected in a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceCommand {
    /// Read every admitted message aloud.
    ReadAllMessages,
    /// Return to the attention heuristic.
    ReadSelectedOnly,
    VolumeUp,
    VolumeDown,
    SpeakFaster,
    SpeakSlower,
    /// Cancel any in-flight speech.
    StopSpeaking,
    /// Speak the canned greeting.
    SayHello,
}

impl VoiceCommand {
    /// Detect a command phrase in `transcript`, case-insensitively.
    /// First matching phrase wins.
    #[must_use]
    pub fn parse(transcript: &str) -> Option<Self> {
        let lower = transcript.to_lowercase();
        if lower.contains("read chat") {
            Some(Self::ReadAllMessages)
        } else if lower.contains("stop reading") {
            Some(Self::ReadSelectedOnly)
        } else if lower.contains("volume up") {
            Some(Self::VolumeUp)
        } else if lower.contains("volume down") {
            Some(Self::VolumeDown)
        } else if lower.contains("speak faster") {
            Some(Self::SpeakFaster)
        } else if lower.contains("speak slower") {
            Some(Self::SpeakSlower)
        } else if lower.contains("stop talking") {
            Some(Self::StopSpeaking)
        } else if lower.contains("say hello") {
            Some(Self::SayHello)
        } else {
            None
        }
    }

    /// Apply the command to `config`; returns the spoken acknowledgement,
    /// if any. [`VoiceCommand::StopSpeaking`] is handled by the caller (it
    /// touches the speech boundary, not the config) and has no acknowledgement.
    pub fn apply(self, config: &mut AssistantConfig) -> Option<&'static str> {
        match self {
            Self::ReadAllMessages => {
                config.read_all_messages = true;
                Some("I'll now read all chat messages")
            }
            Self::ReadSelectedOnly => {
                config.read_all_messages = false;
                Some("I'll now only read selected messages")
            }
            Self::VolumeUp => {
                config.adjust_volume(VOLUME_STEP);
                Some("Volume increased")
            }
            Self::VolumeDown => {
                config.adjust_volume(-VOLUME_STEP);
                Some("Volume decreased")
            }
            Self::SpeakFaster => {
                config.adjust_rate(RATE_STEP);
                Some("Speaking faster now")
            }
            Self::SpeakSlower => {
                config.adjust_rate(-RATE_STEP);
                Some("Speaking slower now")
            }
            Self::StopSpeaking => None,
            Self::SayHello => Some("Hello everyone! Welcome to the stream!"),
        }
    }
}
