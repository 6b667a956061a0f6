//! Quip: real-time commentary assistant for live stream chat.
//!
//! Annotates a stream of short chat messages with a generated commentary line
//! ("opinion"), deciding which messages deserve commentary, what sentiment and
//! topic context to react to, and how to pick a non-repetitive response.
//!
//! # Architecture
//!
//! The pipeline is built from independent stages serialized by a coordinator:
//!
//! - **Admission**: noise filtering and the read-aloud attention heuristic
//! - **Queue**: one message in flight at a time, with inter-message pacing
//! - **Sentiment**: remote classifier with a local lexicon fallback
//! - **Topics**: keyword extraction over a fixed vocabulary
//! - **Opinion**: layered template pools deduplicated against recent output,
//!   backed by bounded conversation memory
//! - **Speech**: a pluggable, possibly-absent synthesizer boundary
//!
//! Chat transport, speech synthesis, and speech recognition are external
//! collaborators; the crate holds all state in memory and persists nothing.

pub mod admission;
pub mod chat;
pub mod config;
pub mod error;
pub mod memory;
pub mod opinion;
pub mod pipeline;
pub mod sentiment;
pub mod speech;
pub mod topics;
pub mod voice_command;

pub use chat::{Badges, ChatMessage};
pub use config::AssistantConfig;
pub use error::{AssistantError, Result};
pub use memory::ConversationMemory;
pub use opinion::{OpinionComposer, ResponseRng};
pub use pipeline::coordinator::{Assistant, AssistantEvent, AssistantHandle, AssistantStatus};
pub use sentiment::{Sentiment, SentimentResolver};
pub use speech::{NullSpeech, SpeechOutput, VoiceSettings};
pub use topics::{Topic, TopicSet};
pub use voice_command::VoiceCommand;
