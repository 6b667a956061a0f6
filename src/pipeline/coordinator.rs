//! Serializing coordinator that drains admitted chat messages one at a time.
//!
//! Message arrival is push-driven and asynchronous, but commentary generation
//! and speech are serialized here: a single drain task runs at most one
//! (resolve → extract → compose → speak) pipeline at a time, with a fixed
//! pacing delay between messages. Conversation memory is only ever touched
//! from that task, so it needs no lock. Stopping the assistant lets the
//! current message finish and discards the rest of the queue.

use crate::admission;
use crate::chat::ChatMessage;
use crate::config::AssistantConfig;
use crate::error::{AssistantError, Result};
use crate::memory::ConversationMemory;
use crate::opinion::{OpinionComposer, ResponseRng, ThreadRandom};
use crate::sentiment::{Sentiment, SentimentResolver};
use crate::speech::{SpeechOutput, VoiceSettings};
use crate::voice_command::VoiceCommand;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Channel buffer sizes.
const MESSAGE_CHANNEL_SIZE: usize = 64;
const TRANSCRIPT_CHANNEL_SIZE: usize = 16;
const CONTROL_CHANNEL_SIZE: usize = 8;
const EVENT_CHANNEL_SIZE: usize = 64;

/// Events published as the pipeline processes work.
#[derive(Debug, Clone)]
pub enum AssistantEvent {
    /// A message was dropped by the noise filter.
    MessageFiltered { id: String },
    /// Commentary was generated for an admitted message.
    OpinionReady {
        message_id: String,
        author: String,
        sentiment: Sentiment,
        opinion: String,
        /// Whether the message and opinion were read aloud.
        announced: bool,
    },
    /// A voice command was recognized and applied.
    CommandApplied { command: VoiceCommand },
    /// The assistant stopped; pending messages were discarded.
    Stopped { discarded: usize },
}

/// Point-in-time snapshot of the running assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssistantStatus {
    pub active: bool,
    pub queued_messages: usize,
}

/// Handle for pushing work into a running assistant and observing it.
#[derive(Debug, Clone)]
pub struct AssistantHandle {
    messages: mpsc::Sender<ChatMessage>,
    transcripts: mpsc::Sender<String>,
    control: mpsc::Sender<AssistantConfig>,
    events: broadcast::Sender<AssistantEvent>,
    config: watch::Receiver<AssistantConfig>,
    cancel: CancellationToken,
}

impl AssistantHandle {
    /// Submit an inbound chat message, in arrival order.
    ///
    /// Noise is dropped here, before queueing, and never reaches the
    /// composer.
    pub async fn submit(&self, message: ChatMessage) -> Result<()> {
        if admission::is_noise(&message) {
            debug!(id = %message.id, author = %message.author, "dropping noise message");
            let _ = self
                .events
                .send(AssistantEvent::MessageFiltered { id: message.id });
            return Ok(());
        }
        self.messages
            .send(message)
            .await
            .map_err(|_| AssistantError::Channel("assistant is not running".into()))
    }

    /// Submit a finalized speech-input transcript.
    pub async fn submit_transcript(&self, transcript: String) -> Result<()> {
        self.transcripts
            .send(transcript)
            .await
            .map_err(|_| AssistantError::Channel("assistant is not running".into()))
    }

    /// Replace the assistant configuration.
    pub async fn update_config(&self, config: AssistantConfig) -> Result<()> {
        self.control
            .send(config)
            .await
            .map_err(|_| AssistantError::Channel("assistant is not running".into()))
    }

    /// Snapshot of the current configuration.
    #[must_use]
    pub fn config(&self) -> AssistantConfig {
        self.config.borrow().clone()
    }

    /// Subscribe to pipeline events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AssistantEvent> {
        self.events.subscribe()
    }

    /// Stop the assistant. The in-flight message finishes; the backlog is
    /// discarded, not resumed.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Number of messages waiting in the queue.
    #[must_use]
    pub fn queue_depth(&self) -> usize {
        self.messages.max_capacity() - self.messages.capacity()
    }

    #[must_use]
    pub fn status(&self) -> AssistantStatus {
        AssistantStatus {
            active: self.is_active(),
            queued_messages: self.queue_depth(),
        }
    }
}

/// Owns the per-message pipeline: admission → sentiment → topics → opinion →
/// speech.
pub struct Assistant {
    config: AssistantConfig,
    resolver: SentimentResolver,
    speech: Arc<dyn SpeechOutput>,
    memory: ConversationMemory,
    composer: OpinionComposer,
    rng: Box<dyn ResponseRng>,
    events: broadcast::Sender<AssistantEvent>,
}

impl Assistant {
    /// Assistant with default memory, composer, and random source.
    #[must_use]
    pub fn new(
        config: AssistantConfig,
        resolver: SentimentResolver,
        speech: Arc<dyn SpeechOutput>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_SIZE);
        Self {
            config,
            resolver,
            speech,
            memory: ConversationMemory::new(),
            composer: OpinionComposer::new(),
            rng: Box::new(ThreadRandom),
            events,
        }
    }

    /// Replace the admission filter's random source.
    #[must_use]
    pub fn with_random_source(mut self, rng: Box<dyn ResponseRng>) -> Self {
        self.rng = rng;
        self
    }

    /// Replace the opinion composer (e.g. to inject a scripted random source).
    #[must_use]
    pub fn with_composer(mut self, composer: OpinionComposer) -> Self {
        self.composer = composer;
        self
    }

    /// Spawn the drain task and return the handle.
    #[must_use]
    pub fn spawn(self) -> AssistantHandle {
        let (message_tx, message_rx) = mpsc::channel(MESSAGE_CHANNEL_SIZE);
        let (transcript_tx, transcript_rx) = mpsc::channel(TRANSCRIPT_CHANNEL_SIZE);
        let (control_tx, control_rx) = mpsc::channel(CONTROL_CHANNEL_SIZE);
        let (config_tx, config_rx) = watch::channel(self.config.clone());
        let cancel = CancellationToken::new();

        let handle = AssistantHandle {
            messages: message_tx,
            transcripts: transcript_tx,
            control: control_tx,
            events: self.events.clone(),
            config: config_rx,
            cancel: cancel.clone(),
        };

        tokio::spawn(self.run(message_rx, transcript_rx, control_rx, config_tx, cancel));
        handle
    }

    async fn run(
        mut self,
        mut messages: mpsc::Receiver<ChatMessage>,
        mut transcripts: mpsc::Receiver<String>,
        mut control: mpsc::Receiver<AssistantConfig>,
        config_tx: watch::Sender<AssistantConfig>,
        cancel: CancellationToken,
    ) {
        info!("assistant active");
        if self.config.enable_tts {
            self.speak("Assistant is now online and ready to react to chat!")
                .await;
        }

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                Some(config) = control.recv() => {
                    self.config = config;
                    let _ = config_tx.send(self.config.clone());
                    debug!("configuration replaced");
                }
                Some(transcript) = transcripts.recv() => {
                    self.handle_transcript(&transcript).await;
                    let _ = config_tx.send(self.config.clone());
                }
                message = messages.recv() => {
                    let Some(message) = message else { break };
                    self.process_message(message).await;
                    // Pacing between messages; stopping cuts the wait short.
                    let pacing = Duration::from_millis(self.config.message_pacing_ms);
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => break,
                        () = tokio::time::sleep(pacing) => {}
                    }
                }
            }
        }

        let mut discarded = 0;
        while messages.try_recv().is_ok() {
            discarded += 1;
        }
        let _ = self
            .events
            .send(AssistantEvent::Stopped { discarded });
        info!(discarded, "assistant stopped");
    }

    async fn process_message(&mut self, message: ChatMessage) {
        let announced = admission::should_announce(&message, &self.config, self.rng.as_mut());
        if announced && self.config.enable_tts {
            self.speak(&format!("{} says: {}", message.author, message.text))
                .await;
        }

        if !self.config.generate_opinions {
            return;
        }

        let sentiment = self.resolver.resolve(&message.text).await;
        let opinion = self
            .composer
            .compose(&mut self.memory, &message, sentiment);
        info!(
            author = %message.author,
            sentiment = sentiment.as_str(),
            announced,
            "composed opinion"
        );

        if announced && self.config.enable_tts {
            self.speak(&opinion).await;
        }

        let _ = self.events.send(AssistantEvent::OpinionReady {
            message_id: message.id,
            author: message.author,
            sentiment,
            opinion,
            announced,
        });
    }

    async fn handle_transcript(&mut self, transcript: &str) {
        if !self.config.enable_stt {
            return;
        }
        let Some(command) = VoiceCommand::parse(transcript) else {
            debug!("transcript matched no command");
            return;
        };
        info!(?command, "voice command recognized");

        if command == VoiceCommand::StopSpeaking {
            self.speech.stop();
        }
        if let Some(acknowledgement) = command.apply(&mut self.config)
            && self.config.enable_tts
        {
            self.speak(acknowledgement).await;
        }
        let _ = self
            .events
            .send(AssistantEvent::CommandApplied { command });
    }

    /// Speak through the collaborator, absorbing failures so the queue never
    /// stalls on speech I/O.
    async fn speak(&self, text: &str) {
        if !self.speech.is_available() {
            return;
        }
        let settings = VoiceSettings {
            rate: self.config.voice_rate,
            pitch: self.config.voice_pitch,
            volume: self.config.voice_volume,
        };
        if let Err(e) = self.speech.speak(text, settings).await {
            warn!("speech output failed: {e}");
        }
    }
}
