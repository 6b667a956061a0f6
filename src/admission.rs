//! Noise filtering and announcement heuristics for inbound messages.
//!
//! Two independent decisions:
//!
//! - [`is_noise`]: whether a message is dropped before queueing. Noise never
//!   reaches the opinion composer.
//! - [`should_announce`]: whether an admitted message (and its commentary)
//!   is read aloud. A message can be admitted yet stay silent.

use crate::chat::ChatMessage;
use crate::config::AssistantConfig;
use crate::opinion::ResponseRng;

/// Known chat-bot account names, matched case-insensitively as substrings of
/// the author name.
const BOT_NAMES: &[&str] = &[
    "nightbot",
    "streamelements",
    "streamlabs",
    "moobot",
    "fossabot",
];

/// Keywords that make a message worth reading aloud.
const ATTENTION_KEYWORDS: &[&str] = &[
    "streamer",
    "hey",
    "question",
    "pregunta",
    "love",
    "great",
    "awesome",
    "game",
    "play",
    "music",
    "song",
    "opinion",
    "opinión",
    "think",
    "favorite",
    "favorito",
];

/// Probability of announcing a meaningful message with no other signal.
pub const ANNOUNCE_PROBABILITY: f64 = 0.3;
/// Minimum trimmed length for the random-announcement clause.
pub const MEANINGFUL_LENGTH: usize = 10;

/// Whether `message` is noise and should be dropped before queueing.
///
/// Depends only on the author and text, so repeated calls agree.
#[must_use]
pub fn is_noise(message: &ChatMessage) -> bool {
    let author = message.author.to_lowercase();
    if BOT_NAMES.iter().any(|bot| author.contains(bot)) {
        return true;
    }

    let trimmed = message.text.trim();
    if trimmed.chars().count() < 2 {
        return true;
    }

    is_emote_code(trimmed)
}

/// Whole-string `:word:` emote codes.
fn is_emote_code(text: &str) -> bool {
    let Some(inner) = text.strip_prefix(':').and_then(|t| t.strip_suffix(':')) else {
        return false;
    };
    !inner.is_empty() && inner.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Whether an admitted message should be read aloud.
#[must_use]
pub fn should_announce(
    message: &ChatMessage,
    config: &AssistantConfig,
    rng: &mut dyn ResponseRng,
) -> bool {
    if config.read_all_messages {
        return true;
    }

    let lower = message.text.to_lowercase();
    let has_attention_word = ATTENTION_KEYWORDS.iter().any(|kw| lower.contains(kw));
    let is_question = message.text.contains('?');
    let is_meaningful = message.text.trim().chars().count() > MEANINGFUL_LENGTH;

    has_attention_word
        || is_question
        || (is_meaningful && rng.chance(ANNOUNCE_PROBABILITY))
        || message.badges.any_elevated()
}
