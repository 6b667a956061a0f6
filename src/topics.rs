//! Coarse topic extraction from chat text.
//!
//! Maps raw message text to a set of tags from a fixed closed vocabulary via
//! case-insensitive whole-word keyword matching. An empty set is a valid,
//! common outcome. Extraction is pure: the same input always yields the same
//! set.

use std::collections::BTreeSet;

/// Closed topic vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Topic {
    Gaming,
    Streaming,
    Music,
    Chat,
    Engagement,
    Skill,
    Greeting,
    Question,
    Humor,
    Success,
    Failure,
}

/// Ordered topic set; iteration order is stable so candidate-pool unions are
/// deterministic.
pub type TopicSet = BTreeSet<Topic>;

/// (topic, keyword group). Keywords match whole words only.
const TOPIC_KEYWORDS: &[(Topic, &[&str])] = &[
    (
        Topic::Gaming,
        &["juego", "juegos", "jugar", "jugando", "game", "gaming", "partida", "play"],
    ),
    (
        Topic::Streaming,
        &["stream", "directo", "streamer", "live", "transmisión"],
    ),
    (
        Topic::Music,
        &["música", "musica", "canción", "cancion", "music", "song", "playlist"],
    ),
    (Topic::Chat, &["chat", "mensaje", "mensajes", "spam"]),
    (
        Topic::Engagement,
        &["like", "follow", "sub", "suscríbete", "suscribete", "suscriptor"],
    ),
    (Topic::Skill, &["skill", "pro", "habilidad", "crack"]),
    (
        Topic::Greeting,
        &["hola", "hello", "buenas", "hey", "saludos", "hi"],
    ),
    (Topic::Question, &["pregunta", "question", "duda"]),
    (
        Topic::Humor,
        &["lol", "jaja", "jajaja", "jajajaja", "jeje", "xd", "haha", "gracioso", "risa"],
    ),
    (
        Topic::Success,
        &["win", "ganar", "ganamos", "ganaste", "victoria", "gg", "logro"],
    ),
    (
        Topic::Failure,
        &["fail", "perder", "perdimos", "perdiste", "derrota", "noob", "rip"],
    ),
];

/// Extract the topic set for `text`.
///
/// A literal `?` anywhere in the text also counts as [`Topic::Question`].
#[must_use]
pub fn extract(text: &str) -> TopicSet {
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    let mut topics = TopicSet::new();
    for &(topic, keywords) in TOPIC_KEYWORDS {
        if keywords.iter().any(|kw| words.contains(kw)) {
            topics.insert(topic);
        }
    }
    if lower.contains('?') {
        topics.insert(Topic::Question);
    }
    topics
}
