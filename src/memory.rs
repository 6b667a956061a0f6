//! Bounded conversation memory for repetition detection and response dedup.
//!
//! Three bounded collections, all evicted strictly oldest-first:
//!
//! - history of (message, response, timestamp) entries, for similarity lookups;
//! - the set of previously emitted response strings, for exact-string dedup;
//! - the set of recently seen topics (informational, kept for future use).
//!
//! All state is in-memory and owned exclusively by this type; the pipeline
//! mutates it only from the single active processing step, so it needs no
//! interior locking.

use crate::topics::{Topic, TopicSet};
use std::collections::BTreeSet;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Default capacity for the conversation history.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;
/// Default capacity for the used-response set.
pub const DEFAULT_RESPONSE_CAPACITY: usize = 100;
/// Default capacity for the recent-topics set.
pub const DEFAULT_TOPIC_CAPACITY: usize = 20;

/// One recorded (message, response) exchange.
#[derive(Debug, Clone)]
pub struct ConversationEntry {
    /// Message text as received.
    pub message: String,
    /// Generated response text.
    pub response: String,
    /// When the exchange was recorded.
    pub recorded_at: Instant,
}

/// Bounded history state consulted by the opinion composer.
#[derive(Debug)]
pub struct ConversationMemory {
    history: VecDeque<ConversationEntry>,
    used_responses: VecDeque<String>,
    recent_topics: VecDeque<Topic>,
    history_capacity: usize,
    response_capacity: usize,
    topic_capacity: usize,
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationMemory {
    /// Memory with the default capacity bounds (50 / 100 / 20).
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacities(
            DEFAULT_HISTORY_CAPACITY,
            DEFAULT_RESPONSE_CAPACITY,
            DEFAULT_TOPIC_CAPACITY,
        )
    }

    /// Memory with explicit capacity bounds.
    #[must_use]
    pub fn with_capacities(history: usize, responses: usize, topics: usize) -> Self {
        Self {
            history: VecDeque::with_capacity(history.saturating_add(1)),
            used_responses: VecDeque::with_capacity(responses.saturating_add(1)),
            recent_topics: VecDeque::with_capacity(topics.saturating_add(1)),
            history_capacity: history,
            response_capacity: responses,
            topic_capacity: topics,
        }
    }

    /// Record a completed exchange, trimming every collection to capacity.
    pub fn record(&mut self, message: &str, response: &str, topics: &TopicSet) {
        self.history.push_back(ConversationEntry {
            message: message.to_owned(),
            response: response.to_owned(),
            recorded_at: Instant::now(),
        });
        while self.history.len() > self.history_capacity {
            self.history.pop_front();
        }

        if !self.was_used(response) {
            self.used_responses.push_back(response.to_owned());
        }
        while self.used_responses.len() > self.response_capacity {
            self.used_responses.pop_front();
        }

        for &topic in topics {
            if !self.recent_topics.contains(&topic) {
                self.recent_topics.push_back(topic);
            }
        }
        while self.recent_topics.len() > self.topic_capacity {
            self.recent_topics.pop_front();
        }
    }

    /// Entries recorded within `window` of now whose similarity to `text`
    /// exceeds `threshold`. Empty history yields an empty list, never an error.
    #[must_use]
    pub fn similar_entries(
        &self,
        text: &str,
        window: Duration,
        threshold: f64,
    ) -> Vec<ConversationEntry> {
        let now = Instant::now();
        self.history
            .iter()
            .filter(|entry| {
                now.duration_since(entry.recorded_at) <= window
                    && similarity(text, &entry.message) > threshold
            })
            .cloned()
            .collect()
    }

    /// Exact-string membership test against the used-response set.
    #[must_use]
    pub fn was_used(&self, response: &str) -> bool {
        self.used_responses.iter().any(|r| r == response)
    }

    /// Number of retained history entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Oldest retained entry, if any.
    #[must_use]
    pub fn oldest(&self) -> Option<&ConversationEntry> {
        self.history.front()
    }

    /// Recently seen topics, oldest first.
    #[must_use]
    pub fn recent_topics(&self) -> impl Iterator<Item = Topic> + '_ {
        self.recent_topics.iter().copied()
    }
}

/// Word-overlap similarity between two texts in `0.0..=1.0`.
///
/// Both texts are lowercased, whitespace-split, and reduced to their distinct
/// words longer than two characters; the score is the shared-word count over
/// the larger of the two word counts. Texts with no qualifying words score
/// `0.0` against everything, including themselves.
#[must_use]
pub fn similarity(a: &str, b: &str) -> f64 {
    let words_a = significant_words(a);
    let words_b = significant_words(b);
    if words_a.is_empty() || words_b.is_empty() {
        return 0.0;
    }
    let shared = words_a.intersection(&words_b).count();
    shared as f64 / words_a.len().max(words_b.len()) as f64
}

fn significant_words(text: &str) -> BTreeSet<String> {
    text.split_whitespace()
        .map(str::to_lowercase)
        .filter(|w| w.chars().count() > 2)
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::topics::extract;

    #[test]
    fn history_keeps_the_50_most_recent() {
        let mut memory = ConversationMemory::new();
        for i in 0..60 {
            memory.record(&format!("mensaje {i}"), &format!("respuesta {i}"), &TopicSet::new());
        }
        assert_eq!(memory.len(), 50);
        assert_eq!(memory.oldest().unwrap().message, "mensaje 10");
    }

    #[test]
    fn used_responses_evict_fifo() {
        let mut memory = ConversationMemory::new();
        for i in 0..101 {
            memory.record("m", &format!("respuesta {i}"), &TopicSet::new());
        }
        assert!(!memory.was_used("respuesta 0"));
        assert!(memory.was_used("respuesta 1"));
        assert!(memory.was_used("respuesta 100"));
    }

    #[test]
    fn duplicate_responses_are_not_double_counted() {
        let mut memory = ConversationMemory::with_capacities(10, 3, 5);
        memory.record("a", "misma", &TopicSet::new());
        memory.record("b", "misma", &TopicSet::new());
        memory.record("c", "otra", &TopicSet::new());
        memory.record("d", "tercera", &TopicSet::new());
        // "misma" was inserted once, so nothing has been evicted yet.
        assert!(memory.was_used("misma"));
        assert!(memory.was_used("otra"));
        assert!(memory.was_used("tercera"));
    }

    #[test]
    fn recent_topics_are_bounded() {
        let mut memory = ConversationMemory::with_capacities(10, 10, 2);
        memory.record("a", "r1", &extract("hola"));
        memory.record("b", "r2", &extract("jugar"));
        memory.record("c", "r3", &extract("música"));
        let topics: Vec<Topic> = memory.recent_topics().collect();
        assert_eq!(topics, vec![Topic::Gaming, Topic::Music]);
    }

    #[test]
    fn similarity_of_identical_text_is_one() {
        assert_eq!(similarity("este juego es genial", "este juego es genial"), 1.0);
        assert_eq!(similarity("genial", "genial"), 1.0);
    }

    #[test]
    fn similarity_of_disjoint_text_is_zero() {
        assert_eq!(similarity("este juego es genial", "mañana llueve bastante"), 0.0);
    }

    #[test]
    fn similarity_ignores_short_words_and_case() {
        // Shared: este, juego, genial; "esta" only on one side → 3 / 4.
        let score = similarity("este juego es genial", "ESTE juego esta GENIAL");
        assert!((score - 0.75).abs() < 1e-9);
    }

    #[test]
    fn similarity_with_no_qualifying_words_is_zero() {
        assert_eq!(similarity("a b c", "a b c"), 0.0);
    }

    #[test]
    fn similar_entries_empty_history() {
        let memory = ConversationMemory::new();
        assert!(memory
            .similar_entries("hola", Duration::from_secs(300), 0.5)
            .is_empty());
    }

    #[test]
    fn similar_entries_respects_threshold_and_window() {
        let mut memory = ConversationMemory::new();
        memory.record("este juego es genial", "ok", &TopicSet::new());

        let hits = memory.similar_entries("este juego esta genial", Duration::from_secs(300), 0.7);
        assert_eq!(hits.len(), 1);

        // Below threshold.
        assert!(memory
            .similar_entries("este juego esta genial", Duration::from_secs(300), 0.8)
            .is_empty());

        // Outside the window.
        std::thread::sleep(Duration::from_millis(20));
        assert!(memory
            .similar_entries("este juego esta genial", Duration::from_millis(1), 0.7)
            .is_empty());
    }
}
