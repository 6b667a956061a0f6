//! Sentiment resolution with remote-first, lexicon-fallback semantics.
//!
//! [`SentimentResolver::resolve`] never errors past its boundary: when the
//! remote classifier is unreachable, returns a non-success status, or sends a
//! malformed body, the resolver silently degrades to [`classify_local`], a
//! substring scan over two fixed word/emoji lists. The remote label is trusted
//! as-is after uppercasing; its confidence score is a concern of the HTTP
//! endpoint, not of this resolver.
//!
//! Wire format (POST, JSON):
//!
//! ```text
//! request:  {"text": "..."}
//! response: {"sentiment": "POSITIVE"|"NEGATIVE"|"NEUTRAL", "confidence": 0.9, "fallback": false}
//! ```

use crate::error::{AssistantError, Result};
use serde::Deserialize;
use tracing::{debug, warn};

/// Coarse sentiment of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Map a classifier label to a sentiment. Unrecognized labels are Neutral.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.to_uppercase().as_str() {
            "POSITIVE" => Self::Positive,
            "NEGATIVE" => Self::Negative,
            _ => Self::Neutral,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "POSITIVE",
            Self::Negative => "NEGATIVE",
            Self::Neutral => "NEUTRAL",
        }
    }
}

// ── Lexicon tables ──────────────────────────────────────────────────────

/// Positive indicators (words and emoji, matched by substring containment).
const POSITIVE_WORDS: &[&str] = &[
    "genial",
    "increíble",
    "fantástico",
    "excelente",
    "bueno",
    "bien",
    "perfecto",
    "amor",
    "me gusta",
    "hermoso",
    "divertido",
    "feliz",
    "alegre",
    "cool",
    "jajaja",
    "jeje",
    "lol",
    "xd",
    "😂",
    "😍",
    "❤️",
    "👍",
    "🔥",
];

/// Negative indicators.
const NEGATIVE_WORDS: &[&str] = &[
    "malo",
    "terrible",
    "horrible",
    "odio",
    "aburrido",
    "feo",
    "estúpido",
    "idiota",
    "basura",
    "mierda",
    "pendejo",
    "molesto",
    "triste",
    "enojado",
    "wtf",
    "shit",
    "😡",
    "👎",
    "💩",
    "😭",
];

/// Local lexicon scoring, used when the remote classifier is unavailable.
///
/// Counts positive and negative hits by case-insensitive substring
/// containment; the larger count wins, ties are Neutral.
#[must_use]
pub fn classify_local(text: &str) -> Sentiment {
    let lower = text.to_lowercase();
    let positive = POSITIVE_WORDS.iter().filter(|w| lower.contains(*w)).count();
    let negative = NEGATIVE_WORDS.iter().filter(|w| lower.contains(*w)).count();

    if positive > negative {
        Sentiment::Positive
    } else if negative > positive {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    sentiment: String,
}

/// Remote-first sentiment resolver.
#[derive(Debug, Clone)]
pub struct SentimentResolver {
    client: reqwest::Client,
    endpoint: Option<String>,
}

impl SentimentResolver {
    /// Create a resolver. With `endpoint = None` only the local lexicon runs.
    #[must_use]
    pub fn new(endpoint: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }

    /// Create a resolver that never attempts a remote call.
    #[must_use]
    pub fn local_only() -> Self {
        Self::new(None)
    }

    /// Resolve the sentiment of `text`. Infallible: any remote failure falls
    /// back to the local lexicon.
    pub async fn resolve(&self, text: &str) -> Sentiment {
        if let Some(endpoint) = &self.endpoint {
            match self.classify_remote(endpoint, text).await {
                Ok(sentiment) => {
                    debug!(label = sentiment.as_str(), "remote sentiment");
                    return sentiment;
                }
                Err(e) => {
                    warn!("remote sentiment classification failed, using lexicon fallback: {e}");
                }
            }
        }
        classify_local(text)
    }

    async fn classify_remote(&self, endpoint: &str, text: &str) -> Result<Sentiment> {
        let response = self
            .client
            .post(endpoint)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await
            .map_err(|e| AssistantError::Sentiment(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssistantError::Sentiment(format!(
                "classifier returned {status}"
            )));
        }

        let body: ClassifyResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::Sentiment(format!("malformed classifier body: {e}")))?;

        Ok(Sentiment::from_label(&body.sentiment))
    }
}
