//! Opinion composition: picks a commentary line for an admitted message.
//!
//! Candidate pools are layered in strict priority order:
//!
//! 1. **Repeat pool**: the message is similar to a recent exchange
//!    (word-overlap > [`REPEAT_THRESHOLD`] within [`REPEAT_WINDOW`]).
//! 2. **Topic pools**: union of the template sets for every extracted topic.
//!    Skill, Success and Failure share one pool.
//! 3. **Sentiment pool**: when no topic matched.
//!
//! The chosen pool is filtered against the used-response history; if the
//! filter empties it, the unfiltered pool is used so selection never blocks on
//! exhaustion. Two independent stylistic draws may wrap the picked line with a
//! discourse marker and/or a hedging suffix. Anything going wrong internally
//! degrades to the global fallback pool, never an error.
//!
//! Randomness comes from an injectable [`ResponseRng`] so tests can script
//! exact sequences.

use crate::chat::ChatMessage;
use crate::memory::ConversationMemory;
use crate::sentiment::Sentiment;
use crate::topics::{self, Topic, TopicSet};
use rand::Rng;
use std::time::Duration;
use tracing::{debug, warn};

/// Look-back window for repetition detection.
pub const REPEAT_WINDOW: Duration = Duration::from_secs(300);
/// Word-overlap similarity threshold for repetition detection.
pub const REPEAT_THRESHOLD: f64 = 0.7;
/// Probability of prepending a discourse marker.
pub const MARKER_PROBABILITY: f64 = 0.3;
/// Probability of appending a hedging suffix.
pub const HEDGE_PROBABILITY: f64 = 0.2;

// ── Template pools ──────────────────────────────────────────────────────

/// Responses acknowledging a repeated topic.
pub const REPEAT_RESPONSES: &[&str] = &[
    "Esto me suena... ¿no lo hemos hablado ya?",
    "Déjà vu en el chat. El tema vuelve a la carga.",
    "Otra vez con lo mismo. La insistencia es una virtud, dicen.",
    "Este tema ya pasó por aquí hace un momento.",
    "El chat en bucle. Me encanta la consistencia.",
    "¿Otra vez? Bueno, la repetición es la madre del aprendizaje.",
    "Lo mismo de antes, pero con otras palabras. Respeto.",
    "Veo que el tema tiene fans. Volvemos a ello.",
];

pub const GAMING_RESPONSES: &[&str] = &[
    "¡Ah sí! Los juegos, esa actividad tan productiva. Sigamos gastando vida en pixels.",
    "Otro experto en videojuegos. El chat está lleno de profesionales.",
    "Claro, porque hablar de juegos nunca se había hecho en un stream.",
    "Gaming: donde las horas desaparecen y las excusas florecen.",
    "Me encanta cuando el chat descubre que esto va de jugar.",
];

pub const STREAMING_RESPONSES: &[&str] = &[
    "Sí, es un stream. Qué observador. Sherlock Holmes estaría orgulloso.",
    "El directo va perfecto, gracias por el análisis técnico.",
    "Otro comentario sobre el stream. La meta-conversación está de moda.",
    "Sí, seguimos en directo. La magia de internet no se detiene.",
    "Observación sobre el stream registrada. Se la pasaré al departamento correspondiente.",
];

pub const MUSIC_RESPONSES: &[&str] = &[
    "Música... porque hablar es muy mainstream, ¿no?",
    "Todos somos críticos musicales hoy, por lo visto.",
    "La banda sonora perfecta para este nivel de conversación.",
    "Petición musical detectada. El DJ está... ocupado.",
    "Ah, la música. El único tema donde todos tienen razón y nadie la tiene.",
];

pub const CHAT_RESPONSES: &[&str] = &[
    "El chat hablando del chat. Qué nivel de introspección.",
    "Sí, esto es un chat. La observación del siglo.",
    "El chat está inspirado hoy... es una forma de decirlo.",
    "Mensaje sobre mensajes. Muy meta todo.",
    "La conversación alcanza nuevas profundidades... o no.",
];

pub const ENGAGEMENT_RESPONSES: &[&str] = &[
    "¡Ah! El clásico 'dale like y suscríbete'. Qué original y nada desesperado.",
    "El algoritmo agradece tu sacrificio.",
    "Like, follow, suscríbete... el mantra de nuestra era.",
    "Nada dice 'contenido de calidad' como pedir likes.",
    "La autopromoción: ese arte tan sutil.",
];

/// Shared pool for Skill, Success and Failure.
pub const SKILL_RESPONSES: &[&str] = &[
    "Ah, la crítica constructiva. Tan sutil como un ladrillo en la cara.",
    "Todos somos profesionales del gaming desde el sofá.",
    "Qué derroche de talento estamos presenciando. Tomen nota.",
    "Victoria o derrota, el chat siempre sabe jugarla mejor.",
    "El nivel de juego solo lo supera el nivel de los comentarios.",
];

pub const GREETING_RESPONSES: &[&str] = &[
    "¡Miren! Alguien que sabe saludar. Todo un fenómeno social.",
    "Hola, hola. Bienvenido al espectáculo.",
    "Un saludo. La cortesía no ha muerto, señores.",
    "Saludos recibidos. Procedo a fingir entusiasmo.",
    "Bienvenido. Llegas justo a tiempo para... esto.",
];

pub const QUESTION_RESPONSES: &[&str] = &[
    "Ooh, una pregunta. Qué conceptual. Déjame consultar mi bola de cristal...",
    "Gran pregunta. La respuesta, como siempre, es 'depende'.",
    "Una pregunta al aire. El aire rara vez responde, aviso.",
    "Preguntar es gratis. Responder bien, ya es otro tema.",
    "La curiosidad del chat no conoce límites... ni vergüenza.",
];

pub const HUMOR_RESPONSES: &[&str] = &[
    "¡Qué gracioso! Me estoy riendo tanto que casi se me mueve un músculo de la cara.",
    "Jaja, sí. Comedia de primer nivel, señores.",
    "El humor del chat: patrimonio de la humanidad.",
    "Me reiría, pero mi presupuesto de risas está agotado.",
    "Guarden ese chiste, que es de colección.",
];

pub const POSITIVE_RESPONSES: &[&str] = &[
    "¡Qué optimista! Me gusta esa energía... aunque sea un poco ingenua.",
    "¡Vaya! Alguien se tomó sus vitaminas de positividad hoy.",
    "Tanto entusiasmo me da miedo... pero está bien, supongo.",
    "¡Qué hermoso! Casi se me cae una lágrima... casi.",
    "Este comentario brilla más que mi futuro, y eso ya es decir algo.",
    "Positividad detectada. Procedan con precaución.",
    "Qué alegría tan contagiosa. Por suerte estoy vacunada.",
    "El entusiasmo del chat ilumina más que el setup de luces.",
];

pub const NEGATIVE_RESPONSES: &[&str] = &[
    "Ah, el pesimismo clásico. Nunca pasa de moda, ¿verdad?",
    "Veo que alguien despertó con el pie izquierdo... y el derecho también.",
    "Qué originalidad quejarse. Nadie había pensado en eso antes...",
    "¡Perfecto! Justo lo que necesitaba para alegrar mi día.",
    "Gracias por ese rayito de sol. Realmente iluminas el chat.",
    "Tu negatividad es tan refrescante como un cubito de hielo en el desierto.",
    "El drama llegó al chat. Palomitas, por favor.",
    "Otro día, otra queja. La tradición continúa.",
];

pub const NEUTRAL_RESPONSES: &[&str] = &[
    "Interesante... si es que podemos llamar 'interesante' a esto.",
    "Vaya comentario más... existente.",
    "Gracias por ese aporte tan... único.",
    "El chat siempre sorprende con su... creatividad.",
    "Qué profundo. Casi filosófico, diría yo.",
    "Otro comentario para los anales de la historia... o no.",
    "Un comentario neutro. Suiza estaría orgullosa.",
    "Ni bueno ni malo. Simplemente... ahí.",
];

/// Last-resort pool when composition fails internally.
pub const FALLBACK_RESPONSES: &[&str] = &[
    "Qué comentario tan... especial.",
    "El chat está que arde hoy... de aburrimiento.",
    "Gracias por ese aporte tan valioso para la humanidad.",
    "¡Increíble! Otro comentario para enmarcar.",
    "La sabiduría del chat nunca deja de sorprenderme... o no.",
    "¡Qué suerte tengo de tener espectadores tan... únicos!",
    "No tengo opinión sobre eso... por ahora.",
    "Interesante estrategia de comunicación. Tomo nota.",
    "El chat ha hablado. La historia lo juzgará.",
    "Palabras. Definitivamente eso fueron palabras.",
];

/// Discourse markers occasionally prepended to a response.
pub const DISCOURSE_MARKERS: &[&str] = &["A ver,", "Mira,", "Ojo,", "Bueno,", "Sinceramente,"];

/// Hedging suffixes occasionally appended to a response.
pub const HEDGES: &[&str] = &[
    "... o eso dicen.",
    "... supongo.",
    "... pero qué sé yo.",
    "... según mi vasta experiencia.",
    "... aunque podría equivocarme, ja.",
];

// ── Random source ───────────────────────────────────────────────────────

/// Injectable random source for selection and stylistic draws.
pub trait ResponseRng: Send + Sync {
    /// Uniform index in `0..len`. Callers guarantee `len > 0`.
    fn pick(&mut self, len: usize) -> usize;
    /// Independent draw: true with probability `p`.
    fn chance(&mut self, p: f64) -> bool;
}

/// Default source backed by the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl ResponseRng for ThreadRandom {
    fn pick(&mut self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }

    fn chance(&mut self, p: f64) -> bool {
        rand::thread_rng().gen_range(0.0..1.0) < p
    }
}

// ── Composer ────────────────────────────────────────────────────────────

/// Template pool for a single topic.
#[must_use]
pub fn pool_for_topic(topic: Topic) -> &'static [&'static str] {
    match topic {
        Topic::Gaming => GAMING_RESPONSES,
        Topic::Streaming => STREAMING_RESPONSES,
        Topic::Music => MUSIC_RESPONSES,
        Topic::Chat => CHAT_RESPONSES,
        Topic::Engagement => ENGAGEMENT_RESPONSES,
        Topic::Skill | Topic::Success | Topic::Failure => SKILL_RESPONSES,
        Topic::Greeting => GREETING_RESPONSES,
        Topic::Question => QUESTION_RESPONSES,
        Topic::Humor => HUMOR_RESPONSES,
    }
}

fn sentiment_pool(sentiment: Sentiment) -> &'static [&'static str] {
    match sentiment {
        Sentiment::Positive => POSITIVE_RESPONSES,
        Sentiment::Negative => NEGATIVE_RESPONSES,
        Sentiment::Neutral => NEUTRAL_RESPONSES,
    }
}

/// Stateful response selector. Owns the random source; the conversation
/// memory is owned by the caller and passed per call.
pub struct OpinionComposer {
    rng: Box<dyn ResponseRng>,
}

impl Default for OpinionComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl OpinionComposer {
    /// Composer with the default thread-local random source.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(Box::new(ThreadRandom))
    }

    /// Composer with an injected random source.
    #[must_use]
    pub fn with_rng(rng: Box<dyn ResponseRng>) -> Self {
        Self { rng }
    }

    /// Compose a commentary line for `message` and record the exchange.
    ///
    /// Infallible: internal selection failure degrades to the global fallback
    /// pool (without recording).
    pub fn compose(
        &mut self,
        memory: &mut ConversationMemory,
        message: &ChatMessage,
        sentiment: Sentiment,
    ) -> String {
        let topics = topics::extract(&message.text);
        match self.compose_inner(memory, &message.text, &topics, sentiment) {
            Some(response) => {
                memory.record(&message.text, &response, &topics);
                response
            }
            None => {
                warn!("candidate selection produced nothing, using global fallback");
                let idx = self.rng.pick(FALLBACK_RESPONSES.len());
                FALLBACK_RESPONSES[idx].to_owned()
            }
        }
    }

    fn compose_inner(
        &mut self,
        memory: &ConversationMemory,
        text: &str,
        topics: &TopicSet,
        sentiment: Sentiment,
    ) -> Option<String> {
        let pool: Vec<&str> = if !memory
            .similar_entries(text, REPEAT_WINDOW, REPEAT_THRESHOLD)
            .is_empty()
        {
            debug!("repeated topic detected");
            REPEAT_RESPONSES.to_vec()
        } else if !topics.is_empty() {
            // Skill, Success and Failure share a pool; a shared pool enters
            // the union once so its templates keep uniform weight.
            let mut pools: Vec<&'static [&'static str]> = Vec::new();
            for &topic in topics {
                let pool = pool_for_topic(topic);
                if !pools.contains(&pool) {
                    pools.push(pool);
                }
            }
            pools.into_iter().flatten().copied().collect()
        } else {
            sentiment_pool(sentiment).to_vec()
        };
        if pool.is_empty() {
            return None;
        }

        // Drop candidates we already said; on exhaustion keep the full pool.
        let fresh: Vec<&str> = pool
            .iter()
            .copied()
            .filter(|candidate| !memory.was_used(candidate))
            .collect();
        let pool = if fresh.is_empty() { pool } else { fresh };

        let mut response = pool[self.rng.pick(pool.len())].to_owned();

        if self.rng.chance(MARKER_PROBABILITY) {
            let marker = DISCOURSE_MARKERS[self.rng.pick(DISCOURSE_MARKERS.len())];
            response = format!("{marker} {}", response.to_lowercase());
        }
        if self.rng.chance(HEDGE_PROBABILITY) {
            response.push_str(HEDGES[self.rng.pick(HEDGES.len())]);
        }

        Some(response)
    }
}
