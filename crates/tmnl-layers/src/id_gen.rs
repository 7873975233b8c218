//! Layer id generation.

use crate::types::LayerId;
use rand::Rng;
use std::fmt;
use std::sync::Arc;
use tmnl_common_config::IdStrategy;
use tracing::debug;

/// Length of a random token id.
pub const TOKEN_LENGTH: usize = 21;

const TOKEN_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Caller-supplied id function.
pub type CustomIdFn = Arc<dyn Fn() -> String + Send + Sync>;

/// Produces layer identifiers.
///
/// Ids are unique with overwhelming probability for the random strategies;
/// a custom function is trusted as-is.
#[derive(Clone)]
pub struct IdGenerator {
    strategy: IdStrategy,
    custom: Option<CustomIdFn>,
}

impl IdGenerator {
    /// Generator for `strategy`.
    ///
    /// `Custom` without a function falls back to random tokens.
    pub fn new(strategy: IdStrategy) -> Self {
        let strategy = match strategy {
            IdStrategy::Custom => {
                debug!("custom id strategy configured without a generator, using random tokens");
                IdStrategy::RandomToken
            }
            IdStrategy::Unrecognized => IdStrategy::RandomToken,
            other => other,
        };
        Self {
            strategy,
            custom: None,
        }
    }

    /// Random-token generator.
    pub fn random_token() -> Self {
        Self::new(IdStrategy::RandomToken)
    }

    /// UUID v4 generator.
    pub fn uuid() -> Self {
        Self::new(IdStrategy::Uuid)
    }

    /// Generator that delegates to `f`.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Self {
            strategy: IdStrategy::Custom,
            custom: Some(Arc::new(f)),
        }
    }

    /// Effective strategy.
    pub fn strategy(&self) -> IdStrategy {
        self.strategy
    }

    /// Produce a new id.
    pub fn generate(&self) -> LayerId {
        let id = match (&self.strategy, &self.custom) {
            (IdStrategy::Custom, Some(f)) => f(),
            (IdStrategy::Uuid, _) => uuid::Uuid::new_v4().to_string(),
            _ => random_token(),
        };
        LayerId::new(id)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::random_token()
    }
}

impl fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdGenerator")
            .field("strategy", &self.strategy)
            .field("custom", &self.custom.is_some())
            .finish()
    }
}

fn random_token() -> String {
    let mut rng = rand::thread_rng();
    (0..TOKEN_LENGTH)
        .map(|_| TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())] as char)
        .collect()
}
