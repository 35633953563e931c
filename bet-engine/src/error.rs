//! Error types for the bet engine.

use thiserror::Error;

/// Result type alias using the engine [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Odds that cannot be priced (zero American odds, decimal odds <= 1.0)
    #[error("Invalid odds: {0}")]
    InvalidOdds(String),

    /// Parlay that cannot be priced (too few legs, a leg without odds)
    #[error("Invalid parlay: {0}")]
    InvalidParlay(String),

    /// Model output unusable as a whole batch
    #[error("{0}")]
    MalformedOutput(String),

    /// Bet record failed schema validation
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

/// Human-readable reason a bet record failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn missing(field: &str) -> Self {
        Self(format!("Missing required field: {}", field))
    }

    /// Prefix the message with the 1-based leg position.
    pub fn in_leg(self, position: usize) -> Self {
        Self(format!("Leg {}: {}", position, self.0))
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}
