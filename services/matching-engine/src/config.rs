//! Engine configuration

use serde::Deserialize;
use types::ids::Symbol;

/// How far a single placement is allowed to match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchPolicy {
    /// Only the best bid/ask pair that crosses when matching starts is
    /// worked. A crossing exposed by clearing a level waits for the next
    /// placement.
    #[default]
    TopOfBook,
    /// Re-check the top of book after each exhausted level until the book
    /// no longer crosses.
    Sweep,
}

/// Configuration for a single-instrument engine
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Instrument symbol, carried as metadata only
    pub symbol: Symbol,
    #[serde(default)]
    pub match_policy: MatchPolicy,
    /// First trade sequence number handed out
    #[serde(default = "default_starting_sequence")]
    pub starting_sequence: u64,
}

fn default_starting_sequence() -> u64 {
    1
}

impl EngineConfig {
    pub fn new(symbol: impl Into<Symbol>) -> Self {
        Self {
            symbol: symbol.into(),
            match_policy: MatchPolicy::default(),
            starting_sequence: default_starting_sequence(),
        }
    }

    pub fn with_match_policy(mut self, match_policy: MatchPolicy) -> Self {
        self.match_policy = match_policy;
        self
    }

    pub fn with_starting_sequence(mut self, starting_sequence: u64) -> Self {
        self.starting_sequence = starting_sequence;
        self
    }

    /// Parse a JSON configuration document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
