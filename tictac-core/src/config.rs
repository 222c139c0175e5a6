//! Player tiers and match configuration

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ai::MoveSelector;
use crate::board::Mark;
use crate::error::ConfigError;

/// Move selection strategy, keyed by the operator's kind token
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    /// `user`: moves typed by a human
    #[serde(rename = "user")]
    HumanPrompt,
    /// `easy`: uniform random legal move
    #[serde(rename = "easy")]
    Random,
    /// `medium`: win, else block, else random
    #[serde(rename = "medium")]
    Heuristic,
    /// `hard`: full minimax
    #[serde(rename = "hard")]
    ExhaustiveSearch,
}

impl Tier {
    pub const ALL: [Tier; 4] = [
        Tier::HumanPrompt,
        Tier::Random,
        Tier::Heuristic,
        Tier::ExhaustiveSearch,
    ];

    /// Command-surface token for this tier
    pub fn token(self) -> &'static str {
        match self {
            Tier::HumanPrompt => "user",
            Tier::Random => "easy",
            Tier::Heuristic => "medium",
            Tier::ExhaustiveSearch => "hard",
        }
    }

    pub fn is_human(self) -> bool {
        self == Tier::HumanPrompt
    }
}

impl FromStr for Tier {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tier::ALL
            .into_iter()
            .find(|t| t.token() == s)
            .ok_or_else(|| ConfigError::UnknownPlayerKind(s.to_string()))
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Configuration for one game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Tier playing X (moves first)
    pub x: Tier,
    /// Tier playing O
    pub o: Tier,
    /// Random seed for reproducibility (None = entropy)
    pub seed: Option<u64>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            x: Tier::HumanPrompt,
            o: Tier::ExhaustiveSearch,
            seed: None,
        }
    }
}

impl MatchConfig {
    pub fn new(x: Tier, o: Tier) -> Self {
        Self {
            x,
            o,
            ..Default::default()
        }
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn tier_for(&self, mark: Mark) -> Tier {
        match mark {
            Mark::X => self.x,
            Mark::O => self.o,
        }
    }

    /// Reject human tiers where no input is available
    pub fn require_automated(&self) -> Result<(), ConfigError> {
        for mark in [Mark::X, Mark::O] {
            if self.tier_for(mark).is_human() {
                return Err(ConfigError::HumanNotAllowed(mark));
            }
        }
        Ok(())
    }

    /// Build both selectors; O's seed is derived from X's
    pub fn selectors(&self) -> (MoveSelector, MoveSelector) {
        match self.seed {
            Some(seed) => (
                MoveSelector::with_seed(self.x, Mark::X, seed),
                MoveSelector::with_seed(self.o, Mark::O, seed.wrapping_add(1)),
            ),
            None => (
                MoveSelector::new(self.x, Mark::X),
                MoveSelector::new(self.o, Mark::O),
            ),
        }
    }
}
