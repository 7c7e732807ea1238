//! Table configuration models.

use serde::{Deserialize, Serialize};

use crate::game::{
    constants::{
        BLACKJACK, DECK_SIZE, DEFAULT_DEALER_STANDS_ON, DEFAULT_MIN_PLAYERS, DEFAULT_NUM_DECKS,
        DEFAULT_RESHUFFLE_THRESHOLD, DEFAULT_STARTING_CHIPS,
    },
    entities::Chips,
};

/// Table configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Chips each participant sits down with (default: 200)
    pub starting_chips: Chips,

    /// Standard decks in the shoe (default: 8)
    pub num_decks: usize,

    /// Dealer draws while below this total (default: 17)
    pub dealer_stands_on: u8,

    /// Seated participants needed before a round starts (default: 2)
    pub min_players: usize,

    /// Rebuild the shoe before betting once fewer cards remain (default: 52)
    pub reshuffle_threshold: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            starting_chips: DEFAULT_STARTING_CHIPS,
            num_decks: DEFAULT_NUM_DECKS,
            dealer_stands_on: DEFAULT_DEALER_STANDS_ON,
            min_players: DEFAULT_MIN_PLAYERS,
            reshuffle_threshold: DEFAULT_RESHUFFLE_THRESHOLD,
        }
    }
}

impl TableConfig {
    /// Parse a (possibly partial) JSON configuration. Missing fields
    /// take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.starting_chips <= 0 {
            return Err("Starting chips must be greater than 0".to_string());
        }

        if self.num_decks == 0 || self.num_decks > 16 {
            return Err("Number of decks must be between 1 and 16".to_string());
        }

        if self.dealer_stands_on == 0 || self.dealer_stands_on > BLACKJACK {
            return Err(format!(
                "Dealer stand threshold must be between 1 and {BLACKJACK}"
            ));
        }

        if self.min_players == 0 {
            return Err("Min players must be at least 1".to_string());
        }

        if self.reshuffle_threshold > self.num_decks * DECK_SIZE {
            return Err(format!(
                "Reshuffle threshold can't exceed the {} cards in the shoe",
                self.num_decks * DECK_SIZE
            ));
        }

        Ok(())
    }
}
