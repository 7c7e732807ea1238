//! Table-wide defaults and blackjack constants.

use super::entities::Chips;

/// Best possible hand total. Anything above this is a bust.
pub const BLACKJACK: u8 = 21;

/// Dealer keeps drawing while their total is below this.
pub const DEFAULT_DEALER_STANDS_ON: u8 = 17;

/// Number of standard decks combined into one shoe.
pub const DEFAULT_NUM_DECKS: usize = 8;

/// Chips every participant is seated with.
pub const DEFAULT_STARTING_CHIPS: Chips = 200;

/// Rounds only start once this many participants are seated.
pub const DEFAULT_MIN_PLAYERS: usize = 2;

/// The shoe is rebuilt before betting once fewer cards than this remain.
pub const DEFAULT_RESHUFFLE_THRESHOLD: usize = DECK_SIZE;

/// Cards in one standard deck.
pub const DECK_SIZE: usize = 52;

/// Longest display name kept, in characters. Longer names are truncated.
pub const MAX_NAME_LENGTH: usize = 32;
