//! The shoe: several standard decks shuffled together.

use log::{debug, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    constants::DECK_SIZE,
    entities::{Card, Rank, Suit},
};

#[derive(Clone, Copy, Debug, Deserialize, Error, Eq, PartialEq, Serialize)]
pub enum ShoeError {
    #[error("shoe is empty")]
    Empty,
}

/// Ordered cards; the top of the shoe is the end of the vector.
#[derive(Clone, Debug)]
pub struct Shoe {
    cards: Vec<Card>,
    num_decks: usize,
}

impl Shoe {
    /// Build a freshly shuffled shoe of `num_decks` standard decks.
    #[must_use]
    pub fn new(num_decks: usize) -> Self {
        Self::with_rng(num_decks, &mut rand::rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(num_decks: usize, rng: &mut R) -> Self {
        let mut shoe = Self::unshuffled(num_decks);
        shoe.shuffle(rng);
        shoe
    }

    /// Every (rank, suit) pair `num_decks` times, in a fixed order.
    #[must_use]
    pub fn unshuffled(num_decks: usize) -> Self {
        let mut cards = Vec::with_capacity(num_decks * DECK_SIZE);
        for _ in 0..num_decks {
            for rank in Rank::ALL {
                for suit in Suit::ALL {
                    cards.push(Card(rank, suit));
                }
            }
        }
        Self { cards, num_decks }
    }

    /// A shoe with a predetermined order. The last card is drawn first.
    /// Rebuilds after exhaustion use a single deck.
    #[must_use]
    pub fn stacked(cards: Vec<Card>) -> Self {
        Self {
            cards,
            num_decks: 1,
        }
    }

    /// Fisher-Yates: for each i in 1..len, swap i with a uniform index in [0, i].
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for i in 1..self.cards.len() {
            let r = rng.random_range(0..=i);
            self.cards.swap(i, r);
        }
    }

    /// Throw the current cards away and start over with a full, shuffled shoe.
    pub fn rebuild(&mut self) {
        *self = Self::new(self.num_decks);
        debug!("rebuilt shoe with {} cards", self.cards.len());
    }

    /// Remove and return the top card.
    pub fn draw(&mut self) -> Result<Card, ShoeError> {
        self.cards.pop().ok_or(ShoeError::Empty)
    }

    /// Discard the top card without revealing it.
    pub fn burn(&mut self) -> Result<(), ShoeError> {
        self.draw().map(|_| ())
    }

    /// Draw, rebuilding the shoe first if it ran dry mid-round. Fails
    /// only if the rebuilt shoe is empty too, i.e. it has no decks.
    pub fn deal(&mut self) -> Result<Card, ShoeError> {
        if let Ok(card) = self.draw() {
            return Ok(card);
        }
        warn!("shoe ran out mid-round; rebuilding");
        self.rebuild();
        self.draw()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn num_decks(&self) -> usize {
        self.num_decks
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Whether the shoe should be rebuilt before the next round.
    #[must_use]
    pub fn needs_reshuffle(&self, threshold: usize) -> bool {
        self.cards.len() < threshold
    }
}
