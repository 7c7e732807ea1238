//! Hand evaluation.
//!
//! Aces are folded in after every other card has been summed: all but
//! one count as 1, and the last counts as 11 if that keeps the total at
//! or under 21. Otherwise every ace counts as 1.

use super::{
    constants::BLACKJACK,
    entities::{Card, Rank},
};

/// Returns the hard total (aces excluded) and the number of aces.
fn hard_total(cards: &[Card]) -> (u32, u32) {
    cards.iter().fold((0, 0), |(sum, aces), card| match card.rank() {
        Rank::Ace => (sum, aces + 1),
        rank => (sum + u32::from(rank.pips()), aces),
    })
}

fn total(cards: &[Card]) -> (u32, bool) {
    let (sum, aces) = hard_total(cards);
    if aces == 0 {
        return (sum, false);
    }
    let soft = sum + (aces - 1) + 11;
    if soft <= u32::from(BLACKJACK) {
        (soft, true)
    } else {
        (sum + aces, false)
    }
}

/// Best blackjack total for the given cards.
#[must_use]
pub fn score(cards: &[Card]) -> u8 {
    let (total, _) = total(cards);
    u8::try_from(total).unwrap_or(u8::MAX)
}

#[must_use]
pub fn is_bust(cards: &[Card]) -> bool {
    score(cards) > BLACKJACK
}

/// Whether an ace is currently being counted as 11.
#[must_use]
pub fn is_soft(cards: &[Card]) -> bool {
    total(cards).1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::Suit;

    fn cards(ranks: &[Rank]) -> Vec<Card> {
        ranks.iter().map(|&rank| Card(rank, Suit::Spade)).collect()
    }

    #[test]
    fn ace_king_is_blackjack() {
        let hand = cards(&[Rank::Ace, Rank::King]);
        assert_eq!(score(&hand), 21);
        assert!(is_soft(&hand));
    }

    #[test]
    fn two_aces() {
        assert_eq!(score(&cards(&[Rank::Ace, Rank::Ace])), 12);
    }

    #[test]
    fn two_aces_and_nine() {
        assert_eq!(score(&cards(&[Rank::Ace, Rank::Ace, Rank::Nine])), 21);
    }

    #[test]
    fn hard_twenty_one_then_bust() {
        let mut hand = cards(&[Rank::Five, Rank::Six, Rank::Ten]);
        assert_eq!(score(&hand), 21);
        assert!(!is_bust(&hand));

        hand.push(Card(Rank::Two, Suit::Heart));
        assert_eq!(score(&hand), 23);
        assert!(is_bust(&hand));
    }

    #[test]
    fn soft_hand_turns_hard() {
        let hand = cards(&[Rank::Ace, Rank::Six, Rank::Nine]);
        assert_eq!(score(&hand), 16);
        assert!(!is_soft(&hand));
    }

    #[test]
    fn face_cards_are_ten() {
        assert_eq!(score(&cards(&[Rank::Jack, Rank::Queen])), 20);
        assert_eq!(score(&cards(&[Rank::King, Rank::Ten, Rank::Two])), 22);
    }

    #[test]
    fn empty_hand_is_zero() {
        assert_eq!(score(&[]), 0);
        assert!(!is_soft(&[]));
    }
}
