//! The round state machine.
//!
//! A [`Round`] owns everything that only lives for one round of play:
//! bets, hands, per-player results and the dealer's hand. It does no I/O.
//! Whoever drives it (see [`crate::table::Coordinator`]) collects input,
//! calls the phase methods in order, and broadcasts the events that each
//! call queues up.
//!
//! Phases run in a fixed cycle:
//!
//! - **Betting**: [`Round::place_bet`] once per participant
//! - **Burn**: [`Round::burn`]
//! - **DealHole**: [`Round::deal_hole`], dealer's card concealed
//! - **DealUp**: [`Round::deal_up`], dealer's first card shown
//! - **PlayerTurns**: [`Round::hit`] / [`Round::stand`]
//! - **DealerTurn**: [`Round::dealer_play`]
//! - **Settlement**: [`Round::settle`]
//! - **Reset**: [`Round::reset`], back to Betting

use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, VecDeque},
    fmt,
};
use thiserror::Error;

use super::{
    entities::{Chips, Hand, PlayerId, Username},
    events::TableEvent,
    shoe::{Shoe, ShoeError},
};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Phase {
    Betting,
    Burn,
    DealHole,
    DealUp,
    PlayerTurns,
    DealerTurn,
    Settlement,
    Reset,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Betting => "betting",
            Self::Burn => "burn",
            Self::DealHole => "deal (hole)",
            Self::DealUp => "deal (up)",
            Self::PlayerTurns => "player turns",
            Self::DealerTurn => "dealer turn",
            Self::Settlement => "settlement",
            Self::Reset => "reset",
        };
        write!(f, "{repr}")
    }
}

#[derive(Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum RoundError {
    #[error("can't do that during {actual}")]
    OutOfPhase { actual: Phase },
    #[error("player {0} isn't in this round")]
    UnknownPlayer(PlayerId),
    #[error("player {0} already placed a bet")]
    AlreadyBet(PlayerId),
    #[error("bet of {bet} must be between 0 and {chips}")]
    InvalidBet { bet: Chips, chips: Chips },
    #[error("player {0} already finished their turn")]
    TurnClosed(PlayerId),
    #[error(transparent)]
    Shoe(#[from] ShoeError),
}

/// A hand's recorded result. A bust is encoded as zero when compared,
/// so a busted dealer loses to every standing hand.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Standing {
    Bust,
    Stood(u8),
}

impl Standing {
    fn of(hand: &Hand) -> Self {
        if hand.is_bust() {
            Self::Bust
        } else {
            Self::Stood(hand.score())
        }
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::Bust => 0,
            Self::Stood(score) => score,
        }
    }
}

/// Where a player's turn is after a hit.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TurnState {
    Open(u8),
    Closed(Standing),
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Outcome {
    Win,
    Lose,
    Push,
}

impl Outcome {
    fn decide(player: Standing, dealer: Standing) -> Self {
        match player {
            Standing::Bust => Self::Lose,
            Standing::Stood(score) => match score.cmp(&dealer.value()) {
                std::cmp::Ordering::Equal => Self::Push,
                std::cmp::Ordering::Less => Self::Lose,
                std::cmp::Ordering::Greater => Self::Win,
            },
        }
    }
}

/// How one participant's bet resolved.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Settlement {
    pub id: PlayerId,
    pub name: Username,
    pub bet: Chips,
    pub outcome: Outcome,
}

impl Settlement {
    /// Change to apply to the participant's balance.
    #[must_use]
    pub fn delta(&self) -> Chips {
        match self.outcome {
            Outcome::Win => self.bet,
            Outcome::Lose => -self.bet,
            Outcome::Push => 0,
        }
    }
}

#[derive(Debug)]
struct Seat {
    name: Username,
    bet: Chips,
    hand: Hand,
    standing: Option<Standing>,
    turn_closed: bool,
}

#[derive(Debug)]
pub struct Round {
    number: u64,
    phase: Phase,
    dealer: Hand,
    dealer_result: Option<Standing>,
    /// Keyed by player id so every phase visits players in arrival order.
    seats: BTreeMap<PlayerId, Seat>,
    events: VecDeque<TableEvent>,
}

impl Default for Round {
    fn default() -> Self {
        Self::new()
    }
}

impl Round {
    #[must_use]
    pub fn new() -> Self {
        Self {
            number: 1,
            phase: Phase::Betting,
            dealer: Hand::new(),
            dealer_result: None,
            seats: BTreeMap::new(),
            events: VecDeque::new(),
        }
    }

    #[must_use]
    pub fn number(&self) -> u64 {
        self.number
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn dealer_hand(&self) -> &Hand {
        &self.dealer
    }

    #[must_use]
    pub fn dealer_result(&self) -> Option<Standing> {
        self.dealer_result
    }

    /// Players with a bet in, in the order they'll act.
    #[must_use]
    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.seats.keys().copied().collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    #[must_use]
    pub fn bet(&self, id: PlayerId) -> Option<Chips> {
        self.seats.get(&id).map(|seat| seat.bet)
    }

    #[must_use]
    pub fn hand(&self, id: PlayerId) -> Option<&Hand> {
        self.seats.get(&id).map(|seat| &seat.hand)
    }

    #[must_use]
    pub fn standing(&self, id: PlayerId) -> Option<Standing> {
        self.seats.get(&id).and_then(|seat| seat.standing)
    }

    pub fn drain_events(&mut self) -> VecDeque<TableEvent> {
        std::mem::take(&mut self.events)
    }

    fn expect_phase(&self, allowed: &[Phase]) -> Result<(), RoundError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(RoundError::OutOfPhase { actual: self.phase })
        }
    }

    fn seat_mut(&mut self, id: PlayerId) -> Result<&mut Seat, RoundError> {
        self.seats.get_mut(&id).ok_or(RoundError::UnknownPlayer(id))
    }

    fn announce_hands(&mut self) {
        for seat in self.seats.values() {
            self.events.push_back(TableEvent::PlayerHand {
                name: seat.name.clone(),
                hand: seat.hand.clone(),
                score: seat.hand.score(),
            });
        }
    }

    pub fn place_bet(
        &mut self,
        id: PlayerId,
        name: Username,
        chips: Chips,
        bet: Chips,
    ) -> Result<(), RoundError> {
        self.expect_phase(&[Phase::Betting])?;
        if self.seats.contains_key(&id) {
            return Err(RoundError::AlreadyBet(id));
        }
        if !(0..=chips).contains(&bet) {
            return Err(RoundError::InvalidBet { bet, chips });
        }
        self.events.push_back(TableEvent::BetPlaced {
            name: name.clone(),
            bet,
        });
        self.seats.insert(
            id,
            Seat {
                name,
                bet,
                hand: Hand::new(),
                standing: None,
                turn_closed: false,
            },
        );
        Ok(())
    }

    pub fn burn(&mut self, shoe: &mut Shoe) -> Result<(), RoundError> {
        self.expect_phase(&[Phase::Betting])?;
        shoe.deal()?;
        self.phase = Phase::Burn;
        self.events.push_back(TableEvent::Burned);
        Ok(())
    }

    fn deal_one_each(&mut self, shoe: &mut Shoe) -> Result<(), ShoeError> {
        self.dealer.push(shoe.deal()?);
        for seat in self.seats.values_mut() {
            seat.hand.push(shoe.deal()?);
        }
        Ok(())
    }

    /// First card to everyone. The dealer's card stays face down.
    pub fn deal_hole(&mut self, shoe: &mut Shoe) -> Result<(), RoundError> {
        self.expect_phase(&[Phase::Burn])?;
        self.deal_one_each(shoe)?;
        self.phase = Phase::DealHole;
        self.events.push_back(TableEvent::DealerHidden);
        self.announce_hands();
        Ok(())
    }

    /// Second card to everyone. Only the dealer's first card is shown.
    pub fn deal_up(&mut self, shoe: &mut Shoe) -> Result<(), RoundError> {
        self.expect_phase(&[Phase::DealHole])?;
        self.deal_one_each(shoe)?;
        self.phase = Phase::DealUp;
        if let Some(card) = self.dealer.first() {
            self.events.push_back(TableEvent::DealerShows(*card));
        }
        self.announce_hands();
        Ok(())
    }

    fn open_turn(&mut self, id: PlayerId) -> Result<&mut Seat, RoundError> {
        self.expect_phase(&[Phase::DealUp, Phase::PlayerTurns])?;
        self.phase = Phase::PlayerTurns;
        let seat = self.seat_mut(id)?;
        if seat.turn_closed {
            return Err(RoundError::TurnClosed(id));
        }
        Ok(seat)
    }

    pub fn hit(&mut self, id: PlayerId, shoe: &mut Shoe) -> Result<TurnState, RoundError> {
        let seat = self.open_turn(id)?;
        seat.hand.push(shoe.deal()?);
        let name = seat.name.clone();
        let hand = seat.hand.clone();
        let score = hand.score();

        let state = if hand.is_bust() {
            seat.standing = Some(Standing::Bust);
            seat.turn_closed = true;
            TurnState::Closed(Standing::Bust)
        } else {
            seat.standing = Some(Standing::Stood(score));
            TurnState::Open(score)
        };

        self.events.push_back(TableEvent::PlayerHand {
            name: name.clone(),
            hand,
            score,
        });
        if state == TurnState::Closed(Standing::Bust) {
            self.events.push_back(TableEvent::Busted(name));
        }
        Ok(state)
    }

    pub fn stand(&mut self, id: PlayerId) -> Result<Standing, RoundError> {
        let seat = self.open_turn(id)?;
        let standing = Standing::of(&seat.hand);
        seat.standing = Some(standing);
        seat.turn_closed = true;
        let event = TableEvent::Stayed {
            name: seat.name.clone(),
            score: standing.value(),
        };
        self.events.push_back(event);
        Ok(standing)
    }

    /// Reveal the dealer's hand and draw until reaching `stands_on`.
    /// Players who never finished their turn stand on what they hold.
    pub fn dealer_play(&mut self, shoe: &mut Shoe, stands_on: u8) -> Result<Standing, RoundError> {
        self.expect_phase(&[Phase::DealUp, Phase::PlayerTurns])?;
        self.phase = Phase::DealerTurn;

        for seat in self.seats.values_mut().filter(|seat| !seat.turn_closed) {
            seat.standing = Some(Standing::of(&seat.hand));
            seat.turn_closed = true;
        }

        self.events.push_back(TableEvent::DealerReveals {
            hand: self.dealer.clone(),
            score: self.dealer.score(),
        });
        while self.dealer.score() < stands_on {
            let card = shoe.deal()?;
            self.dealer.push(card);
            self.events.push_back(TableEvent::DealerDraws {
                card,
                hand: self.dealer.clone(),
                score: self.dealer.score(),
            });
        }

        let standing = Standing::of(&self.dealer);
        self.events.push_back(match standing {
            Standing::Bust => TableEvent::DealerBusts,
            Standing::Stood(score) => TableEvent::DealerStands(score),
        });
        self.dealer_result = Some(standing);
        Ok(standing)
    }

    /// Compare every player against the dealer. Applying the chip
    /// deltas is left to the caller, who owns the balances.
    pub fn settle(&mut self) -> Result<Vec<Settlement>, RoundError> {
        self.expect_phase(&[Phase::DealerTurn])?;
        self.phase = Phase::Settlement;
        let dealer = self.dealer_result.unwrap_or_else(|| Standing::of(&self.dealer));

        let mut settlements = Vec::with_capacity(self.seats.len());
        for (&id, seat) in &self.seats {
            let standing = seat.standing.unwrap_or_else(|| Standing::of(&seat.hand));
            let outcome = Outcome::decide(standing, dealer);
            let name = seat.name.clone();
            self.events.push_back(match outcome {
                Outcome::Win => TableEvent::Won {
                    name: name.clone(),
                    amount: seat.bet,
                },
                Outcome::Lose => TableEvent::Lost {
                    name: name.clone(),
                    amount: seat.bet,
                },
                Outcome::Push => TableEvent::Push(name.clone()),
            });
            settlements.push(Settlement {
                id,
                name,
                bet: seat.bet,
                outcome,
            });
        }
        Ok(settlements)
    }

    /// Clear every hand, bet and result and start the next round.
    pub fn reset(&mut self) {
        self.phase = Phase::Reset;
        self.dealer.clear();
        self.dealer_result = None;
        self.seats.clear();
        self.number += 1;
        self.phase = Phase::Betting;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::{Card, Rank, Suit};

    const ALICE: PlayerId = 1;
    const BOB: PlayerId = 2;

    fn c(rank: Rank) -> Card {
        Card(rank, Suit::Club)
    }

    /// Builds a shoe that deals `order` front to back.
    fn stacked(order: &[Card]) -> Shoe {
        Shoe::stacked(order.iter().rev().copied().collect())
    }

    fn two_player_round(alice_bet: Chips, bob_bet: Chips) -> Round {
        let mut round = Round::new();
        round
            .place_bet(ALICE, Username::new("alice"), 200, alice_bet)
            .unwrap();
        round
            .place_bet(BOB, Username::new("bob"), 200, bob_bet)
            .unwrap();
        round
    }

    fn deal(round: &mut Round, shoe: &mut Shoe) {
        round.burn(shoe).unwrap();
        round.deal_hole(shoe).unwrap();
        round.deal_up(shoe).unwrap();
    }

    #[test]
    fn bets_must_be_within_balance() {
        let mut round = Round::new();
        let name = Username::new("alice");
        for bet in [-1, 51] {
            assert_eq!(
                round.place_bet(ALICE, name.clone(), 50, bet),
                Err(RoundError::InvalidBet { bet, chips: 50 })
            );
        }
        assert!(round.place_bet(ALICE, name.clone(), 50, 50).is_ok());
        assert!(round.place_bet(BOB, name.clone(), 50, 0).is_ok());
        assert_eq!(
            round.place_bet(ALICE, name, 50, 10),
            Err(RoundError::AlreadyBet(ALICE))
        );
    }

    #[test]
    fn phases_are_enforced() {
        let mut round = two_player_round(10, 10);
        let mut shoe = Shoe::new(1);
        assert_eq!(
            round.deal_up(&mut shoe),
            Err(RoundError::OutOfPhase {
                actual: Phase::Betting
            })
        );
        assert!(round.hit(ALICE, &mut shoe).is_err());
        assert!(round.settle().is_err());
    }

    #[test]
    fn dealer_first_card_is_hidden_then_shown() {
        let mut round = two_player_round(10, 10);
        let mut shoe = stacked(&[
            c(Rank::Two),
            c(Rank::King),
            c(Rank::Three),
            c(Rank::Four),
            c(Rank::Five),
            c(Rank::Six),
            c(Rank::Seven),
        ]);
        round.burn(&mut shoe).unwrap();
        round.drain_events();

        round.deal_hole(&mut shoe).unwrap();
        let events = round.drain_events();
        assert_eq!(events[0], TableEvent::DealerHidden);
        assert_eq!(events.len(), 3);

        round.deal_up(&mut shoe).unwrap();
        let events = round.drain_events();
        assert_eq!(events[0], TableEvent::DealerShows(c(Rank::King)));
        assert_eq!(round.dealer_hand().len(), 2);
        assert_eq!(round.hand(ALICE).unwrap().cards(), &[c(Rank::Three), c(Rank::Six)]);
        assert_eq!(round.hand(BOB).unwrap().cards(), &[c(Rank::Four), c(Rank::Seven)]);
    }

    #[test]
    fn full_round_win_and_loss() {
        // burn, dealer, alice, bob, dealer, alice, bob
        let mut shoe = stacked(&[
            c(Rank::Two),
            c(Rank::Ten),
            c(Rank::Ten),
            c(Rank::Ten),
            c(Rank::Eight),
            c(Rank::Nine),
            c(Rank::Seven),
        ]);
        let mut round = two_player_round(50, 30);
        deal(&mut round, &mut shoe);

        assert_eq!(round.stand(ALICE), Ok(Standing::Stood(19)));
        assert_eq!(round.stand(BOB), Ok(Standing::Stood(17)));
        assert_eq!(round.dealer_play(&mut shoe, 17), Ok(Standing::Stood(18)));

        let settlements = round.settle().unwrap();
        assert_eq!(settlements.len(), 2);
        assert_eq!(settlements[0].outcome, Outcome::Win);
        assert_eq!(settlements[0].delta(), 50);
        assert_eq!(settlements[1].outcome, Outcome::Lose);
        assert_eq!(settlements[1].delta(), -30);

        round.reset();
        assert_eq!(round.phase(), Phase::Betting);
        assert_eq!(round.number(), 2);
        assert!(round.is_empty());
        assert!(round.dealer_hand().is_empty());
        assert_eq!(round.bet(ALICE), None);
    }

    #[test]
    fn bust_loses_even_when_dealer_busts() {
        // burn, dealer, alice, bob, dealer, alice, bob, alice hit, dealer hit
        let mut shoe = stacked(&[
            c(Rank::Two),
            c(Rank::Ten),
            c(Rank::Ten),
            c(Rank::Ten),
            c(Rank::Six),
            c(Rank::Six),
            c(Rank::Two),
            c(Rank::King),
            c(Rank::Queen),
        ]);
        let mut round = two_player_round(20, 20);
        deal(&mut round, &mut shoe);

        assert_eq!(
            round.hit(ALICE, &mut shoe),
            Ok(TurnState::Closed(Standing::Bust))
        );
        assert_eq!(round.standing(ALICE), Some(Standing::Bust));
        assert_eq!(round.hit(ALICE, &mut shoe), Err(RoundError::TurnClosed(ALICE)));
        assert!(round.drain_events().contains(&TableEvent::Busted(Username::new("alice"))));

        assert_eq!(round.stand(BOB), Ok(Standing::Stood(12)));
        assert_eq!(round.dealer_play(&mut shoe, 17), Ok(Standing::Bust));
        assert!(round.drain_events().contains(&TableEvent::DealerBusts));

        let settlements = round.settle().unwrap();
        assert_eq!(settlements[0].outcome, Outcome::Lose);
        assert_eq!(settlements[1].outcome, Outcome::Win);
    }

    #[test]
    fn equal_totals_push() {
        let mut shoe = stacked(&[
            c(Rank::Two),
            c(Rank::Ten),
            c(Rank::Ten),
            c(Rank::Ten),
            c(Rank::Eight),
            c(Rank::Eight),
            c(Rank::Five),
            c(Rank::Three),
        ]);
        let mut round = two_player_round(25, 25);
        deal(&mut round, &mut shoe);

        assert_eq!(round.stand(ALICE), Ok(Standing::Stood(18)));
        assert_eq!(round.hit(BOB, &mut shoe), Ok(TurnState::Open(18)));
        assert_eq!(round.stand(BOB), Ok(Standing::Stood(18)));
        round.dealer_play(&mut shoe, 17).unwrap();

        let settlements = round.settle().unwrap();
        assert!(settlements.iter().all(|s| s.outcome == Outcome::Push));
        assert!(settlements.iter().all(|s| s.delta() == 0));
    }

    #[test]
    fn unfinished_turns_stand_when_dealer_plays() {
        let mut shoe = stacked(&[
            c(Rank::Two),
            c(Rank::Ten),
            c(Rank::Ten),
            c(Rank::Nine),
            c(Rank::Seven),
            c(Rank::Ten),
            c(Rank::Nine),
        ]);
        let mut round = two_player_round(5, 5);
        deal(&mut round, &mut shoe);

        round.dealer_play(&mut shoe, 17).unwrap();
        assert_eq!(round.standing(ALICE), Some(Standing::Stood(20)));
        assert_eq!(round.standing(BOB), Some(Standing::Stood(18)));
    }

    #[test]
    fn shoe_without_decks_fails_the_deal() {
        let mut shoe = Shoe::new(0);
        let mut round = two_player_round(5, 5);
        assert_eq!(
            round.burn(&mut shoe),
            Err(RoundError::Shoe(ShoeError::Empty))
        );
        assert_eq!(round.phase(), Phase::Betting);
    }

    #[test]
    fn dealer_draws_to_seventeen() {
        let mut shoe = stacked(&[
            c(Rank::Two),
            c(Rank::Two),
            c(Rank::Ten),
            c(Rank::Ten),
            c(Rank::Three),
            c(Rank::Ten),
            c(Rank::Ten),
            c(Rank::Ace),
            c(Rank::Ace),
        ]);
        let mut round = two_player_round(5, 5);
        deal(&mut round, &mut shoe);
        round.drain_events();

        // 2 + 3, then A (soft 16), then A (soft 17)
        assert_eq!(round.dealer_play(&mut shoe, 17), Ok(Standing::Stood(17)));
        let draws = round
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, TableEvent::DealerDraws { .. }))
            .count();
        assert_eq!(draws, 2);
    }
}
