use std::fmt;

use super::entities::{Card, Chips, Hand, Username};

/// Everything that happens at the table that all seated participants
/// get to hear about. The `Display` impl is the line sent over the wire.
#[derive(Clone, Debug, PartialEq)]
pub enum TableEvent {
    Joined(Username),
    Left(Username),
    WaitingForPlayers(usize),
    RoundStarting(u64),
    BetPlaced { name: Username, bet: Chips },
    Reshuffled(usize),
    Burned,
    DealerHidden,
    DealerShows(Card),
    PlayerHand { name: Username, hand: Hand, score: u8 },
    Busted(Username),
    Stayed { name: Username, score: u8 },
    DealerReveals { hand: Hand, score: u8 },
    DealerDraws { card: Card, hand: Hand, score: u8 },
    DealerBusts,
    DealerStands(u8),
    Won { name: Username, amount: Chips },
    Lost { name: Username, amount: Chips },
    Push(Username),
    OutOfChips(Username),
}

impl fmt::Display for TableEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Joined(name) => write!(f, "{name} has connected"),
            Self::Left(name) => write!(f, "{name} has left the table"),
            Self::WaitingForPlayers(n) => write!(f, "waiting for {n} more player(s)"),
            Self::RoundStarting(round) => write!(f, "round {round} is starting"),
            Self::BetPlaced { name, bet } => write!(f, "{name} bets {bet}"),
            Self::Reshuffled(len) => write!(f, "the shoe has been reshuffled ({len} cards)"),
            Self::Burned => write!(f, "dealer has burned 1 card"),
            Self::DealerHidden => write!(f, "dealer has [hidden]"),
            Self::DealerShows(card) => write!(f, "dealer has [{card} hidden]"),
            Self::PlayerHand { name, hand, score } => write!(f, "{name} has {hand} ({score})"),
            Self::Busted(name) => write!(f, "{name} busts"),
            Self::Stayed { name, score } => write!(f, "{name} stays on {score}"),
            Self::DealerReveals { hand, score } => write!(f, "dealer has {hand} ({score})"),
            Self::DealerDraws { card, hand, score } => {
                write!(f, "dealer draws {card}: {hand} ({score})")
            }
            Self::DealerBusts => write!(f, "dealer busts"),
            Self::DealerStands(score) => write!(f, "dealer stands on {score}"),
            Self::Won { name, amount } => write!(f, "{name} wins {amount}"),
            Self::Lost { name, amount } => write!(f, "{name} loses {amount}"),
            Self::Push(name) => write!(f, "{name} pushes"),
            Self::OutOfChips(name) => write!(f, "{name} is out of chips"),
        }
    }
}
