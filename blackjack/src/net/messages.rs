//! Prompts the server sends and the replies it expects back.
//!
//! The wire format is plain newline-terminated text. Each outstanding
//! prompt carries its own tag ([`Request`]) that knows how to parse the
//! next line from that connection, so parsing never depends on which
//! phase the table happens to be in.

use enum_dispatch::enum_dispatch;
use std::fmt;
use thiserror::Error;

use crate::game::entities::{Chips, Username};

/// Local validation failures. These never leave the connection that
/// caused them: the prompt is repeated until a valid reply arrives.
#[derive(Debug, Eq, Error, PartialEq)]
pub enum InputError {
    #[error("name can't be empty")]
    EmptyName,
    #[error("{0:?} is not a number")]
    NotANumber(String),
    #[error("bet must be between 0 and {max}")]
    BetOutOfRange { bet: Chips, max: Chips },
    #[error("expected h or s, got {0:?}")]
    UnknownChoice(String),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TurnChoice {
    Hit,
    Stay,
}

impl fmt::Display for TurnChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Hit => "hit",
            Self::Stay => "stay",
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Reply {
    Name(Username),
    Bet(Chips),
    Choice(TurnChoice),
}

#[enum_dispatch]
pub trait Prompt {
    /// Lines sent to the client each time the prompt is (re)issued.
    fn lines(&self) -> Vec<String>;

    fn parse(&self, line: &str) -> Result<Reply, InputError>;
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ExpectName;

impl Prompt for ExpectName {
    fn lines(&self) -> Vec<String> {
        vec!["What is your name?".to_string()]
    }

    fn parse(&self, line: &str) -> Result<Reply, InputError> {
        let name = Username::new(line);
        if name.is_empty() {
            return Err(InputError::EmptyName);
        }
        Ok(Reply::Name(name))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ExpectBet {
    /// The participant's balance; the largest bet allowed.
    pub chips: Chips,
}

impl Prompt for ExpectBet {
    fn lines(&self) -> Vec<String> {
        vec![
            format!("You have {} chips.", self.chips),
            "How much would you like to bet?".to_string(),
        ]
    }

    fn parse(&self, line: &str) -> Result<Reply, InputError> {
        let line = line.trim();
        let bet: Chips = line
            .parse()
            .map_err(|_| InputError::NotANumber(line.to_string()))?;
        if !(0..=self.chips).contains(&bet) {
            return Err(InputError::BetOutOfRange {
                bet,
                max: self.chips,
            });
        }
        Ok(Reply::Bet(bet))
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ExpectTurnChoice;

impl Prompt for ExpectTurnChoice {
    fn lines(&self) -> Vec<String> {
        vec!["Would you like to (h)it or (s)tay?".to_string()]
    }

    fn parse(&self, line: &str) -> Result<Reply, InputError> {
        let line = line.trim();
        match line.to_ascii_lowercase().as_str() {
            "h" => Ok(Reply::Choice(TurnChoice::Hit)),
            "s" => Ok(Reply::Choice(TurnChoice::Stay)),
            _ => Err(InputError::UnknownChoice(line.to_string())),
        }
    }
}

/// A prompt tagged with the kind of reply it's waiting for.
#[enum_dispatch(Prompt)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Request {
    ExpectName,
    ExpectBet,
    ExpectTurnChoice,
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::ExpectName(_) => "name",
            Self::ExpectBet(_) => "bet",
            Self::ExpectTurnChoice(_) => "turn choice",
        };
        write!(f, "{repr}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bet_validation() {
        let request = Request::from(ExpectBet { chips: 50 });
        assert_eq!(
            request.parse("-1"),
            Err(InputError::BetOutOfRange { bet: -1, max: 50 })
        );
        assert_eq!(
            request.parse("51"),
            Err(InputError::BetOutOfRange { bet: 51, max: 50 })
        );
        assert_eq!(
            request.parse("abc"),
            Err(InputError::NotANumber("abc".to_string()))
        );
        assert_eq!(request.parse("0"), Ok(Reply::Bet(0)));
        assert_eq!(request.parse("50\r"), Ok(Reply::Bet(50)));
    }

    #[test]
    fn bet_prompt_shows_balance() {
        let lines = Request::from(ExpectBet { chips: 120 }).lines();
        assert_eq!(lines[0], "You have 120 chips.");
        assert_eq!(lines[1], "How much would you like to bet?");
    }

    #[test]
    fn turn_choices() {
        let request = Request::from(ExpectTurnChoice);
        assert_eq!(request.parse("h"), Ok(Reply::Choice(TurnChoice::Hit)));
        assert_eq!(request.parse(" S "), Ok(Reply::Choice(TurnChoice::Stay)));
        assert_eq!(
            request.parse("hit me"),
            Err(InputError::UnknownChoice("hit me".to_string()))
        );
        assert!(request.parse("").is_err());
    }

    #[test]
    fn names() {
        let request = Request::from(ExpectName);
        assert_eq!(
            request.parse("  ada lovelace "),
            Ok(Reply::Name(Username::new("ada_lovelace")))
        );
        assert_eq!(request.parse("   "), Err(InputError::EmptyName));
    }
}
