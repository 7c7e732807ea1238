//! The game coordinator.
//!
//! Runs rounds back to back for as long as enough participants are
//! seated. The coordinator is the only thing that touches the shoe and
//! the [`Round`]; everything it knows about who is seated comes from a
//! lobby snapshot taken at the start of each round. Prompts go to one
//! connection at a time. Broadcasts go through the lobby, and each one
//! is acknowledged before the coordinator moves on.

use log::{debug, info, warn};
use std::collections::HashMap;

use super::{
    config::TableConfig, errors::TableError, lobby::LobbyHandle, registry::Participant,
};
use crate::{
    game::{Round, Settlement, Shoe, TableEvent, TurnState, entities::PlayerId},
    net::{errors::LinkError, messages::TurnChoice},
};

pub struct Coordinator {
    config: TableConfig,
    lobby: LobbyHandle,
    shoe: Shoe,
    round: Round,
}

impl Coordinator {
    #[must_use]
    pub fn new(config: TableConfig, lobby: LobbyHandle) -> Self {
        let shoe = Shoe::new(config.num_decks);
        Self {
            config,
            lobby,
            shoe,
            round: Round::new(),
        }
    }

    /// Replace the shoe, e.g. with a stacked one.
    #[must_use]
    pub fn with_shoe(mut self, shoe: Shoe) -> Self {
        self.shoe = shoe;
        self
    }

    #[must_use]
    pub fn round(&self) -> &Round {
        &self.round
    }

    #[must_use]
    pub fn shoe(&self) -> &Shoe {
        &self.shoe
    }

    /// Play rounds forever. Only returns if the lobby goes away.
    pub async fn run(mut self) -> Result<(), TableError> {
        info!("game coordinator started");
        loop {
            let seated = self.lobby.seated_count();
            if seated < self.config.min_players {
                self.announce(TableEvent::WaitingForPlayers(
                    self.config.min_players - seated,
                ))
                .await?;
                self.lobby.wait_for_players(self.config.min_players).await?;
            }
            self.play_round().await?;
        }
    }

    async fn announce(&self, event: TableEvent) -> Result<usize, TableError> {
        self.lobby.broadcast(event.to_string()).await
    }

    /// Broadcast whatever the round queued up since the last flush.
    async fn flush_events(&mut self) -> Result<(), TableError> {
        for event in self.round.drain_events() {
            self.announce(event).await?;
        }
        Ok(())
    }

    fn drop_participant(&self, participant: &Participant, error: &LinkError) {
        warn!(
            "player #{} {} dropped during {}: {error}",
            participant.id,
            participant.name,
            self.round.phase()
        );
        self.lobby.disconnect(participant.connection());
    }

    fn ensure_shoe(&mut self) -> bool {
        if !self.shoe.needs_reshuffle(self.config.reshuffle_threshold) {
            return false;
        }
        self.shoe = Shoe::new(self.config.num_decks);
        info!("reshuffled shoe ({} cards)", self.shoe.len());
        true
    }

    /// Play one full round with everyone currently seated, from betting
    /// through settlement and reset.
    pub async fn play_round(&mut self) -> Result<Vec<Settlement>, TableError> {
        if self.ensure_shoe() {
            self.announce(TableEvent::Reshuffled(self.shoe.len())).await?;
        }

        let participants = self.lobby.seated().await?;
        info!(
            "round {} starting with {} player(s), {} cards in the shoe",
            self.round.number(),
            participants.len(),
            self.shoe.len()
        );
        self.announce(TableEvent::RoundStarting(self.round.number()))
            .await?;

        self.take_bets(&participants).await?;
        if self.round.is_empty() {
            debug!("no bets this round");
            self.round.reset();
            return Ok(Vec::new());
        }

        debug!("entering {}", self.round.phase());
        self.round.burn(&mut self.shoe)?;
        self.flush_events().await?;
        self.round.deal_hole(&mut self.shoe)?;
        self.flush_events().await?;
        self.round.deal_up(&mut self.shoe)?;
        self.flush_events().await?;

        let by_id: HashMap<PlayerId, &Participant> =
            participants.iter().map(|p| (p.id, p)).collect();
        for id in self.round.player_ids() {
            if let Some(participant) = by_id.get(&id) {
                self.take_turn(participant).await?;
            }
        }

        self.round
            .dealer_play(&mut self.shoe, self.config.dealer_stands_on)?;
        self.flush_events().await?;

        let settlements = self.round.settle()?;
        self.flush_events().await?;
        self.pay_out(&participants, &settlements).await?;

        self.round.reset();
        debug!("round reset, {} cards left", self.shoe.len());
        Ok(settlements)
    }

    async fn take_bets(&mut self, participants: &[Participant]) -> Result<(), TableError> {
        for participant in participants {
            match participant.link.ask_bet(participant.chips).await {
                Ok(bet) => {
                    self.round.place_bet(
                        participant.id,
                        participant.name.clone(),
                        participant.chips,
                        bet,
                    )?;
                    self.flush_events().await?;
                }
                Err(error) => self.drop_participant(participant, &error),
            }
        }
        Ok(())
    }

    /// Offer hit or stay until the participant stays or busts. A
    /// participant who disconnects stands on what they hold.
    async fn take_turn(&mut self, participant: &Participant) -> Result<(), TableError> {
        loop {
            match participant.link.ask_turn().await {
                Ok(TurnChoice::Hit) => {
                    let state = self.round.hit(participant.id, &mut self.shoe)?;
                    self.flush_events().await?;
                    if let TurnState::Closed(_) = state {
                        return Ok(());
                    }
                }
                Ok(TurnChoice::Stay) => {
                    self.round.stand(participant.id)?;
                    self.flush_events().await?;
                    return Ok(());
                }
                Err(error) => {
                    self.drop_participant(participant, &error);
                    return Ok(());
                }
            }
        }
    }

    /// Apply every settlement to the registry and remove anyone who
    /// ran out of chips.
    async fn pay_out(
        &mut self,
        participants: &[Participant],
        settlements: &[Settlement],
    ) -> Result<(), TableError> {
        for settlement in settlements {
            let Some(participant) = participants.iter().find(|p| p.id == settlement.id) else {
                continue;
            };
            let connection = participant.connection();
            match self
                .lobby
                .adjust_chips(connection, settlement.delta())
                .await?
            {
                Some(chips) if chips <= 0 => {
                    info!("player #{} {} is out of chips", participant.id, participant.name);
                    self.announce(TableEvent::OutOfChips(participant.name.clone()))
                        .await?;
                    self.lobby.unregister(connection).await?;
                }
                Some(chips) => {
                    debug!("player #{} {} now has {chips}", participant.id, participant.name);
                }
                None => {
                    debug!("player #{} left before settlement", participant.id);
                }
            }
        }
        Ok(())
    }
}
