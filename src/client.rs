use std::collections::VecDeque;

use log::debug;

use crate::event::{ClientEvent, MoveUpdate, ParseError, PlayerId, ServerCommand, ServerEvent};


pub const CLIENT_TYPE: &str = "turn_end_bot";

#[derive(Clone, Copy, PartialEq, Eq, Debug, strum::Display)]
pub enum TurnPhase {
    WaitingForGame,
    MyTurn,
    OpponentTurn,
    GameOver,
}

#[must_use]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TickOutcome {
    // No game yet. Keep ticking: there is no timeout on waiting for the game to start.
    WaitingForGame,
    // Game is in progress, but it's not our turn.
    Idle,
    // `TurnEnd` has been queued. It is queued again on every tick until the server tells us
    // that the turn has passed.
    TurnEnded,
    // The game is over. The turn loop should stop and the connection should be closed.
    Finished,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum NotableEvent {
    None,
    GameStarted { my_player_id: PlayerId },
    GameOver,
    MyTurn,
    OpponentTurn,
    OtherMove { action: String, player: Option<PlayerId> },
    MoveRejected,
    PlayerConnected(PlayerId),
    PlayerDisconnected(PlayerId),
}

#[derive(Debug)]
pub enum EventError {
    Parse(ParseError),
    ServerReturnedError(String),
}

// Everything the bot knows about the game. The three flags mirror what the server tells us;
// `TurnPhase` is derived from them rather than stored.
pub struct ClientState {
    game_active: bool,
    is_my_turn: bool,
    my_player_id: Option<PlayerId>,
    outgoing_events: VecDeque<ClientEvent>,
}

impl ClientState {
    pub fn new() -> Self {
        ClientState {
            game_active: false,
            is_my_turn: false,
            my_player_id: None,
            outgoing_events: VecDeque::new(),
        }
    }

    pub fn game_active(&self) -> bool { self.game_active }
    pub fn is_my_turn(&self) -> bool { self.is_my_turn }
    pub fn my_player_id(&self) -> Option<PlayerId> { self.my_player_id }

    pub fn phase(&self) -> TurnPhase {
        match (self.game_active, self.my_player_id) {
            (true, _) if self.is_my_turn => TurnPhase::MyTurn,
            (true, _) => TurnPhase::OpponentTurn,
            (false, None) => TurnPhase::WaitingForGame,
            (false, Some(_)) => TurnPhase::GameOver,
        }
    }

    pub fn next_outgoing_event(&mut self) -> Option<ClientEvent> {
        self.outgoing_events.pop_front()
    }

    // Asks the server for a free player seat. The server doesn't require this for all setups,
    // so it's up to the caller.
    pub fn join(&mut self) {
        self.outgoing_events.push_back(ClientEvent::Command(vec![ServerCommand::GameJoin]));
        self.outgoing_events.push_back(ClientEvent::Info { client_type: CLIENT_TYPE.to_owned() });
    }

    // Malformed messages are reported as errors, but never change the state.
    pub fn process_server_message(&mut self, raw: &str) -> Result<NotableEvent, EventError> {
        match ServerEvent::parse(raw).map_err(EventError::Parse)? {
            Some(event) => self.process_server_event(event),
            None => {
                debug!("Ignoring message of unknown type: {raw}");
                Ok(NotableEvent::None)
            }
        }
    }

    pub fn process_server_event(&mut self, event: ServerEvent) -> Result<NotableEvent, EventError> {
        match event {
            ServerEvent::Error { message } => Err(EventError::ServerReturnedError(message)),
            ServerEvent::GameStart { your_player_id } => {
                self.my_player_id = Some(your_player_id);
                self.game_active = true;
                // Player 0 always starts.
                self.is_my_turn = your_player_id == 0;
                Ok(NotableEvent::GameStarted { my_player_id: your_player_id })
            }
            ServerEvent::GameEnd => {
                self.game_active = false;
                Ok(NotableEvent::GameOver)
            }
            ServerEvent::MoveUpdate(MoveUpdate::TurnEnd { player }) => {
                // Improvement potential. This assumes exactly two players taking turns in a
                // fixed order. The server also sends `next_player`, which would work for any
                // number of players, but older servers don't have it.
                // Ids come from the network, so any `i64` must be accepted without overflow.
                self.is_my_turn = self.my_player_id == Some(player.wrapping_sub(1).rem_euclid(2));
                Ok(if self.is_my_turn { NotableEvent::MyTurn } else { NotableEvent::OpponentTurn })
            }
            ServerEvent::MoveUpdate(MoveUpdate::Other { action, player }) => {
                Ok(NotableEvent::OtherMove { action, player })
            }
            ServerEvent::MoveResponse { valid } => {
                Ok(if valid { NotableEvent::None } else { NotableEvent::MoveRejected })
            }
            ServerEvent::PlayerConnect { id } => Ok(NotableEvent::PlayerConnected(id)),
            ServerEvent::PlayerDisconnect { id } => Ok(NotableEvent::PlayerDisconnected(id)),
        }
    }

    // One iteration of the turn loop. The only "strategy" is to end the turn right away.
    pub fn tick(&mut self) -> TickOutcome {
        match self.phase() {
            TurnPhase::WaitingForGame => TickOutcome::WaitingForGame,
            TurnPhase::OpponentTurn => TickOutcome::Idle,
            TurnPhase::MyTurn => {
                self.outgoing_events.push_back(ClientEvent::end_turn());
                TickOutcome::TurnEnded
            }
            TurnPhase::GameOver => TickOutcome::Finished,
        }
    }
}

impl Default for ClientState {
    fn default() -> Self { Self::new() }
}
