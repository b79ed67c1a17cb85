// Wire format of the Torres server: every frame is a JSON text message of the form
//   {"type": <string>, "data": <any>}
//
// Inbound messages are parsed in two steps (envelope first, then `data` by type) so that
// unknown types can be skipped without failing the whole message.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;


pub type PlayerId = i64;

#[derive(Debug)]
pub enum ParseError {
    Json(serde_json::Error),
    MissingField { event: &'static str, field: &'static str },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseError::Json(err) => write!(f, "invalid JSON: {err}"),
            ParseError::MissingField { event, field } => {
                write!(f, "'{event}' message without '{field}'")
            }
        }
    }
}

impl std::error::Error for ParseError {}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self { ParseError::Json(err) }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum MoveUpdate {
    // A player finished their turn. This is the only update the bot acts upon.
    TurnEnd { player: PlayerId },
    // Piece placements and moves. The bot doesn't model the board, so these are only logged.
    Other { action: String, player: Option<PlayerId> },
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ServerEvent {
    Error { message: String },
    GameStart { your_player_id: PlayerId },
    GameEnd,
    MoveUpdate(MoveUpdate),
    // Reply to our own `move` message.
    MoveResponse { valid: bool },
    PlayerConnect { id: PlayerId },
    PlayerDisconnect { id: PlayerId },
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

#[derive(Deserialize)]
struct ErrorData {
    message: String,
}

#[derive(Deserialize)]
struct GameStartData {
    your_player_id: PlayerId,
}

#[derive(Deserialize)]
struct MoveUpdateData {
    action: String,
    player: Option<PlayerId>,
}

#[derive(Deserialize)]
struct MoveResponseData {
    valid: bool,
}

#[derive(Deserialize)]
struct PlayerData {
    id: PlayerId,
}

impl ServerEvent {
    // Returns `Ok(None)` for well-formed messages of a type the bot doesn't know.
    pub fn parse(raw: &str) -> Result<Option<Self>, ParseError> {
        let Envelope { kind, data } = serde_json::from_str(raw)?;
        let event = match kind.as_str() {
            "error" => {
                let ErrorData { message } = serde_json::from_value(data)?;
                ServerEvent::Error { message }
            }
            "game_start" => {
                let GameStartData { your_player_id } = serde_json::from_value(data)?;
                ServerEvent::GameStart { your_player_id }
            }
            "game_end" => ServerEvent::GameEnd,
            "move_update" => {
                let MoveUpdateData { action, player } = serde_json::from_value(data)?;
                if action == "turn_end" {
                    let player = player.ok_or(ParseError::MissingField {
                        event: "move_update",
                        field: "player",
                    })?;
                    ServerEvent::MoveUpdate(MoveUpdate::TurnEnd { player })
                } else {
                    ServerEvent::MoveUpdate(MoveUpdate::Other { action, player })
                }
            }
            "move_response" => {
                let MoveResponseData { valid } = serde_json::from_value(data)?;
                ServerEvent::MoveResponse { valid }
            }
            "player_connect" => {
                let PlayerData { id } = serde_json::from_value(data)?;
                ServerEvent::PlayerConnect { id }
            }
            "player_disconnect" => {
                let PlayerData { id } = serde_json::from_value(data)?;
                ServerEvent::PlayerDisconnect { id }
            }
            _ => return Ok(None),
        };
        Ok(Some(event))
    }
}


#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum MoveAction {
    TurnEnd,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerCommand {
    GameJoin,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    Move(MoveAction),
    Command(Vec<ServerCommand>),
    // Tells the server what kind of client occupies the seat.
    Info {
        #[serde(rename = "type")]
        client_type: String,
    },
}

impl ClientEvent {
    pub fn end_turn() -> Self { ClientEvent::Move(MoveAction::TurnEnd) }
}
