// Rust-upgrade (https://github.com/rust-lang/rust/issues/46379):
//   remove `#[allow(dead_code)]` before public functions.

use torres_bot::client::ClientState;
use torres_bot::event::{ClientEvent, PlayerId};


#[allow(dead_code)]
pub fn game_start_msg(your_player_id: PlayerId) -> String {
    format!(r#"{{"type":"game_start","data":{{"your_player_id":{your_player_id}}}}}"#)
}

#[allow(dead_code)]
pub fn turn_end_msg(player: PlayerId) -> String {
    format!(r#"{{"type":"move_update","data":{{"player":{player},"next_player":0,"action":"turn_end"}}}}"#)
}

#[allow(dead_code)]
pub const GAME_END_MSG: &str = r#"{"type":"game_end","data":{"winner":null}}"#;

#[allow(dead_code)]
pub fn drain_outgoing(state: &mut ClientState) -> Vec<ClientEvent> {
    std::iter::from_fn(|| state.next_outgoing_event()).collect()
}

#[allow(dead_code)]
pub fn started_game(my_player_id: PlayerId) -> ClientState {
    let mut state = ClientState::new();
    state.process_server_message(&game_start_msg(my_player_id)).unwrap();
    state
}
