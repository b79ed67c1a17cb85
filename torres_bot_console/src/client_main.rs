use std::net::TcpStream;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, anyhow, bail};
use log::{error, info, warn};
use tungstenite::protocol;
use url::Url;

use torres_bot::client::{ClientState, EventError, NotableEvent, TickOutcome};

use crate::network::{self, CommunicationError};


pub const DEFAULT_SERVER_ADDRESS: &str = "ws://localhost:3000/";

pub struct ClientConfig {
    pub server_address: String,
    pub tick_interval: Duration,
    pub join_game: bool,
}

enum IncomingEvent {
    Network(String),
    Disconnected,
    Tick,
}

fn log_notable_event(state: &ClientState, event: NotableEvent) {
    match event {
        NotableEvent::None => {}
        NotableEvent::GameStarted { my_player_id } => {
            info!("Game started, my player id is {my_player_id}, {}", state.phase());
        }
        NotableEvent::GameOver => info!("Game over"),
        NotableEvent::MyTurn => info!("My turn"),
        NotableEvent::OpponentTurn => info!("Opponent's turn"),
        NotableEvent::OtherMove { action, player } => match player {
            Some(player) => info!("Player {player} made move '{action}'"),
            None => info!("Move '{action}' made"),
        },
        NotableEvent::MoveRejected => warn!("Server rejected my move"),
        NotableEvent::PlayerConnected(id) => info!("Player {id} connected"),
        NotableEvent::PlayerDisconnected(id) => info!("Player {id} disconnected"),
    }
}

fn connect(server_address: &str) -> anyhow::Result<tungstenite::WebSocket<TcpStream>> {
    let url = Url::parse(server_address)
        .with_context(|| format!("Invalid server address '{server_address}'"))?;
    if url.scheme() != "ws" {
        bail!("Unsupported scheme '{}', expected 'ws'", url.scheme());
    }
    let server_addr = url
        .socket_addrs(|| Some(80))
        .with_context(|| format!("Cannot resolve {url}"))?;
    info!("Connecting to {url}...");
    let stream =
        TcpStream::connect(&server_addr[..]).with_context(|| format!("Cannot connect to {url}"))?;
    let (socket, _) = tungstenite::client(url.as_str(), stream)
        .map_err(|err| anyhow!("WebSocket handshake with {url} failed: {err}"))?;
    Ok(socket)
}

// Runs until the game is over or the server closes the connection. Connection failures are
// returned as errors; problems with individual messages are only logged.
pub fn run(config: ClientConfig) -> anyhow::Result<()> {
    let mut socket_in = connect(&config.server_address)?;
    let mut socket_out = network::clone_websocket(&socket_in, protocol::Role::Client)
        .context("Cannot clone server connection")?;
    info!("Connected");

    let (tx, rx) = mpsc::channel();
    let tx_net = tx.clone();
    let tx_tick = tx;
    thread::spawn(move || {
        loop {
            match network::read_text(&mut socket_in) {
                Ok(raw) => {
                    if tx_net.send(IncomingEvent::Network(raw)).is_err() {
                        break;
                    }
                }
                Err(CommunicationError::UnexpectedMessage(msg)) => {
                    warn!("Discarding message: {msg}");
                }
                Err(err) => {
                    if !matches!(err, CommunicationError::ConnectionClosed) {
                        error!("Read error: {err}");
                    }
                    let _ = tx_net.send(IncomingEvent::Disconnected);
                    break;
                }
            }
        }
    });
    // The turn loop. Stops once the event loop drops the receiver.
    let tick_interval = config.tick_interval;
    thread::spawn(move || {
        loop {
            thread::sleep(tick_interval);
            if tx_tick.send(IncomingEvent::Tick).is_err() {
                break;
            }
        }
    });

    let (server_tx, server_rx) = mpsc::channel();
    let writer = thread::spawn(move || -> Result<(), CommunicationError> {
        for event in server_rx {
            network::write_obj(&mut socket_out, &event)?;
        }
        network::close(&mut socket_out)
    });

    let mut state = ClientState::new();
    if config.join_game {
        state.join();
    }
    'event_loop: loop {
        while let Some(event) = state.next_outgoing_event() {
            if server_tx.send(event).is_err() {
                warn!("Cannot send to server: connection is broken");
                break 'event_loop;
            }
        }
        // Senders live as long as the helper threads, so this only fails if both are gone.
        let Ok(event) = rx.recv() else {
            break;
        };
        match event {
            IncomingEvent::Network(raw) => match state.process_server_message(&raw) {
                Ok(event) => log_notable_event(&state, event),
                Err(EventError::Parse(err)) => warn!("Cannot parse message: {err}"),
                Err(EventError::ServerReturnedError(message)) => {
                    error!("Got error from server: {message}")
                }
            },
            IncomingEvent::Tick => match state.tick() {
                TickOutcome::WaitingForGame | TickOutcome::Idle | TickOutcome::TurnEnded => {}
                TickOutcome::Finished => {
                    info!("Game is over, closing connection");
                    break;
                }
            },
            IncomingEvent::Disconnected => {
                info!("Connection closed by server");
                break;
            }
        }
    }

    std::mem::drop(server_tx);
    match writer.join() {
        Ok(Ok(())) => {}
        Ok(Err(err)) => warn!("Error while talking to server: {err}"),
        Err(_) => bail!("Writer thread panicked"),
    }
    Ok(())
}
