use std::fmt;
use std::io;
use std::net::TcpStream;

use log::debug;
use serde::Serialize;
use tungstenite::protocol::Role;
use tungstenite::{Message, WebSocket};


#[derive(Debug)]
pub enum CommunicationError {
    Socket(tungstenite::Error),
    Serde(serde_json::Error),
    // A frame the protocol doesn't use, e.g. binary data. Not fatal.
    UnexpectedMessage(String),
    ConnectionClosed,
}

impl fmt::Display for CommunicationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CommunicationError::Socket(err) => write!(f, "socket error: {err}"),
            CommunicationError::Serde(err) => write!(f, "serialization error: {err}"),
            CommunicationError::UnexpectedMessage(msg) => write!(f, "unexpected message: {msg}"),
            CommunicationError::ConnectionClosed => write!(f, "connection closed"),
        }
    }
}

impl std::error::Error for CommunicationError {}

fn from_socket_error(err: tungstenite::Error) -> CommunicationError {
    match err {
        tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
            CommunicationError::ConnectionClosed
        }
        err => CommunicationError::Socket(err),
    }
}

pub fn write_obj<T, S>(socket: &mut WebSocket<S>, obj: &T) -> Result<(), CommunicationError>
where
    T: Serialize,
    S: io::Read + io::Write,
{
    let serialized = serde_json::to_string(obj).map_err(CommunicationError::Serde)?;
    debug!("send: {serialized}");
    socket.send(Message::text(serialized)).map_err(from_socket_error)
}

// Returns the next text frame. Control frames are handled by `tungstenite` and skipped here.
// Parsing is left to the caller: a malformed payload must not be confused with a broken socket.
pub fn read_text<S>(socket: &mut WebSocket<S>) -> Result<String, CommunicationError>
where
    S: io::Read + io::Write,
{
    loop {
        match socket.read().map_err(from_socket_error)? {
            Message::Text(text) => {
                debug!("received: {}", text.as_str());
                return Ok(text.as_str().to_owned());
            }
            Message::Close(_) => return Err(CommunicationError::ConnectionClosed),
            Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
            msg @ Message::Binary(_) => {
                return Err(CommunicationError::UnexpectedMessage(format!(
                    "expected text, got {msg:?}"
                )));
            }
        }
    }
}

pub fn close<S>(socket: &mut WebSocket<S>) -> Result<(), CommunicationError>
where
    S: io::Read + io::Write,
{
    match socket.close(None).map_err(from_socket_error) {
        Err(CommunicationError::ConnectionClosed) => Ok(()),
        result => result,
    }
}

// Improvement potential: Instead of cloning the socket, consider calling
//   `TcpStream::set_nonblocking` on the underlying stream and doing reads and writes in the
//   same thread.
pub fn clone_websocket(socket: &WebSocket<TcpStream>, role: Role) -> io::Result<WebSocket<TcpStream>> {
    let stream = socket.get_ref().try_clone()?;
    let config = socket.get_config().clone();
    Ok(WebSocket::from_raw_socket(stream, role, Some(config)))
}
