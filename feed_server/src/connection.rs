//! WebSocket side of a feed connection.
//!
//! `handle_connection` performs the opening handshake, starts a `Session` and then pumps
//! its messages to the socket as JSON text frames until the client goes away. The
//! socket is polled with a short read timeout between sends so Close frames and dropped
//! peers are noticed even while the feed is quiet. Inbound data frames are discarded.

use std::io::ErrorKind;
use std::net::TcpStream;
use std::time::Duration;

use crossbeam_channel::{Receiver, select, unbounded};
use feed_common::{FeedError, Result, ServerMsg};
use log::{debug, info};
use tungstenite::{Message, WebSocket};

use crate::config::FeedConfig;
use crate::session::Session;

/// How long one wait for outbound messages or inbound frames may block.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Why the pump loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shutdown {
    /// The client closed the connection.
    ClientClosed,
    /// The session stopped producing messages.
    SessionEnded,
}

/// Serve one accepted TCP stream until the client disconnects.
///
/// Errors are returned to the caller for logging; they only ever end this connection.
pub fn handle_connection(stream: TcpStream, config: &FeedConfig) -> Result<()> {
    let peer = stream.peer_addr()?;
    let mut socket =
        tungstenite::accept(stream).map_err(|e| FeedError::Handshake(e.to_string()))?;
    socket.get_ref().set_read_timeout(Some(POLL_INTERVAL))?;
    info!("Connection accepted: {}", peer);

    let (outbound_tx, outbound_rx) = unbounded::<ServerMsg>();
    let mut session = Session::start(config, outbound_tx)?;
    let result = pump(&mut socket, &outbound_rx);
    session.close();

    if socket.close(None).is_ok() {
        let _ = socket.flush();
    }
    match &result {
        Ok(reason) => info!("Connection {} closed: {:?}", peer, reason),
        Err(e) => info!("Connection {} closed: {}", peer, e),
    }
    result.map(|_| ())
}

fn pump(socket: &mut WebSocket<TcpStream>, outbound: &Receiver<ServerMsg>) -> Result<Shutdown> {
    loop {
        select! {
            recv(outbound) -> msg => match msg {
                Ok(msg) => {
                    send(socket, &msg)?;
                    for msg in outbound.try_iter() {
                        send(socket, &msg)?;
                    }
                }
                Err(_) => return Ok(Shutdown::SessionEnded),
            },
            default(POLL_INTERVAL) => {}
        }

        match socket.read() {
            Ok(Message::Close(frame)) => {
                debug!("Close frame received: {:?}", frame);
                return Ok(Shutdown::ClientClosed);
            }
            Ok(_) => {}
            Err(tungstenite::Error::Io(e))
                if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {}
            Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                return Ok(Shutdown::ClientClosed);
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn send(socket: &mut WebSocket<TcpStream>, msg: &ServerMsg) -> Result<()> {
    let text = msg.to_json()?;
    debug!(
        "Sending {} contracts, {} quotes ({} bytes)",
        msg.contracts.len(),
        msg.quotes.len(),
        text.len()
    );
    socket.send(Message::text(text))?;
    Ok(())
}
