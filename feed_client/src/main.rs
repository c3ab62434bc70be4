//! Feed Client: connects to the feed server over WebSocket, mirrors the announced
//! contracts locally and checks every message against that mirror. Quotes for unknown
//! contracts and recycled ids are logged as anomalies; a summary is logged periodically.
//!
//! Usage example (CLI):
//! ```bash
//! feed_client --server-url ws://192.168.0.10:8080 --report-interval-secs 10
//! ```
#![warn(missing_docs)]
mod args;
mod model;

use crate::args::Args;
use crate::model::contract_book::ContractBook;
use clap::Parser;
use feed_common::{FeedError, Result, ServerMsg};
use log::{debug, info, warn};
use std::io::ErrorKind;
use std::net::TcpStream;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::{Duration, Instant};
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket};

/// Upper bound on a blocking read, so Ctrl+C is noticed while the feed is quiet.
const READ_TIMEOUT: Duration = Duration::from_millis(500);

/// Runs a blocking loop that receives `ServerMsg` frames from `socket` and applies them
/// to a local `ContractBook` until the server closes or `shutdown` is raised.
fn start_receiver_loop(
    socket: &mut WebSocket<MaybeTlsStream<TcpStream>>,
    shutdown: Arc<AtomicBool>,
    report_interval: Duration,
) -> Result<ContractBook> {
    let mut book = ContractBook::new();
    let mut last_report = Instant::now();

    while !shutdown.load(Ordering::Relaxed) {
        match socket.read() {
            Ok(Message::Text(text)) => match ServerMsg::from_json(text.as_str()) {
                Ok(msg) => {
                    for anomaly in book.apply(&msg) {
                        warn!("Feed anomaly: {:?}", anomaly);
                    }
                }
                Err(e) => debug!("Received non-feed message: {}", e),
            },
            Ok(Message::Close(frame)) => {
                info!("Server closed the feed: {:?}", frame);
                break;
            }
            Ok(_) => {}
            Err(tungstenite::Error::Io(e))
                if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {}
            Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => break,
            Err(e) => return Err(e.into()),
        }

        if last_report.elapsed() >= report_interval {
            report(&book);
            last_report = Instant::now();
        }
    }
    info!("Receiver loop stopping...");
    Ok(book)
}

fn report(book: &ContractBook) {
    let stats = book.stats();
    info!(
        "Live contracts={} Retired={} Messages={} Deltas={} Quotes={} Anomalies={}",
        book.len(),
        book.retired_len(),
        stats.messages,
        stats.contract_deltas,
        stats.quotes,
        stats.anomalies
    );
    if let Some((id, state)) = book.busiest() {
        info!(
            "Busiest: {} ({}) Quotes={} Last={:?}",
            id,
            state.name.as_deref().unwrap_or("-"),
            state.quotes,
            state.last_quote
        );
    }
}

fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();
    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || {
            info!("Ctrl+C received. Shutting down client...");
            shutdown.store(true, Ordering::SeqCst);
        })
        .map_err(|e| FeedError::Format(format!("Error setting Ctrl+C handler: {}", e)))?;
    }

    info!("Connecting to feed server at {}", args.server_url);
    let (mut socket, _response) = tungstenite::connect(args.server_url.as_str())?;
    if let MaybeTlsStream::Plain(stream) = socket.get_ref() {
        stream.set_read_timeout(Some(READ_TIMEOUT))?;
    }
    info!("Client is running. Press Ctrl+C to exit.");

    let book = start_receiver_loop(
        &mut socket,
        shutdown,
        Duration::from_secs(args.report_interval_secs),
    )?;
    if socket.close(None).is_ok() {
        let _ = socket.flush();
    }
    report(&book);
    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
