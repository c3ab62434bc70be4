//! WebSocket integration tests
//!
//! Runs a real listener on loopback and checks what a client observes on the wire.

use std::collections::HashSet;
use std::net::TcpStream;
use std::thread;
use std::time::{Duration, Instant};

use feed_common::ServerMsg;
use feed_server::{FeedConfig, FeedListener};
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket};

type Client = WebSocket<MaybeTlsStream<TcpStream>>;

// ============================================================================
// Test Fixtures
// ============================================================================

fn start_server(config: FeedConfig) -> String {
    let listener = FeedListener::bind("127.0.0.1:0", config).unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || listener.serve());
    format!("ws://{}", addr)
}

fn connect(url: &str) -> Client {
    let (socket, _response) = tungstenite::connect(url).expect("Failed to connect");
    if let MaybeTlsStream::Plain(stream) = socket.get_ref() {
        stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    }
    socket
}

fn next_msg(socket: &mut Client) -> ServerMsg {
    loop {
        match socket.read().expect("Failed to read frame") {
            Message::Text(text) => return ServerMsg::from_json(text.as_str()).unwrap(),
            _ => continue,
        }
    }
}

fn quiet(initial_contracts: usize) -> FeedConfig {
    FeedConfig {
        initial_contracts,
        max_contracts: initial_contracts + 100,
        contract_interval: Duration::from_secs(3600),
        quote_interval: Duration::from_secs(3600),
        ..FeedConfig::default()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn first_frame_is_the_bootstrap_snapshot() {
    let url = start_server(quiet(120));
    let mut socket = connect(&url);

    let snapshot = next_msg(&mut socket);

    assert_eq!(snapshot.contracts.len(), 120);
    assert!(snapshot.quotes.is_empty());
    let ids: HashSet<_> = snapshot.contracts.iter().map(|c| c.id.clone()).collect();
    assert_eq!(ids.len(), 120);
    for contract in &snapshot.contracts {
        assert_eq!(contract.name, Some(format!("Contract {}", contract.id)));
        assert_eq!(contract.removed, None);
    }

    socket.close(None).unwrap();
}

#[test]
fn streamed_updates_stay_consistent() {
    let url = start_server(FeedConfig {
        initial_contracts: 200,
        max_contracts: 260,
        contract_interval: Duration::from_millis(10),
        quote_interval: Duration::from_millis(5),
        ..FeedConfig::default()
    });
    let mut socket = connect(&url);

    let mut live: HashSet<String> = next_msg(&mut socket)
        .contracts
        .into_iter()
        .map(|c| c.id)
        .collect();
    let mut retired = HashSet::new();
    let mut quotes = 0usize;

    let deadline = Instant::now() + Duration::from_millis(800);
    while Instant::now() < deadline {
        let msg = next_msg(&mut socket);
        assert!(!msg.is_empty());
        for contract in msg.contracts {
            assert!(!retired.contains(&contract.id), "retired id {} came back", contract.id);
            if contract.is_removed() {
                assert!(contract.name.is_none());
                assert!(live.remove(&contract.id), "removed unknown id {}", contract.id);
                retired.insert(contract.id);
            } else {
                assert!(contract.name.is_some());
                live.insert(contract.id);
            }
            assert!(live.len() <= 260);
        }
        for quote in msg.quotes {
            assert!(live.contains(&quote.contract_id), "orphan quote for {}", quote.contract_id);
            assert!(quote.quote.volume >= 1);
            quotes += 1;
        }
    }

    assert!(quotes > 0);
    socket.close(None).unwrap();
}

#[test]
fn each_connection_gets_its_own_population() {
    let url = start_server(quiet(30));

    let mut first = connect(&url);
    let first_ids: HashSet<_> = next_msg(&mut first)
        .contracts
        .into_iter()
        .map(|c| c.id)
        .collect();
    first.close(None).unwrap();
    drop(first);

    let mut second = connect(&url);
    let second_ids: HashSet<_> = next_msg(&mut second)
        .contracts
        .into_iter()
        .map(|c| c.id)
        .collect();

    assert_eq!(second_ids.len(), 30);
    assert!(first_ids.is_disjoint(&second_ids));
    second.close(None).unwrap();
}
