//! Shared networking constants and helpers used by client and server.

/// TCP port the feed server listens on for WebSocket upgrades.
pub const FEED_PORT: u16 = 8080;

/// Helper to format an address with a port like "ip:port".
pub fn addr(ip: &str, port: u16) -> String {
    format!("{}:{}", ip, port)
}

/// Helper to build a plain `ws://` URL for the given host and port.
pub fn ws_url(host: &str, port: u16) -> String {
    format!("ws://{}", addr(host, port))
}
