//! TCP accept loop handing each WebSocket client its own session.

use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use std::thread;

use feed_common::Result;
use log::{error, info, warn};

use crate::config::FeedConfig;
use crate::connection::handle_connection;

/// TCP listener that accepts WebSocket clients and gives each its own feed session.
///
/// Every accepted stream is served on a dedicated thread, so a failing or slow client
/// never stops the accept loop or affects other clients.
pub struct FeedListener {
    /// The underlying TCP listening socket.
    pub(crate) socket: TcpListener,
    config: Arc<FeedConfig>,
}

impl FeedListener {
    /// Validate `config` and bind to `bind_addr` (e.g., `0.0.0.0:8080`).
    pub fn bind(bind_addr: &str, config: FeedConfig) -> Result<Self> {
        config.validate()?;
        let socket = TcpListener::bind(bind_addr)?;
        Ok(Self {
            socket,
            config: Arc::new(config),
        })
    }

    /// Address actually bound, useful when binding to port 0.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Blocking accept loop.
    pub fn serve(self) -> Result<()> {
        info!("Feed server is listening on {}", self.socket.local_addr()?);

        for stream in self.socket.incoming() {
            match stream {
                Ok(stream) => {
                    let config = Arc::clone(&self.config);
                    let spawned = thread::Builder::new()
                        .name("feed-connection".to_string())
                        .spawn(move || {
                            if let Err(e) = handle_connection(stream, &config) {
                                warn!("Connection error: {}", e);
                            }
                        });
                    if let Err(e) = spawned {
                        error!("Failed to spawn connection thread: {}", e);
                    }
                }
                Err(e) => error!("TCP connection error: {}", e),
            }
        }
        Ok(())
    }
}
