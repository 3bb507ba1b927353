//! Operator control listener
//!
//! Line-oriented TCP surface for the operator input field and buttons:
//!
//! - `route <comma-separated ids>` - set the selection (empty list clears)
//! - `clear` - clear the selection
//! - `recenter` - re-center the view on the current position
//! - `navigate` - start navigation on the active route
//!
//! Each line becomes one session event; unknown lines are logged and ignored.

use crate::domain::types::SessionEvent;
use std::net::SocketAddr;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

/// Control listener configuration
#[derive(Debug, Clone)]
pub struct ControlListenerConfig {
    pub port: u16,
    pub enabled: bool,
}

impl Default for ControlListenerConfig {
    fn default() -> Self {
        Self { port: 25801, enabled: true }
    }
}

/// Parse one control line into a session event
pub fn parse_command(line: &str) -> Option<SessionEvent> {
    let line = line.trim();

    if let Some(rest) = line.strip_prefix("route") {
        // "route" alone or "route <ids>"; anything after the keyword is the
        // raw selection text, validated later against the catalog
        if rest.is_empty() || rest.starts_with(' ') {
            return Some(SessionEvent::SelectionChanged(rest.trim().to_string()));
        }
        return None;
    }

    match line {
        "clear" => Some(SessionEvent::SelectionChanged(String::new())),
        "recenter" => Some(SessionEvent::Recenter),
        "navigate" => Some(SessionEvent::Navigate),
        _ => None,
    }
}

/// Start the operator control TCP listener
pub async fn start_control_listener(
    config: ControlListenerConfig,
    event_tx: mpsc::Sender<SessionEvent>,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if !config.enabled {
        info!("control_listener_disabled");
        return Ok(());
    }

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;

    info!(port = %config.port, "control_listener_started");

    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    info!("control_listener_shutdown");
                    return Ok(());
                }
            }
            result = listener.accept() => {
                match result {
                    Ok((socket, addr)) => {
                        let tx = event_tx.clone();
                        tokio::spawn(async move {
                            handle_control_connection(socket, addr, tx).await;
                        });
                    }
                    Err(e) => {
                        error!(error = %e, "control_listener_accept_failed");
                    }
                }
            }
        }
    }
}

async fn handle_control_connection(
    socket: tokio::net::TcpStream,
    addr: SocketAddr,
    event_tx: mpsc::Sender<SessionEvent>,
) {
    let peer = addr.to_string();
    debug!(peer = %peer, "control_connection_accepted");

    let reader = BufReader::new(socket);
    let mut lines = reader.lines();

    while let Ok(Some(line)) = lines.next_line().await {
        let Some(event) = parse_command(&line) else {
            if !line.trim().is_empty() {
                debug!(peer = %peer, line = %line.trim(), "control_unknown_command");
            }
            continue;
        };

        match event_tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!(peer = %peer, "control_command_dropped: channel full");
            }
            Err(TrySendError::Closed(_)) => {
                warn!(peer = %peer, "control_command_channel_closed");
                return;
            }
        }
    }

    debug!(peer = %peer, "control_connection_closed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_route_command() {
        match parse_command("route 2, 2, x, 5, 1") {
            Some(SessionEvent::SelectionChanged(raw)) => assert_eq!(raw, "2, 2, x, 5, 1"),
            other => panic!("unexpected parse: {other:?}"),
        }
    }

    #[test]
    fn test_parse_route_without_ids_clears() {
        match parse_command("route") {
            Some(SessionEvent::SelectionChanged(raw)) => assert!(raw.is_empty()),
            other => panic!("unexpected parse: {other:?}"),
        }
        match parse_command("clear") {
            Some(SessionEvent::SelectionChanged(raw)) => assert!(raw.is_empty()),
            other => panic!("unexpected parse: {other:?}"),
        }
    }

    #[test]
    fn test_parse_buttons() {
        assert!(matches!(parse_command("recenter"), Some(SessionEvent::Recenter)));
        assert!(matches!(parse_command(" navigate \n"), Some(SessionEvent::Navigate)));
    }

    #[test]
    fn test_unknown_lines_ignored() {
        assert!(parse_command("").is_none());
        assert!(parse_command("reroute 1,2").is_none());
        assert!(parse_command("routes 1").is_none());
        assert!(parse_command("open sesame").is_none());
    }
}
