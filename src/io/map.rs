//! Map bridge - typed command channel and JSONL publisher
//!
//! The map front-end is an external collaborator: the core drives it through
//! a stream of commands and receives nothing back. Commands flow through a
//! bounded channel (non-blocking `try_send` on the session's hot path) into a
//! publisher task that writes one JSON object per line to the bridge file,
//! which the front-end tails.

use crate::domain::types::{Coordinates, Location, Position, RouteHandle};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

/// Severity of an operator-visible message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Warn,
}

/// Commands consumed by the map front-end
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum MapCommand {
    /// Register a catalog location as a marker
    AddMarker { id: i64, name: String, contact: String, lat: f64, lon: f64 },
    /// Move (or create) the current-position indicator
    ShowPosition { lat: f64, lon: f64, ts: u64 },
    /// Render a route control through the given waypoints
    SetRoute { handle: RouteHandle, waypoints: Vec<[f64; 2]>, geometry: String },
    /// Remove a previously rendered route control
    RemoveRoute { handle: RouteHandle },
    /// Re-center the view
    SetViewCenter { lat: f64, lon: f64, zoom: u8 },
    /// Update the distance/duration metrics display (`None` clears it)
    SetMetrics { distance: Option<String>, duration: Option<String> },
    /// Operator-visible message (alert surface)
    UserMessage { level: MessageLevel, text: String },
}

impl MapCommand {
    pub fn marker(location: &Location) -> Self {
        MapCommand::AddMarker {
            id: location.id.0,
            name: location.name.clone(),
            contact: location.contact.clone(),
            lat: location.coordinates.latitude,
            lon: location.coordinates.longitude,
        }
    }

    pub fn position(position: &Position) -> Self {
        MapCommand::ShowPosition {
            lat: position.coordinates.latitude,
            lon: position.coordinates.longitude,
            ts: position.observed_at,
        }
    }

    pub fn route(handle: RouteHandle, waypoints: &[Coordinates], geometry: &str) -> Self {
        MapCommand::SetRoute {
            handle,
            waypoints: waypoints.iter().map(|c| [c.latitude, c.longitude]).collect(),
            geometry: geometry.to_string(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        MapCommand::UserMessage { level: MessageLevel::Info, text: text.into() }
    }

    pub fn warn(text: impl Into<String>) -> Self {
        MapCommand::UserMessage { level: MessageLevel::Warn, text: text.into() }
    }
}

/// Non-blocking sender handed to the session.
///
/// Map rendering is best-effort: if the bridge channel is full the command is
/// dropped with a warning, session state stays authoritative.
#[derive(Clone)]
pub struct MapCommandSender {
    tx: mpsc::Sender<MapCommand>,
}

impl MapCommandSender {
    pub fn send(&self, command: MapCommand) {
        if let Err(e) = self.tx.try_send(command) {
            warn!(error = %e, "map_command_dropped");
        }
    }
}

/// Create the map command channel
pub fn create_map_channel(buffer: usize) -> (MapCommandSender, mpsc::Receiver<MapCommand>) {
    let (tx, rx) = mpsc::channel(buffer);
    (MapCommandSender { tx }, rx)
}

/// Publisher task that drains the command channel into the bridge file
pub struct MapPublisher {
    file_path: String,
    rx: mpsc::Receiver<MapCommand>,
}

impl MapPublisher {
    pub fn new(file_path: &str, rx: mpsc::Receiver<MapCommand>) -> Self {
        info!(file_path = %file_path, "map_publisher_initialized");
        Self { file_path: file_path.to_string(), rx }
    }

    /// Run until shutdown or the channel closes
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        loop {
            tokio::select! {
                command = self.rx.recv() => {
                    match command {
                        Some(command) => self.publish(&command),
                        None => break,
                    }
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("map_publisher_stopped");
    }

    fn publish(&self, command: &MapCommand) {
        let line = match serde_json::to_string(command) {
            Ok(line) => line,
            Err(e) => {
                error!(error = %e, "map_command_serialize_failed");
                return;
            }
        };

        if let Err(e) = self.append_line(&line) {
            error!(file = %self.file_path, error = %e, "map_command_write_failed");
        } else {
            debug!(file = %self.file_path, bytes = %line.len(), "map_command_published");
        }
    }

    fn append_line(&self, line: &str) -> std::io::Result<()> {
        let path = Path::new(&self.file_path);

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }
}
