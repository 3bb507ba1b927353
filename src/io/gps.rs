//! Serial GPS watcher - continuous position observation
//!
//! Reads NMEA sentences from the configured serial device and feeds one
//! `PositionObserved` event per valid fix into the session queue, in
//! observation order. If the device cannot be opened or the stream ends, a
//! single `PositionLost` event is emitted and the watcher stops; there is no
//! automatic retry, recovery needs operator/environment action.

use crate::domain::types::{Coordinates, Position, SessionEvent};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};
use tokio_serial::SerialPortBuilderExt;
use tracing::{debug, info, warn};

pub struct GpsWatcher {
    device: String,
    baud: u32,
    event_tx: mpsc::Sender<SessionEvent>,
}

impl GpsWatcher {
    pub fn new(device: &str, baud: u32, event_tx: mpsc::Sender<SessionEvent>) -> Self {
        Self { device: device.to_string(), baud, event_tx }
    }

    /// Run until shutdown, the stream ends, or the device fails
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let port = match tokio_serial::new(&self.device, self.baud).open_native_async() {
            Ok(port) => port,
            Err(e) => {
                warn!(device = %self.device, error = %e, "gps_device_open_failed");
                self.position_lost(format!("cannot open {}: {e}", self.device)).await;
                return;
            }
        };

        info!(device = %self.device, baud = %self.baud, "gps_watcher_started");
        let mut lines = BufReader::new(port).lines();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    match line {
                        Ok(Some(line)) => {
                            if let Some(coordinates) = parse_sentence(&line) {
                                let position = Position::new(coordinates);
                                debug!(
                                    lat = %coordinates.latitude,
                                    lon = %coordinates.longitude,
                                    "position_fix"
                                );
                                if self
                                    .event_tx
                                    .send(SessionEvent::PositionObserved(position))
                                    .await
                                    .is_err()
                                {
                                    return;
                                }
                            }
                        }
                        Ok(None) => {
                            warn!(device = %self.device, "gps_stream_ended");
                            self.position_lost("position stream ended".to_string()).await;
                            return;
                        }
                        Err(e) => {
                            warn!(device = %self.device, error = %e, "gps_read_failed");
                            self.position_lost(format!("read error: {e}")).await;
                            return;
                        }
                    }
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("gps_watcher_stopped");
                        return;
                    }
                }
            }
        }
    }

    async fn position_lost(&self, reason: String) {
        let _ = self.event_tx.send(SessionEvent::PositionLost(reason)).await;
    }
}

/// Parse one NMEA sentence into coordinates, if it carries a valid fix.
///
/// Supported: `RMC` (status `A` only) and `GGA` (fix quality > 0). Anything
/// else, including checksum failures and void fixes, yields `None`.
pub fn parse_sentence(line: &str) -> Option<Coordinates> {
    let line = line.trim();
    if !checksum_ok(line) {
        return None;
    }

    let payload = line.strip_prefix('$')?.split('*').next()?;
    let fields: Vec<&str> = payload.split(',').collect();
    let kind = fields.first()?;

    if kind.ends_with("RMC") {
        // $xxRMC,time,status,lat,N/S,lon,E/W,...
        if fields.len() < 7 || fields[2] != "A" {
            return None;
        }
        let latitude = parse_coord(fields[3], fields[4])?;
        let longitude = parse_coord(fields[5], fields[6])?;
        Some(Coordinates::new(latitude, longitude))
    } else if kind.ends_with("GGA") {
        // $xxGGA,time,lat,N/S,lon,E/W,quality,...
        if fields.len() < 7 || matches!(fields[6], "" | "0") {
            return None;
        }
        let latitude = parse_coord(fields[2], fields[3])?;
        let longitude = parse_coord(fields[4], fields[5])?;
        Some(Coordinates::new(latitude, longitude))
    } else {
        None
    }
}

/// Validate the `*hh` XOR checksum
fn checksum_ok(line: &str) -> bool {
    let Some(body) = line.strip_prefix('$') else {
        return false;
    };
    let Some((payload, checksum)) = body.rsplit_once('*') else {
        return false;
    };
    let Ok(expected) = u8::from_str_radix(checksum.trim(), 16) else {
        return false;
    };

    let actual = payload.bytes().fold(0u8, |acc, b| acc ^ b);
    actual == expected
}

/// Convert NMEA `(d)ddmm.mmmm` plus hemisphere into signed decimal degrees
fn parse_coord(value: &str, hemisphere: &str) -> Option<f64> {
    let dot = value.find('.')?;
    if dot < 3 {
        return None;
    }

    // Byte-offset split; `get` rejects a split inside a multibyte character
    // instead of panicking on garbage that passed the checksum
    let degrees: f64 = value.get(..dot - 2)?.parse().ok()?;
    let minutes: f64 = value.get(dot - 2..)?.parse().ok()?;
    let decimal = degrees + minutes / 60.0;

    match hemisphere {
        "N" | "E" => Some(decimal),
        "S" | "W" => Some(-decimal),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Append a computed checksum so test payloads stay readable
    fn with_checksum(payload: &str) -> String {
        let sum = payload.bytes().fold(0u8, |acc, b| acc ^ b);
        format!("${payload}*{sum:02X}")
    }

    #[test]
    fn test_rmc_fix_parsed() {
        let line = "$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A";
        let coords = parse_sentence(line).unwrap();
        assert!((coords.latitude - 48.1173).abs() < 1e-4);
        assert!((coords.longitude - 11.516_666).abs() < 1e-4);
    }

    #[test]
    fn test_gga_fix_parsed() {
        let line = "$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47";
        let coords = parse_sentence(line).unwrap();
        assert!((coords.latitude - 48.1173).abs() < 1e-4);
    }

    #[test]
    fn test_void_rmc_skipped() {
        let line = with_checksum("GPRMC,123519,V,,,,,,,230394,,");
        assert!(parse_sentence(&line).is_none());
    }

    #[test]
    fn test_gga_without_fix_skipped() {
        let line = with_checksum("GPGGA,123519,4807.038,N,01131.000,E,0,00,,,M,,M,,");
        assert!(parse_sentence(&line).is_none());
    }

    #[test]
    fn test_bad_checksum_rejected() {
        let line = "$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*00";
        assert!(parse_sentence(line).is_none());
    }

    #[test]
    fn test_southern_western_hemispheres() {
        let line = with_checksum("GNRMC,052000,A,0602.298,S,08013.188,W,0.0,0.0,300826,,");
        let coords = parse_sentence(&line).unwrap();
        assert!(coords.latitude < 0.0);
        assert!(coords.longitude < 0.0);
    }

    #[test]
    fn test_unrelated_sentence_ignored() {
        let line = with_checksum("GPGSV,3,1,11,03,03,111,00,04,15,270,00,06,01,010,00,13,06,292,00");
        assert!(parse_sentence(&line).is_none());
    }

    #[test]
    fn test_multibyte_coordinate_field_rejected() {
        // Checksum-valid sentence with a multibyte character in the latitude
        // field must yield None, not panic on a non-boundary byte split
        let line = with_checksum("GPRMC,123519,A,é4.038,N,01131.000,E,022.4,084.4,230394,003.1,W");
        assert!(parse_sentence(&line).is_none());
        assert!(parse_coord("é4.038", "N").is_none());
    }

    #[test]
    fn test_parse_coord_longitude_three_digit_degrees() {
        let lon = parse_coord("08013.188", "W").unwrap();
        assert!((lon + 80.2198).abs() < 1e-3);
    }
}
