//! Shared types and error enums for aprs-core.

use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Errors from KISS frame validation and un-stuffing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("malformed KISS frame: too short or missing delimiters")]
    Malformed,
    #[error("unsupported KISS port/command byte: {0:#04x}")]
    UnsupportedPort(u8),
}

/// Errors from AX.25 address-field decoding.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("address list ends before destination and source are complete")]
    Truncated,
    #[error("frame ends before control, PID, and information field")]
    NoPayload,
}

/// Errors from APRS/NMEA payload interpretation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("no position found in payload")]
    NoPosition,
}

/// Errors from writing the KML output files. Non-fatal to the pipeline:
/// the ledger keeps its entries and the next acceptance rewrites the file.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("KML serialization failed: {0}")]
    Serialize(String),
}

// ---------------------------------------------------------------------------
// Decoded position types
// ---------------------------------------------------------------------------

/// A position recovered from one packet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
    /// Degrees, south negative.
    pub latitude: f64,
    /// Degrees, west negative.
    pub longitude: f64,
    /// Meters above sea level, when the packet carried one.
    pub altitude_m: Option<f64>,
    /// Originating station, when recoverable.
    pub from_callsign: Option<String>,
}

/// A position accepted into the ledger, stamped at accept time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackPoint {
    #[serde(flatten)]
    pub position: Position,
    pub timestamp: String,
}

// ---------------------------------------------------------------------------
// Coordinate helpers
// ---------------------------------------------------------------------------

/// Split a `dd[d]mm.mm` angle field into whole degrees plus decimal minutes.
///
/// `degree_digits` is 2 for latitude, 3 for longitude. Returns `None` when
/// either part fails to parse or the minutes are out of range.
pub fn dm_to_degrees(field: &str, degree_digits: usize) -> Option<f64> {
    if field.len() <= degree_digits || !field.is_ascii() {
        return None;
    }
    let degrees: f64 = field[..degree_digits].parse().ok()?;
    let minutes: f64 = field[degree_digits..].parse().ok()?;
    if !(0.0..60.0).contains(&minutes) {
        return None;
    }
    Some(degrees + minutes / 60.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dm_to_degrees_latitude() {
        let deg = dm_to_degrees("3348.8470", 2).unwrap();
        assert!((deg - 33.81412).abs() < 1e-4);
    }

    #[test]
    fn test_dm_to_degrees_longitude() {
        let deg = dm_to_degrees("11800.1685", 3).unwrap();
        assert!((deg - 118.00281).abs() < 1e-4);
    }

    #[test]
    fn test_dm_to_degrees_rejects_bad_fields() {
        assert!(dm_to_degrees("", 2).is_none());
        assert!(dm_to_degrees("33", 2).is_none()); // no minutes
        assert!(dm_to_degrees("3399.00", 2).is_none()); // minutes >= 60
        assert!(dm_to_degrees("ab12.34", 2).is_none());
    }
}
