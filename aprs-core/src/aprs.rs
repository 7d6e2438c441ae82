//! APRS position-report grammar.
//!
//! Decodes the subset of the APRS application layer that carries a
//! position: uncompressed and compressed reports, with or without a
//! timestamp, plus the `/A=ffffff` altitude extension. Everything else
//! (Mic-E, status, telemetry, messages) is reported as unsupported so the
//! caller can try its NMEA fallback.

use serde::Serialize;
use thiserror::Error;

use crate::types::dm_to_degrees;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AprsError {
    #[error("packet has no header/body separator")]
    MissingBody,
    #[error("unsupported data type identifier: {0:?}")]
    Unsupported(char),
    #[error("position field is malformed")]
    BadPosition,
}

/// Fields extracted from one position-bearing packet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AprsPosition {
    pub from: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    /// Meters, converted from the feet of the `/A=` extension.
    pub altitude_m: Option<f64>,
}

const FEET_TO_METERS: f64 = 0.3048;

/// Chars of a DHM/HMS timestamp in `/` and `@` reports.
const TIMESTAMP_LEN: usize = 7;

/// Parse a TNC2-style textual packet (`SRC>DEST,PATH:body`).
pub fn parse(packet: &str) -> Result<AprsPosition, AprsError> {
    let (header, body) = packet.split_once(':').ok_or(AprsError::MissingBody)?;
    let from = header
        .split_once('>')
        .map(|(src, _)| src.trim())
        .filter(|src| !src.is_empty())
        .map(str::to_string);

    let mut chars = body.chars();
    let dti = chars.next().ok_or(AprsError::BadPosition)?;
    let rest = chars.as_str();
    let position = match dti {
        '!' | '=' => rest,
        // Timestamped reports carry a 7-char timestamp before the position.
        '/' | '@' => rest.get(TIMESTAMP_LEN..).ok_or(AprsError::BadPosition)?,
        other => return Err(AprsError::Unsupported(other)),
    };

    let (latitude, longitude) = parse_position(position)?;
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(AprsError::BadPosition);
    }

    Ok(AprsPosition {
        from,
        latitude,
        longitude,
        altitude_m: parse_altitude(body),
    })
}

// ---------------------------------------------------------------------------
// Coordinate fields
// ---------------------------------------------------------------------------

fn parse_position(s: &str) -> Result<(f64, f64), AprsError> {
    match s.chars().next() {
        Some(c) if c.is_ascii_digit() => parse_uncompressed(s),
        Some(_) => parse_compressed(s),
        None => Err(AprsError::BadPosition),
    }
}

/// `ddmm.mmN/dddmm.mmW` with a symbol-table char between the fields.
fn parse_uncompressed(s: &str) -> Result<(f64, f64), AprsError> {
    if !s.is_ascii() || s.len() < 18 {
        return Err(AprsError::BadPosition);
    }
    let bytes = s.as_bytes();

    let latitude = dm_to_degrees(&s[..7], 2).ok_or(AprsError::BadPosition)?;
    let latitude = match bytes[7] {
        b'N' => latitude,
        b'S' => -latitude,
        _ => return Err(AprsError::BadPosition),
    };

    let longitude = dm_to_degrees(&s[9..17], 3).ok_or(AprsError::BadPosition)?;
    let longitude = match bytes[17] {
        b'E' => longitude,
        b'W' => -longitude,
        _ => return Err(AprsError::BadPosition),
    };

    Ok((latitude, longitude))
}

/// Compressed format: symbol-table char, 4 base-91 latitude digits,
/// 4 base-91 longitude digits, symbol, compression bytes.
fn parse_compressed(s: &str) -> Result<(f64, f64), AprsError> {
    let bytes = s.as_bytes();
    if bytes.len() < 13 {
        return Err(AprsError::BadPosition);
    }
    if !matches!(bytes[0], b'/' | b'\\' | b'A'..=b'Z' | b'a'..=b'j') {
        return Err(AprsError::BadPosition);
    }

    let lat = base91(&bytes[1..5]).ok_or(AprsError::BadPosition)?;
    let lon = base91(&bytes[5..9]).ok_or(AprsError::BadPosition)?;
    Ok((
        90.0 - lat as f64 / 380926.0,
        -180.0 + lon as f64 / 190463.0,
    ))
}

fn base91(digits: &[u8]) -> Option<u32> {
    let mut value: u32 = 0;
    for &d in digits {
        if !(33..=124).contains(&d) {
            return None;
        }
        value = value * 91 + (d - 33) as u32;
    }
    Some(value)
}

/// `/A=ffffff` altitude extension: six chars of feet above sea level,
/// anywhere in the body.
fn parse_altitude(body: &str) -> Option<f64> {
    let at = body.find("/A=")?;
    let digits = body.get(at + 3..at + 9)?;
    let feet: f64 = digits.parse().ok()?;
    Some(feet * FEET_TO_METERS)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
