//! Payload interpretation: structured APRS decode with NMEA fallback.
//!
//! The information field is decoded best-effort as text, recombined with
//! the routing header into a TNC2 packet, and handed to the APRS grammar.
//! When that fails, the raw body is searched for an RMC sentence and the
//! originating callsign falls back to the AX.25 source address.

use crate::aprs;
use crate::ax25::RoutingHeader;
use crate::nmea;
use crate::types::{PayloadError, Position};

/// Interpret one frame's information field against its routing header.
pub fn interpret(header: &RoutingHeader, payload: &[u8]) -> Result<Position, PayloadError> {
    let body = printable_text(payload);
    let packet = format!("{header}:{body}");

    match aprs::parse(&packet) {
        Ok(pos) => Ok(Position {
            latitude: pos.latitude,
            longitude: pos.longitude,
            altitude_m: pos.altitude_m,
            from_callsign: pos.from.or_else(|| Some(header.source.to_string())),
        }),
        Err(err) => {
            tracing::debug!("structured decode failed ({err}), trying NMEA fallback");
            let fix = nmea::find_rmc(&body).ok_or(PayloadError::NoPosition)?;
            Ok(Position {
                latitude: fix.latitude,
                longitude: fix.longitude,
                altitude_m: None,
                from_callsign: Some(header.source.to_string()),
            })
        }
    }
}

/// Best-effort text decode: undecodable bytes are replaced, control
/// characters dropped.
fn printable_text(payload: &[u8]) -> String {
    String::from_utf8_lossy(payload)
        .chars()
        .filter(|c| !c.is_control())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ax25;
    use crate::testutil::ax25_frame;

    fn header_for(source: &str, ssid: u8) -> RoutingHeader {
        let frame = ax25_frame(source, ssid, "APRS", &[], b"");
        ax25::decode(&frame).unwrap().0
    }

    #[test]
    fn test_structured_aprs_position() {
        let header = header_for("KK6GPV", 9);
        let pos = interpret(&header, b"!3722.55N/12159.14W-PHG2280/A=000123Test").unwrap();
        assert!((pos.latitude - 37.37583).abs() < 1e-4);
        assert!((pos.longitude - -121.98567).abs() < 1e-4);
        assert!((pos.altitude_m.unwrap() - 37.4904).abs() < 1e-3);
        assert_eq!(pos.from_callsign.as_deref(), Some("KK6GPV-9"));
    }

    #[test]
    fn test_nmea_fallback() {
        let header = header_for("N0CALL", 1);
        let pos = interpret(&header, b"$GPRMC,021851,A,3348.8470,N,11800.1685,W,,,,,*00").unwrap();
        assert!((pos.latitude - 33.81412).abs() < 1e-4);
        assert!((pos.longitude - -118.00281).abs() < 1e-4);
        assert!(pos.altitude_m.is_none());
        assert_eq!(pos.from_callsign.as_deref(), Some("N0CALL-1"));
    }

    #[test]
    fn test_no_position_anywhere() {
        let header = header_for("N0CALL", 0);
        assert_eq!(
            interpret(&header, b">just a status message"),
            Err(PayloadError::NoPosition)
        );
        assert_eq!(interpret(&header, b""), Err(PayloadError::NoPosition));
    }

    #[test]
    fn test_control_bytes_stripped() {
        let header = header_for("KK6GPV", 9);
        let pos = interpret(&header, b"!3722.55N/12159.14W-hi\r\n").unwrap();
        assert!((pos.latitude - 37.37583).abs() < 1e-4);
    }

    #[test]
    fn test_undecodable_bytes_are_not_fatal() {
        let header = header_for("KK6GPV", 9);
        let mut payload = b"!3722.55N/12159.14W-".to_vec();
        payload.extend_from_slice(&[0xFF, 0xFE]);
        assert!(interpret(&header, &payload).is_ok());
    }
}
