//! Test-only encoders for building KISS/AX.25 byte streams.

use crate::kiss;

/// Encode one 7-byte AX.25 address field.
pub(crate) fn ax25_address(callsign: &str, ssid: u8, last: bool) -> [u8; 7] {
    let mut field = [b' ' << 1; 7];
    for (i, b) in callsign.bytes().take(6).enumerate() {
        field[i] = b << 1;
    }
    field[6] = (ssid << 1) | u8::from(last);
    field
}

/// Build a UI frame: destination, source, digipeater path, control/PID,
/// information field.
pub(crate) fn ax25_frame(
    source: &str,
    source_ssid: u8,
    destination: &str,
    digipeaters: &[(&str, u8)],
    payload: &[u8],
) -> Vec<u8> {
    let mut frame = Vec::new();
    frame.extend_from_slice(&ax25_address(destination, 0, false));
    frame.extend_from_slice(&ax25_address(source, source_ssid, digipeaters.is_empty()));
    for (idx, (digi, ssid)) in digipeaters.iter().enumerate() {
        frame.extend_from_slice(&ax25_address(digi, *ssid, idx == digipeaters.len() - 1));
    }
    frame.extend_from_slice(&[0x03, 0xF0]); // UI control, no layer-3 PID
    frame.extend_from_slice(payload);
    frame
}

/// Wrap a link frame in KISS delimiters with a port-0 data command byte.
pub(crate) fn kiss_frame(link: &[u8]) -> Vec<u8> {
    let mut out = vec![kiss::FEND, 0x00];
    out.extend_from_slice(&kiss::stuff(link));
    out.push(kiss::FEND);
    out
}
