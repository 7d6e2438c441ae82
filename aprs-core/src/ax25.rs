//! AX.25 address-field decoding.
//!
//! Each station address occupies 7 bytes: six callsign characters stored
//! shifted left one bit, then an SSID byte carrying the sub-station id in
//! bits 1-4 and the end-of-addresses flag in bit 0. On the wire the order
//! is destination, source, then the digipeater path.

use std::fmt;

use serde::Serialize;

use crate::types::AddressError;

/// Protocol maximum number of station addresses in one frame.
const MAX_ADDRESSES: usize = 8;

/// Width of one encoded address field.
const ADDRESS_LEN: usize = 7;

/// Control + PID bytes between the address field and the information field.
const CONTROL_PID_LEN: usize = 2;

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// One decoded station address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Address {
    /// Callsign, right-trimmed of padding spaces.
    pub callsign: String,
    /// Sub-station id, 0-15.
    pub ssid: u8,
    /// End-of-addresses flag.
    pub last: bool,
}

impl Address {
    fn from_field(field: &[u8]) -> Address {
        let callsign: String = field[..6].iter().map(|&b| ((b >> 1) & 0x7F) as char).collect();
        Address {
            callsign: callsign.trim_end().to_string(),
            ssid: (field[6] >> 1) & 0x0F,
            last: field[6] & 0x01 != 0,
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ssid != 0 {
            write!(f, "{}-{}", self.callsign, self.ssid)
        } else {
            write!(f, "{}", self.callsign)
        }
    }
}

// ---------------------------------------------------------------------------
// RoutingHeader
// ---------------------------------------------------------------------------

/// Decoded routing header: who sent the frame, to what, via which path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutingHeader {
    pub destination: Address,
    pub source: Address,
    pub digipeaters: Vec<Address>,
}

impl fmt::Display for RoutingHeader {
    /// TNC2-style rendering: `SOURCE>DEST,DIGI1,DIGI2`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}>{}", self.source, self.destination)?;
        for digi in &self.digipeaters {
            write!(f, ",{digi}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode the address field of a link frame, returning the routing header
/// and the information field that follows control and PID.
pub fn decode(frame: &[u8]) -> Result<(RoutingHeader, &[u8]), AddressError> {
    let mut addresses = Vec::new();
    let mut offset = 0;

    while addresses.len() < MAX_ADDRESSES {
        let Some(field) = frame.get(offset..offset + ADDRESS_LEN) else {
            return Err(AddressError::Truncated);
        };
        let address = Address::from_field(field);
        let last = address.last;
        addresses.push(address);
        offset += ADDRESS_LEN;
        if last {
            break;
        }
    }

    // A valid frame needs destination + source, and the list must have
    // actually terminated.
    if addresses.len() < 2 || !addresses.last().is_some_and(|a| a.last) {
        return Err(AddressError::Truncated);
    }

    let Some(payload) = frame.get(offset + CONTROL_PID_LEN..) else {
        return Err(AddressError::NoPayload);
    };

    let mut iter = addresses.into_iter();
    let (Some(destination), Some(source)) = (iter.next(), iter.next()) else {
        return Err(AddressError::Truncated);
    };
    Ok((
        RoutingHeader {
            destination,
            source,
            digipeaters: iter.collect(),
        },
        payload,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
