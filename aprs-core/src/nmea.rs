//! NMEA RMC fallback for payloads the APRS grammar cannot decode.
//!
//! Some trackers put raw GPS sentences in the information field. Only the
//! RMC layout is searched: `time, status, ddmm.mmmm, N/S, dddmm.mmmm, E/W`.

use crate::types::dm_to_degrees;

/// Latitude/longitude recovered from an RMC sentence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RmcFix {
    pub latitude: f64,
    pub longitude: f64,
}

/// Search `text` for the first RMC sentence with a readable position.
pub fn find_rmc(text: &str) -> Option<RmcFix> {
    for (idx, _) in text.match_indices('$') {
        let sentence = &text[idx + 1..];
        // Two-char talker id, then the sentence id.
        if sentence.get(2..6) != Some("RMC,") {
            continue;
        }
        if let Some(fix) = parse_rmc(sentence) {
            return Some(fix);
        }
    }
    None
}

fn parse_rmc(sentence: &str) -> Option<RmcFix> {
    let mut fields = sentence.split(',');
    let _id = fields.next()?;
    let _time = fields.next()?;
    let _status = fields.next()?;
    let lat_field = fields.next()?;
    let lat_hem = fields.next()?;
    let lon_field = fields.next()?;
    let lon_hem = fields.next()?;

    let latitude = dm_to_degrees(lat_field, 2)?;
    let longitude = dm_to_degrees(lon_field, 3)?;
    let latitude = match lat_hem {
        "N" => latitude,
        "S" => -latitude,
        _ => return None,
    };
    let longitude = match lon_hem {
        "E" => longitude,
        "W" => -longitude,
        _ => return None,
    };
    Some(RmcFix { latitude, longitude })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
