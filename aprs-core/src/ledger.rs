//! Append-only ledger of accepted positions.
//!
//! Grows monotonically for the lifetime of one run; cleared only when the
//! output is reset at startup. Entries are stamped at accept time, always
//! in UTC.

use chrono::Utc;

use crate::types::{Position, TrackPoint};

/// Timestamp rendering for ledger entries.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

#[derive(Debug, Default)]
pub struct Ledger {
    points: Vec<TrackPoint>,
}

impl Ledger {
    pub fn new() -> Self {
        Ledger { points: Vec::new() }
    }

    /// Append a position stamped with the current time.
    pub fn push(&mut self, position: Position) -> TrackPoint {
        let timestamp = Utc::now().format(TIMESTAMP_FORMAT).to_string();
        self.push_at(position, timestamp)
    }

    /// Append a position with an explicit timestamp.
    pub fn push_at(&mut self, position: Position, timestamp: String) -> TrackPoint {
        let point = TrackPoint {
            position,
            timestamp,
        };
        self.points.push(point.clone());
        point
    }

    /// All accepted positions, in insertion order.
    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Drop all entries. Only meaningful at process (re)start.
    pub fn clear(&mut self) {
        self.points.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn position(lat: f64) -> Position {
        Position {
            latitude: lat,
            longitude: -122.0,
            altitude_m: None,
            from_callsign: Some("N0CALL".into()),
        }
    }

    #[test]
    fn test_push_preserves_order() {
        let mut ledger = Ledger::new();
        ledger.push_at(position(1.0), "t1".into());
        ledger.push_at(position(2.0), "t2".into());
        ledger.push_at(position(3.0), "t3".into());

        assert_eq!(ledger.len(), 3);
        let lats: Vec<f64> = ledger.points().iter().map(|p| p.position.latitude).collect();
        assert_eq!(lats, vec![1.0, 2.0, 3.0]);
        assert_eq!(ledger.points()[1].timestamp, "t2");
    }

    #[test]
    fn test_push_stamps_timestamp() {
        let mut ledger = Ledger::new();
        let point = ledger.push(position(1.0));
        assert!(point.timestamp.ends_with("UTC"));
        assert!(!point.timestamp.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut ledger = Ledger::new();
        ledger.push_at(position(1.0), "t".into());
        assert!(!ledger.is_empty());
        ledger.clear();
        assert!(ledger.is_empty());
    }
}
