//! Callsign-based acceptance filter.

/// Accepts or rejects decoded positions against a configured station.
///
/// Comparison ignores `-SSID` suffixes and case on both sides. With no
/// configured target every position passes.
#[derive(Debug, Clone, Default)]
pub struct CallsignFilter {
    target: Option<String>,
}

impl CallsignFilter {
    /// Build a filter from the configured callsign, if any.
    pub fn new(target: Option<&str>) -> Self {
        CallsignFilter {
            target: target
                .map(|t| base_callsign(t).to_ascii_uppercase())
                .filter(|t| !t.is_empty()),
        }
    }

    /// True when no target is configured and everything passes.
    pub fn is_open(&self) -> bool {
        self.target.is_none()
    }

    /// Whether a position from `origin` should be accepted.
    pub fn accepts(&self, origin: Option<&str>) -> bool {
        match (&self.target, origin) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(target), Some(origin)) => base_callsign(origin).eq_ignore_ascii_case(target),
        }
    }
}

/// Strip an `-SSID` suffix: `KD2CIF-1` becomes `KD2CIF`.
pub fn base_callsign(callsign: &str) -> &str {
    callsign.split_once('-').map_or(callsign, |(base, _)| base)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_matching_base_callsign() {
        let filter = CallsignFilter::new(Some("KD2CIF"));
        assert!(filter.accepts(Some("KD2CIF-1")));
        assert!(filter.accepts(Some("KD2CIF")));
        assert!(!filter.accepts(Some("N0CALL-1")));
    }

    #[test]
    fn test_case_insensitive() {
        let filter = CallsignFilter::new(Some("kd2cif"));
        assert!(filter.accepts(Some("KD2CIF-7")));
    }

    #[test]
    fn test_target_ssid_stripped() {
        let filter = CallsignFilter::new(Some("KD2CIF-1"));
        assert!(filter.accepts(Some("KD2CIF-15")));
    }

    #[test]
    fn test_open_filter_accepts_everything() {
        let filter = CallsignFilter::new(None);
        assert!(filter.is_open());
        assert!(filter.accepts(Some("N0CALL")));
        assert!(filter.accepts(None));
    }

    #[test]
    fn test_unknown_origin_rejected_when_target_set() {
        let filter = CallsignFilter::new(Some("KD2CIF"));
        assert!(!filter.accepts(None));
    }

    #[test]
    fn test_empty_target_is_open() {
        let filter = CallsignFilter::new(Some(""));
        assert!(filter.is_open());
    }

    #[test]
    fn test_base_callsign() {
        assert_eq!(base_callsign("KD2CIF-1"), "KD2CIF");
        assert_eq!(base_callsign("KD2CIF"), "KD2CIF");
        assert_eq!(base_callsign("A-B-C"), "A");
    }
}
