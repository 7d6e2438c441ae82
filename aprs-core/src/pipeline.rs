//! One connection's decode pipeline, from raw bytes to KML rewrites.
//!
//! Owns every piece of per-connection state: the frame assembler buffer,
//! the callsign filter, the ledger, and the exporter. Each connection gets
//! its own `Pipeline`. Decode errors are logged and dropped; export
//! failures are logged and the ledger keeps the point, letting the next
//! acceptance rewrite the full file.

use std::path::{Path, PathBuf};

use crate::ax25;
use crate::decode;
use crate::filter::CallsignFilter;
use crate::frame::FrameAssembler;
use crate::kiss::{self, Unstuffing};
use crate::kml::KmlExporter;
use crate::ledger::Ledger;
use crate::types::{ExportError, TrackPoint};

/// Per-connection pipeline settings.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Accept positions only from this callsign (SSID ignored).
    /// `None` accepts everything.
    pub callsign: Option<String>,
    /// Path of the live KML track file.
    pub track_path: PathBuf,
    /// Whether incoming frames are byte-stuffed.
    pub unstuffing: Unstuffing,
}

/// Running totals for one pipeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct PipelineStats {
    /// Complete frames sliced from the stream.
    pub frames: u64,
    /// Frames that survived KISS and AX.25 decoding.
    pub decoded: u64,
    /// Packets that yielded a position.
    pub positions: u64,
    /// Positions accepted into the ledger.
    pub accepted: u64,
    /// KML rewrites that failed.
    pub export_failures: u64,
}

pub struct Pipeline {
    assembler: FrameAssembler,
    unstuffing: Unstuffing,
    filter: CallsignFilter,
    ledger: Ledger,
    exporter: KmlExporter,
    stats: PipelineStats,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Pipeline {
            assembler: FrameAssembler::new(),
            unstuffing: config.unstuffing,
            filter: CallsignFilter::new(config.callsign.as_deref()),
            ledger: Ledger::new(),
            exporter: KmlExporter::new(config.track_path),
            stats: PipelineStats::default(),
        }
    }

    /// Clear the ledger and write an empty, well-formed track file.
    /// Called once at process start.
    pub fn reset_output(&mut self) -> Result<(), ExportError> {
        self.ledger.clear();
        self.exporter.reset()
    }

    /// (Re)write the NetworkLink pointer for the track file.
    pub fn write_live_link(&self, link_path: &Path, refresh_secs: u32) -> Result<(), ExportError> {
        self.exporter.write_network_link(link_path, refresh_secs)
    }

    /// Feed raw bytes from the transport. Returns the positions accepted
    /// into the ledger by this read.
    pub fn feed(&mut self, data: &[u8]) -> Vec<TrackPoint> {
        let mut accepted = Vec::new();
        for frame in self.assembler.feed(data) {
            self.stats.frames += 1;
            if let Some(point) = self.process_frame(&frame) {
                accepted.push(point);
            }
        }
        accepted
    }

    fn process_frame(&mut self, frame: &[u8]) -> Option<TrackPoint> {
        let link = match kiss::decode(frame, self.unstuffing) {
            Ok(link) => link,
            Err(err) => {
                tracing::debug!("dropping frame: {err}");
                return None;
            }
        };

        let (header, payload) = match ax25::decode(&link) {
            Ok(parts) => parts,
            Err(err) => {
                tracing::debug!("dropping frame: {err}");
                return None;
            }
        };
        self.stats.decoded += 1;

        let position = match decode::interpret(&header, payload) {
            Ok(position) => position,
            Err(err) => {
                tracing::debug!("dropping packet from {header}: {err}");
                return None;
            }
        };
        self.stats.positions += 1;

        if !self.filter.accepts(position.from_callsign.as_deref()) {
            tracing::debug!("filtered out packet from {header}");
            return None;
        }

        let point = self.ledger.push(position);
        self.stats.accepted += 1;

        if let Err(err) = self.exporter.write_track(self.ledger.points()) {
            // The ledger keeps the point; the next acceptance retries.
            self.stats.export_failures += 1;
            tracing::warn!("KML rewrite failed: {err}");
        }

        Some(point)
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
