//! aprs-core: Pure decode pipeline for KISS/AX.25/APRS position telemetry.
//!
//! No sockets, no CLI: just the framing, decode, filter, ledger, and KML
//! export stages. The `aprs-tracker` binary wires a TCP transport to a
//! [`Pipeline`] from this crate.

pub mod aprs;
pub mod ax25;
pub mod decode;
pub mod filter;
pub mod frame;
pub mod kiss;
pub mod kml;
pub mod ledger;
pub mod nmea;
pub mod pipeline;
pub mod types;

#[cfg(test)]
pub(crate) mod testutil;

// Re-export commonly used types at crate root
pub use ax25::{Address, RoutingHeader};
pub use filter::CallsignFilter;
pub use frame::FrameAssembler;
pub use kiss::Unstuffing;
pub use kml::KmlExporter;
pub use ledger::Ledger;
pub use pipeline::{Pipeline, PipelineConfig, PipelineStats};
pub use types::*;
