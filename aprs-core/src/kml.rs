//! KML rendering of the position ledger.
//!
//! The live track file is regenerated in full from the ledger on every
//! acceptance and swapped into place with a rename, so a polling viewer
//! never reads a half-written document. A companion NetworkLink file
//! points viewers at the track file with an on-interval refresh.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::types::{ExportError, TrackPoint};

const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";

// ---------------------------------------------------------------------------
// Document shapes
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename = "kml")]
struct TrackDoc {
    #[serde(rename = "@xmlns")]
    xmlns: &'static str,
    #[serde(rename = "Document")]
    document: Document,
}

#[derive(Serialize)]
struct Document {
    #[serde(rename = "Placemark")]
    placemarks: Vec<Placemark>,
}

#[derive(Serialize)]
struct Placemark {
    name: String,
    description: String,
    #[serde(rename = "Point")]
    point: Point,
}

#[derive(Serialize)]
struct Point {
    #[serde(rename = "altitudeMode")]
    altitude_mode: &'static str,
    coordinates: String,
}

#[derive(Serialize)]
#[serde(rename = "kml")]
struct NetworkLinkDoc {
    #[serde(rename = "@xmlns")]
    xmlns: &'static str,
    #[serde(rename = "NetworkLink")]
    network_link: NetworkLink,
}

#[derive(Serialize)]
struct NetworkLink {
    name: &'static str,
    #[serde(rename = "Link")]
    link: Link,
}

#[derive(Serialize)]
struct Link {
    href: String,
    #[serde(rename = "refreshMode")]
    refresh_mode: &'static str,
    #[serde(rename = "refreshInterval")]
    refresh_interval: u32,
}

// ---------------------------------------------------------------------------
// Exporter
// ---------------------------------------------------------------------------

/// Writes the live KML track and its NetworkLink pointer.
#[derive(Debug, Clone)]
pub struct KmlExporter {
    track_path: PathBuf,
}

impl KmlExporter {
    pub fn new(track_path: impl Into<PathBuf>) -> Self {
        KmlExporter {
            track_path: track_path.into(),
        }
    }

    pub fn track_path(&self) -> &Path {
        &self.track_path
    }

    /// Write an empty, well-formed track file.
    pub fn reset(&self) -> Result<(), ExportError> {
        self.write_track(&[])
    }

    /// Regenerate the track file from the entire ledger.
    pub fn write_track(&self, points: &[TrackPoint]) -> Result<(), ExportError> {
        let doc = TrackDoc {
            xmlns: KML_NAMESPACE,
            document: Document {
                placemarks: points
                    .iter()
                    .enumerate()
                    .map(|(idx, point)| Placemark {
                        name: format!("Point {}", idx + 1),
                        description: point.timestamp.clone(),
                        point: Point {
                            altitude_mode: "absolute",
                            coordinates: format!(
                                "{},{},{}",
                                point.position.longitude,
                                point.position.latitude,
                                point.position.altitude_m.unwrap_or(0.0),
                            ),
                        },
                    })
                    .collect(),
            },
        };
        write_xml(&self.track_path, &doc)
    }

    /// Write the NetworkLink file telling a viewer to reload the track
    /// file every `refresh_secs` seconds.
    pub fn write_network_link(
        &self,
        link_path: &Path,
        refresh_secs: u32,
    ) -> Result<(), ExportError> {
        let absolute = std::path::absolute(&self.track_path)
            .unwrap_or_else(|_| self.track_path.clone());
        let doc = NetworkLinkDoc {
            xmlns: KML_NAMESPACE,
            network_link: NetworkLink {
                name: "Live Position Tracker",
                link: Link {
                    href: format!("file://{}", absolute.display()),
                    refresh_mode: "onInterval",
                    refresh_interval: refresh_secs,
                },
            },
        };
        write_xml(link_path, &doc)
    }
}

/// Serialize and write a document via a sibling temp file plus rename.
fn write_xml<T: Serialize>(path: &Path, doc: &T) -> Result<(), ExportError> {
    let xml = quick_xml::se::to_string(doc).map_err(|e| ExportError::Serialize(e.to_string()))?;
    let rendered = format!("{XML_DECL}{xml}\n");

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, rendered).map_err(|e| io_error(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| io_error(path, e))?;
    Ok(())
}

fn io_error(path: &Path, source: io::Error) -> ExportError {
    ExportError::Io {
        path: path.to_path_buf(),
        source,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
