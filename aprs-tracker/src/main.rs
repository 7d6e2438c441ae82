//! aprs-tracker: TCP client for a KISS TNC that decodes APRS position
//! packets and maintains a live-rewritten KML track.
//!
//! `run` connects to the TNC and tracks continuously; `decode` replays a
//! captured KISS byte stream from a file without touching the KML outputs.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use aprs_core::kiss::Unstuffing;
use aprs_core::pipeline::{Pipeline, PipelineConfig};
use aprs_core::{ax25, decode, frame::FrameAssembler, kiss};

#[derive(Parser)]
#[command(name = "aprs-tracker", version, about = "APRS position tracker fed by a KISS TNC")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to a KISS TNC and track positions continuously
    Run {
        /// TNC host
        #[arg(long, env = "KISS_HOST", default_value = "localhost")]
        host: String,

        /// TNC TCP port
        #[arg(long, env = "KISS_PORT", default_value = "8001")]
        port: u16,

        /// Only accept positions from this callsign (SSID ignored)
        #[arg(long, env = "TRACK_CALLSIGN")]
        callsign: Option<String>,

        /// Path of the live KML track file
        #[arg(long, default_value = "tracker.kml")]
        kml: PathBuf,

        /// Path of the auto-refresh NetworkLink file
        #[arg(long, default_value = "tracker_link.kml")]
        link: PathBuf,

        /// NetworkLink refresh interval in seconds
        #[arg(long, default_value = "5")]
        refresh: u32,

        /// Treat incoming frames as not byte-stuffed
        #[arg(long)]
        direct: bool,
    },

    /// Decode a captured KISS byte stream from a file and print positions
    Decode {
        /// Path to file containing raw KISS frames
        file: PathBuf,

        /// Print one JSON object per position
        #[arg(long)]
        json: bool,

        /// Treat frames as not byte-stuffed
        #[arg(long)]
        direct: bool,
    },
}

fn unstuffing_mode(direct: bool) -> Unstuffing {
    if direct {
        Unstuffing::Direct
    } else {
        Unstuffing::Escaped
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Run {
            host,
            port,
            callsign,
            kml,
            link,
            refresh,
            direct,
        } => {
            let config = PipelineConfig {
                callsign,
                track_path: kml,
                unstuffing: unstuffing_mode(direct),
            };
            run_tracker(&host, port, config, &link, refresh).await
        }

        Commands::Decode { file, json, direct } => {
            decode_capture(&file, json, unstuffing_mode(direct))
        }
    }
}

async fn run_tracker(
    host: &str,
    port: u16,
    config: PipelineConfig,
    link_path: &Path,
    refresh_secs: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut pipeline = Pipeline::new(config);
    pipeline.reset_output()?;
    pipeline.write_live_link(link_path, refresh_secs)?;
    tracing::info!("NetworkLink written to {}", link_path.display());

    tracing::info!("connecting to KISS TNC at {host}:{port}");
    let mut stream = TcpStream::connect((host, port)).await?;
    tracing::info!("connected, waiting for frames");

    let mut buf = [0u8; 1024];
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted, shutting down");
                break;
            }
            read = stream.read(&mut buf) => {
                let n = match read {
                    Ok(n) => n,
                    Err(err) => {
                        tracing::error!("transport error: {err}");
                        break;
                    }
                };
                if n == 0 {
                    tracing::info!("connection closed by TNC");
                    break;
                }
                for point in pipeline.feed(&buf[..n]) {
                    let station = point
                        .position
                        .from_callsign
                        .as_deref()
                        .unwrap_or("unknown")
                        .to_string();
                    match point.position.altitude_m {
                        Some(alt) => tracing::info!(
                            "{station}: {:.5}, {:.5}, {alt:.0} m",
                            point.position.latitude,
                            point.position.longitude,
                        ),
                        None => tracing::info!(
                            "{station}: {:.5}, {:.5}",
                            point.position.latitude,
                            point.position.longitude,
                        ),
                    }
                }
            }
        }
    }

    let stats = pipeline.stats();
    tracing::info!(
        "final: {} frames, {} decoded, {} positions, {} accepted, {} export failures",
        stats.frames,
        stats.decoded,
        stats.positions,
        stats.accepted,
        stats.export_failures
    );
    Ok(())
}

fn decode_capture(
    path: &Path,
    json: bool,
    unstuffing: Unstuffing,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = std::fs::read(path)?;
    let mut assembler = FrameAssembler::new();
    let mut decoded = 0u64;

    for raw in assembler.feed(&data) {
        let link = match kiss::decode(&raw, unstuffing) {
            Ok(link) => link,
            Err(err) => {
                tracing::debug!("skipping frame: {err}");
                continue;
            }
        };
        let (header, payload) = match ax25::decode(&link) {
            Ok(parts) => parts,
            Err(err) => {
                tracing::debug!("skipping frame: {err}");
                continue;
            }
        };
        match decode::interpret(&header, payload) {
            Ok(position) => {
                decoded += 1;
                if json {
                    println!(
                        "{}",
                        serde_json::json!({
                            "header": header.to_string(),
                            "from": position.from_callsign,
                            "latitude": position.latitude,
                            "longitude": position.longitude,
                            "altitude_m": position.altitude_m,
                        })
                    );
                } else {
                    match position.altitude_m {
                        Some(alt) => println!(
                            "{header}: {:.5}, {:.5}, {alt:.0} m",
                            position.latitude, position.longitude
                        ),
                        None => println!(
                            "{header}: {:.5}, {:.5}",
                            position.latitude, position.longitude
                        ),
                    }
                }
            }
            Err(err) => tracing::debug!("no position in packet from {header}: {err}"),
        }
    }

    eprintln!("{decoded} positions decoded");
    Ok(())
}
