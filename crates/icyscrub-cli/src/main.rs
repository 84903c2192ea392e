//! Icyscrub CLI — pipe an ICY radio stream to stdout, metadata scrubbed
//!
//! Audio bytes go to stdout for a downstream player (gst-launch, mpv,
//! ffplay, ...) to consume; extracted metadata and diagnostics go to
//! stderr as log lines.

use std::io;

use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use icyscrub::demux::{CancelToken, Demuxer, MetadataSink};
use icyscrub::metadata::{parse_stream_title, MetadataEvent};

/// Station played when no URL is given
const DEFAULT_URL: &str = "http://7659.live.streamtheworld.com:80/977_80AAC_SC";

#[derive(Parser)]
#[command(
    name = "icyscrub",
    about = "Pipe an ICY radio stream to stdout with metadata scrubbed and logged",
    version
)]
struct Cli {
    /// Stream URL to play
    #[arg(default_value = DEFAULT_URL)]
    url: String,
}

/// Logs each metadata frame as it is decoded, in stream order
struct LogSink;

impl MetadataSink for LogSink {
    fn publish(&mut self, event: MetadataEvent) {
        info!("({}) metadata: {}", event.at.to_rfc3339(), event.raw);
        if let Some(title) = parse_stream_title(&event.raw) {
            info!("now playing: {title}");
        }
    }
}

fn main() {
    // Logs go to stderr; stdout carries the audio bytes
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli.url) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(url: &str) -> icyscrub::Result<()> {
    info!("streaming {url}");

    let (input, headers) = icyscrub::stream::connect(url)?;
    if let Some(name) = &headers.station_name {
        info!("station: {name}");
    }
    let metaint = headers.require_metaint()?;
    debug!("metadata interval set to {metaint}");

    let cancel = CancelToken::new();
    for signal in [signal_hook::consts::SIGINT, signal_hook::consts::SIGTERM] {
        signal_hook::flag::register(signal, cancel.flag())?;
    }

    let mut demuxer = Demuxer::new(metaint)?;
    let stdout = io::stdout();
    demuxer.run(input, stdout.lock(), &mut LogSink, &cancel)?;

    info!(
        "exiting cleanly after {} audio bytes, {} metadata frames",
        demuxer.audio_bytes(),
        demuxer.meta_frames()
    );
    Ok(())
}
