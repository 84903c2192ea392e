//! Error types for icyscrub
//!
//! Centralized error handling using thiserror. Every demuxer error is
//! fatal to its session; retry and reconnect policy belongs to callers.

use std::fmt;
use std::io;

use thiserror::Error;

/// Which part of the ICY framing the demuxer was reading when it failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Forwarding audio bytes between metadata markers
    Audio,
    /// The single length-marker byte after an interval
    MetaLength,
    /// The length-prefixed metadata frame body
    MetaBody,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Audio => write!(f, "audio"),
            Phase::MetaLength => write!(f, "metadata length marker"),
            Phase::MetaBody => write!(f, "metadata body"),
        }
    }
}

/// Main error type for icyscrub
#[derive(Error, Debug)]
pub enum ScrubError {
    #[error("invalid metadata interval {0}; icy-metaint must be positive")]
    InvalidMetaInterval(usize),

    #[error("read failed in {phase} phase after {audio_bytes} audio bytes: {source}")]
    Read {
        phase: Phase,
        audio_bytes: u64,
        source: io::Error,
    },

    #[error("stream unexpectedly closed in {phase} phase after {audio_bytes} audio bytes")]
    UnexpectedEof { phase: Phase, audio_bytes: u64 },

    #[error("audio sink write failed after {audio_bytes} audio bytes: {source}")]
    Write {
        audio_bytes: u64,
        source: io::Error,
    },

    #[error("{}", friendly_network_error(.0))]
    Network(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("stream error: {0}")]
    Stream(String),
}

/// Result type alias for icyscrub
pub type Result<T> = std::result::Result<T, ScrubError>;

fn friendly_network_error(e: &reqwest::Error) -> String {
    if e.is_builder() {
        if let Some(url) = e.url() {
            return format!("invalid URL: {url}");
        }
        return "invalid URL".to_string();
    }
    if e.is_connect() {
        if let Some(url) = e.url() {
            return format!("could not connect to {}", url.host_str().unwrap_or("server"));
        }
        return "could not connect to server".to_string();
    }
    if e.is_timeout() {
        return "connection timed out".to_string();
    }
    format!("network error: {e}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_display() {
        assert_eq!(Phase::Audio.to_string(), "audio");
        assert_eq!(Phase::MetaLength.to_string(), "metadata length marker");
        assert_eq!(Phase::MetaBody.to_string(), "metadata body");
    }

    #[test]
    fn invalid_interval_message_names_header() {
        let e = ScrubError::InvalidMetaInterval(0);
        assert!(e.to_string().contains("icy-metaint"));
    }

    #[test]
    fn eof_message_carries_phase_and_count() {
        let e = ScrubError::UnexpectedEof {
            phase: Phase::MetaBody,
            audio_bytes: 16000,
        };
        let msg = e.to_string();
        assert!(msg.contains("metadata body"));
        assert!(msg.contains("16000"));
    }

    #[test]
    fn read_error_preserves_source() {
        let e = ScrubError::Read {
            phase: Phase::Audio,
            audio_bytes: 0,
            source: io::Error::new(io::ErrorKind::ConnectionReset, "reset"),
        };
        assert!(e.to_string().contains("reset"));
    }
}
