//! ICY stream connection
//!
//! Connects to Icecast/Shoutcast streams with metadata requested and
//! parses the ICY response headers. The returned response is a blocking
//! `Read` positioned at the start of the interleaved byte stream,
//! ready to hand to the demuxer.

use std::time::Duration;

use reqwest::header::HeaderMap;
use tracing::debug;

use crate::config::network::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS, USER_AGENT};
use crate::error::{Result, ScrubError};

/// Headers parsed from an ICY stream response
#[derive(Debug, Clone)]
pub struct IcyHeaders {
    /// Audio bytes between metadata markers; absent when the server
    /// ignored the `icy-metadata` request header
    pub metaint: Option<usize>,
    pub station_name: Option<String>,
    pub content_type: Option<String>,
    pub bitrate: Option<u32>,
}

impl IcyHeaders {
    /// The metadata interval, or a protocol error if the server did not
    /// declare one. Streams without `icy-metaint` cannot be demuxed.
    pub fn require_metaint(&self) -> Result<usize> {
        self.metaint
            .ok_or_else(|| ScrubError::Stream("no icy-metaint header in response".to_string()))
    }
}

/// Connect to a URL with ICY metadata support.
///
/// Sends `icy-metadata: 1`, logs every response header at debug level,
/// and returns the body stream alongside the parsed ICY headers.
pub fn connect(url: &str) -> Result<(reqwest::blocking::Response, IcyHeaders)> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(READ_TIMEOUT_SECS))
        .build()?;

    let response = client.get(url).header("icy-metadata", "1").send()?;

    if !response.status().is_success() {
        return Err(ScrubError::Stream(format!("HTTP {}", response.status())));
    }

    for (name, value) in response.headers() {
        debug!("response header > {}: {}", name, value.to_str().unwrap_or("<binary>"));
    }

    let headers = parse_icy_headers(response.headers());
    Ok((response, headers))
}

/// Extract ICY fields from a response header map
pub fn parse_icy_headers(headers: &HeaderMap) -> IcyHeaders {
    let metaint = headers
        .get("icy-metaint")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<usize>().ok());

    let station_name = headers
        .get("icy-name")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    let bitrate = headers
        .get("icy-br")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u32>().ok());

    IcyHeaders {
        metaint,
        station_name,
        content_type,
        bitrate,
    }
}
