//! Metadata event types and ICY text handling
//!
//! Pure data types and parsing helpers for ICY (Icecast/Shoutcast)
//! metadata frames. The demuxer emits the raw frame text untouched;
//! `parse_stream_title` is a convenience for callers that want the
//! `StreamTitle` value for display.

use chrono::{DateTime, Utc};

/// A decoded metadata frame with the moment decoding completed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataEvent {
    /// UTC wall-clock time captured when the frame was decoded
    pub at: DateTime<Utc>,
    /// Raw frame text, trailing NUL padding removed.
    /// Commonly `StreamTitle='Artist - Song';StreamUrl='';`
    pub raw: String,
}

impl MetadataEvent {
    /// Capture a new event timestamped now
    pub fn now(raw: String) -> Self {
        Self { at: Utc::now(), raw }
    }
}

/// Strip trailing NUL bytes from a raw metadata frame.
///
/// ICY frames are NUL-padded to a multiple of 16 bytes; everything past
/// the last non-NUL byte is padding.
pub fn trim_padding(frame: &[u8]) -> &[u8] {
    let end = frame
        .iter()
        .rposition(|&b| b != 0)
        .map(|p| p + 1)
        .unwrap_or(0);
    &frame[..end]
}

/// Parse ICY metadata text to extract the StreamTitle value.
///
/// ICY metadata format: `StreamTitle='Artist - Song';StreamUrl='...';`
pub fn parse_stream_title(metadata: &str) -> Option<String> {
    let start = metadata.find("StreamTitle='")?;
    let start = start + 13; // length of "StreamTitle='"
    let end = metadata[start..].find("';")?;
    let title = metadata[start..start + end].trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- trim_padding ---

    #[test]
    fn trim_removes_trailing_nuls() {
        let mut frame = b"StreamTitle='Test Song';".to_vec();
        frame.resize(32, 0);
        assert_eq!(trim_padding(&frame), b"StreamTitle='Test Song';");
    }

    #[test]
    fn trim_all_nul_frame_is_empty() {
        let frame = vec![0u8; 32];
        assert_eq!(trim_padding(&frame), b"");
    }

    #[test]
    fn trim_empty_frame() {
        assert_eq!(trim_padding(&[]), b"");
    }

    #[test]
    fn trim_keeps_interior_nuls() {
        let frame = [b'a', 0, b'b', 0, 0];
        assert_eq!(trim_padding(&frame), &[b'a', 0, b'b']);
    }

    #[test]
    fn trim_no_padding_is_identity() {
        let frame = b"StreamTitle='A';";
        assert_eq!(trim_padding(frame), frame);
    }

    // --- parse_stream_title ---

    #[test]
    fn parse_standard_metadata() {
        let raw = "StreamTitle='Pink Floyd - Comfortably Numb';StreamUrl='';";
        assert_eq!(
            parse_stream_title(raw),
            Some("Pink Floyd - Comfortably Numb".to_string())
        );
    }

    #[test]
    fn parse_empty_title() {
        assert_eq!(parse_stream_title("StreamTitle='';StreamUrl='';"), None);
    }

    #[test]
    fn parse_whitespace_title() {
        assert_eq!(parse_stream_title("StreamTitle='   ';"), None);
    }

    #[test]
    fn parse_no_stream_title_field() {
        assert_eq!(parse_stream_title("SomeOtherField='value';"), None);
    }

    #[test]
    fn parse_missing_closing_quote() {
        assert_eq!(parse_stream_title("StreamTitle='No Closing Quote"), None);
    }

    #[test]
    fn parse_title_with_quotes() {
        // The parser scans for the first "';", so an interior apostrophe survives
        let raw = "StreamTitle='It's Alright';";
        assert_eq!(parse_stream_title(raw), Some("It's Alright".to_string()));
    }

    #[test]
    fn parse_unicode_title() {
        let raw = "StreamTitle='Motörhead - Ace of Spades';StreamUrl='';";
        assert_eq!(
            parse_stream_title(raw),
            Some("Motörhead - Ace of Spades".to_string())
        );
    }

    // --- MetadataEvent ---

    #[test]
    fn event_now_captures_raw_text() {
        let e = MetadataEvent::now("StreamTitle='X';".to_string());
        assert_eq!(e.raw, "StreamTitle='X';");
    }

    #[test]
    fn event_timestamp_renders_rfc3339() {
        let e = MetadataEvent::now(String::new());
        // e.g. 2026-08-23T12:34:56.789Z — sanity-check the shape only
        let rendered = e.at.to_rfc3339();
        assert!(rendered.contains('T'));
        assert!(rendered.len() >= 20);
    }

    #[test]
    fn event_equality() {
        let a = MetadataEvent {
            at: DateTime::<Utc>::MIN_UTC,
            raw: "x".to_string(),
        };
        let b = a.clone();
        assert_eq!(a, b);
    }
}
