//! Icyscrub — ICY stream demuxer
//!
//! Separates an ICY-extended (Shoutcast/Icecast) audio byte stream into
//! pure audio bytes and timestamped metadata events.
//!
//! ## Quick start
//!
//! ```no_run
//! use icyscrub::demux::{CancelToken, Demuxer};
//!
//! let (input, headers) = icyscrub::stream::connect("http://example.com/stream")?;
//! let metaint = headers.metaint.expect("station sends no metadata");
//! let mut demuxer = Demuxer::new(metaint)?;
//! let mut events: Vec<icyscrub::MetadataEvent> = Vec::new();
//! demuxer.run(input, std::io::stdout().lock(), &mut events, &CancelToken::new())?;
//! # Ok::<(), icyscrub::error::ScrubError>(())
//! ```

pub mod config;
pub mod demux;
pub mod error;
pub mod metadata;
pub mod stream;

pub use demux::{CancelToken, Demuxer, MetadataSink};
pub use error::{Result, ScrubError};
pub use metadata::MetadataEvent;
