//! ICY de-interleaving state machine
//!
//! The ICY protocol interleaves length-prefixed metadata frames into the
//! audio byte stream every `icy-metaint` bytes. The demuxer forwards the
//! audio bytes untouched to a sink, decodes the metadata frames, and
//! publishes them as timestamped events.
//!
//! Single-threaded, blocking, single pass. Cancellation is cooperative:
//! the token is polled once per loop iteration and never honored in the
//! middle of a metadata frame, since a partially consumed frame leaves
//! the stream position desynchronized.

use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::Sender;
use tracing::{debug, trace};

use crate::config::demux::{CHUNK_SIZE, MAX_META_LEN, META_LEN_UNIT};
use crate::error::{Phase, Result, ScrubError};
use crate::metadata::{trim_padding, MetadataEvent};

/// Cooperative cancellation flag, settable from signal handlers or other
/// threads, polled by the demuxer between audio chunks.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Edge-triggered; cannot be unset.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// The underlying flag, for registering with signal handlers
    pub fn flag(&self) -> Arc<AtomicBool> {
        self.flag.clone()
    }
}

/// Receives decoded metadata events from the demuxer.
///
/// Publishing is infallible by design: metadata delivery is best-effort
/// and must never affect audio forwarding.
pub trait MetadataSink {
    fn publish(&mut self, event: MetadataEvent);
}

impl MetadataSink for Sender<MetadataEvent> {
    fn publish(&mut self, event: MetadataEvent) {
        // Receiver gone means nobody is listening; drop the event
        let _ = self.send(event);
    }
}

impl MetadataSink for Vec<MetadataEvent> {
    fn publish(&mut self, event: MetadataEvent) {
        self.push(event);
    }
}

/// ICY stream demuxer.
///
/// One instance per stream session. Owns a single working buffer, reused
/// for both audio chunks and metadata frames, allocated once at
/// construction.
pub struct Demuxer {
    meta_interval: usize,
    /// Audio bytes forwarded since the last metadata marker.
    /// Always in `0..=meta_interval`; reset after every frame.
    audio_cursor: usize,
    buffer: Vec<u8>,
    audio_bytes: u64,
    meta_bytes: u64,
    meta_frames: u64,
}

impl Demuxer {
    /// Create a demuxer for a stream with the given metadata interval.
    ///
    /// The interval comes from the `icy-metaint` response header and must
    /// be positive; zero is a protocol error, not a tolerated default.
    pub fn new(meta_interval: usize) -> Result<Self> {
        if meta_interval == 0 {
            return Err(ScrubError::InvalidMetaInterval(meta_interval));
        }
        // One frame (MAX_META_LEN) plus its marker byte must fit
        let capacity = CHUNK_SIZE.max(MAX_META_LEN + 1);
        Ok(Self {
            meta_interval,
            audio_cursor: 0,
            buffer: vec![0u8; capacity],
            audio_bytes: 0,
            meta_bytes: 0,
            meta_frames: 0,
        })
    }

    /// Total audio bytes forwarded to the sink
    pub fn audio_bytes(&self) -> u64 {
        self.audio_bytes
    }

    /// Total metadata bytes (markers and frame bodies) removed from the stream
    pub fn meta_bytes(&self) -> u64 {
        self.meta_bytes
    }

    /// Number of non-empty metadata frames decoded
    pub fn meta_frames(&self) -> u64 {
        self.meta_frames
    }

    /// Run the demuxing loop until cancelled or a fatal I/O condition.
    ///
    /// Returns `Ok(())` only when `cancel` was observed at the loop
    /// boundary. A read returning zero bytes is treated as the upstream
    /// cutting the connection (`UnexpectedEof`): the input is expected to
    /// be a live stream with no planned end. All errors are fatal to the
    /// session; every audio byte accepted from `input` has been written
    /// (or attempted) to `audio_out` by the time this returns.
    pub fn run<R, W, M>(
        &mut self,
        mut input: R,
        mut audio_out: W,
        meta_out: &mut M,
        cancel: &CancelToken,
    ) -> Result<()>
    where
        R: Read,
        W: Write,
        M: MetadataSink,
    {
        while !cancel.is_cancelled() {
            // Never read past the next metadata marker
            let chunk = self.buffer.len().min(self.meta_interval - self.audio_cursor);
            let n = input
                .read(&mut self.buffer[..chunk])
                .map_err(|source| ScrubError::Read {
                    phase: Phase::Audio,
                    audio_bytes: self.audio_bytes,
                    source,
                })?;
            if n == 0 {
                return Err(ScrubError::UnexpectedEof {
                    phase: Phase::Audio,
                    audio_bytes: self.audio_bytes,
                });
            }

            audio_out
                .write_all(&self.buffer[..n])
                .map_err(|source| ScrubError::Write {
                    audio_bytes: self.audio_bytes,
                    source,
                })?;
            self.audio_cursor += n;
            self.audio_bytes += n as u64;
            debug_assert!(self.audio_cursor <= self.meta_interval);

            if self.audio_cursor == self.meta_interval {
                self.audio_cursor = 0;
                self.read_metadata_frame(&mut input, meta_out)?;
            }
        }

        // Push any bytes the sink buffered before handing control back
        audio_out.flush().map_err(|source| ScrubError::Write {
            audio_bytes: self.audio_bytes,
            source,
        })?;
        debug!(
            audio_bytes = self.audio_bytes,
            meta_frames = self.meta_frames,
            "cancelled, demuxer exiting cleanly"
        );
        Ok(())
    }

    /// Consume one metadata frame: the length marker and, if non-zero,
    /// the frame body. Short reads here are fatal framing errors — the
    /// stream cannot be resynchronized once the marker is lost.
    fn read_metadata_frame<R, M>(&mut self, input: &mut R, meta_out: &mut M) -> Result<()>
    where
        R: Read,
        M: MetadataSink,
    {
        let mut marker = [0u8; 1];
        input
            .read_exact(&mut marker)
            .map_err(|e| self.exact_read_error(Phase::MetaLength, e))?;
        self.meta_bytes += 1;

        let meta_len = marker[0] as usize * META_LEN_UNIT;
        if meta_len == 0 {
            trace!("no metadata in this interval");
            return Ok(());
        }

        input
            .read_exact(&mut self.buffer[..meta_len])
            .map_err(|e| self.exact_read_error(Phase::MetaBody, e))?;
        self.meta_bytes += meta_len as u64;
        self.meta_frames += 1;

        let text = String::from_utf8_lossy(trim_padding(&self.buffer[..meta_len])).into_owned();
        debug!(frame_len = meta_len, "metadata: {text}");
        meta_out.publish(MetadataEvent::now(text));
        Ok(())
    }

    fn exact_read_error(&self, phase: Phase, source: io::Error) -> ScrubError {
        if source.kind() == io::ErrorKind::UnexpectedEof {
            ScrubError::UnexpectedEof {
                phase,
                audio_bytes: self.audio_bytes,
            }
        } else {
            ScrubError::Read {
                phase,
                audio_bytes: self.audio_bytes,
                source,
            }
        }
    }
}
