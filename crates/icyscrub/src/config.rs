//! Configuration constants for the icyscrub engine

/// Network-related configuration
pub mod network {
    /// User agent for HTTP requests
    pub const USER_AGENT: &str = concat!("Icyscrub/", env!("CARGO_PKG_VERSION"));

    /// Connection timeout in seconds
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;

    /// Read timeout in seconds
    pub const READ_TIMEOUT_SECS: u64 = 30;
}

/// Demuxer-related configuration
pub mod demux {
    /// Working buffer size (bytes) for audio-phase reads.
    /// Must exceed MAX_META_LEN so the same buffer holds a full metadata frame.
    pub const CHUNK_SIZE: usize = 8 * 1024;

    /// ICY metadata frame lengths are the marker byte times this unit
    pub const META_LEN_UNIT: usize = 16;

    /// Largest possible metadata frame (marker byte 255)
    pub const MAX_META_LEN: usize = 255 * META_LEN_UNIT;
}
