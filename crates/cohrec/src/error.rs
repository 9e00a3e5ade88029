//! Error types for the replay header decoder.

use std::error::Error;
use std::fmt;

/// Errors from cursor reads and seeks.
///
/// Every variant is recoverable at the decode level: the walker logs the
/// failure, marks the header as partial, and returns whatever it had
/// already assembled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReadError {
    /// A read needed more bytes than remain in the buffer.
    OutOfRange {
        /// Buffer offset the read started at.
        offset: usize,
        /// Number of bytes the read needed.
        wanted: usize,
        /// Total buffer length.
        len: usize,
    },
    /// A seek target fell outside `[0, len]`.
    SeekOutOfBounds {
        /// The computed target position.
        target: i64,
        /// Total buffer length.
        len: usize,
    },
    /// Bytes could not be decoded under the attempted text encoding,
    /// after any documented fallback.
    InvalidText {
        /// Buffer offset the string read started at.
        offset: usize,
        /// The encoding that failed (`"ascii"` or `"utf-16le"`).
        encoding: &'static str,
    },
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange {
                offset,
                wanted,
                len,
            } => {
                write!(
                    f,
                    "read of {wanted} bytes at offset {offset} overruns buffer of {len} bytes"
                )
            }
            Self::SeekOutOfBounds { target, len } => {
                write!(f, "seek to {target} is outside buffer of {len} bytes")
            }
            Self::InvalidText { offset, encoding } => {
                write!(f, "invalid {encoding} text at offset {offset}")
            }
        }
    }
}

impl Error for ReadError {}
