//! Decoder for Company of Heroes replay (`.rec`) headers.
//!
//! Pulls match facts — map identity, players, lobby settings, the
//! recorded-at date — out of the header region of a replay without
//! touching the command stream that follows. Consumers are stat trackers
//! and bots that need the facts, not the playback.
//!
//! # Architecture
//!
//! - [`Cursor`] — bounded reads and seeks over the in-memory buffer
//! - [`Cursor::read_ascii`] and friends — the format's string shapes in
//!   both single-byte and UTF-16LE encodings
//! - [`parse_timestamp`] — locale-heuristic date recovery
//! - [`decode`] — recursive walk of the nested chunk container
//! - [`ReplayHeader`] — the assembled record, enriched afterwards via
//!   [`ReplayHeader::resolve_map_text`]
//!
//! # Format
//!
//! ```text
//! [version u32] ["COH__REC"] [local date, UTF-16LE, 0-terminated] ...
//! [container #1 @76] [container #2] [chunk tree] [chunk tree]
//!   chunk = tag(8) version(4) length(4) name-len(4) reserved(8)
//!           [name] [body(length)]
//! ```
//!
//! `FOLD*` chunks nest child chunks; `DATA*` chunks carry fields. The
//! walker always lands on each declared chunk boundary, so chunks it
//! does not recognize are skipped losslessly.
//!
//! Decoding is best-effort by design: damaged or truncated buffers yield
//! a [`ReplayHeader`] with `success == false` and every field that
//! decoded cleanly before the damage.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod chunk;
pub mod cursor;
pub mod date;
pub mod error;
pub mod header;
mod text;

pub use chunk::decode;
pub use cursor::{Cursor, SeekFrom};
pub use date::parse_timestamp;
pub use error::ReadError;
pub use header::{PlayerEntry, PlayerList, ReplayHeader, TextResolver};

/// Magic tag following the file version word.
pub const MAGIC: [u8; 8] = *b"COH__REC";
