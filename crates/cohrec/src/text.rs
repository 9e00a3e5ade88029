//! String readers for the format's three string shapes.
//!
//! The format mixes single-byte and UTF-16LE text, and one producer is
//! known to write UTF-16LE into fields whose length prefix counts
//! single-byte characters. Fixed-length ASCII reads therefore carry a
//! fallback: when a non-ASCII byte turns up, the same span is re-read as
//! UTF-16LE — two bytes per declared character — from the original
//! position.

use crate::cursor::Cursor;
use crate::error::ReadError;

impl<'a> Cursor<'a> {
    /// Read `chars` bytes as single-byte ASCII text.
    ///
    /// On a non-ASCII byte the cursor has not yet advanced; the same call
    /// then reads `chars` UTF-16LE characters (`2 * chars` bytes) from
    /// the unchanged position instead.
    pub fn read_ascii(&mut self, chars: usize) -> Result<String, ReadError> {
        let bytes = self.peek_bytes(chars)?;
        if bytes.is_ascii() {
            self.advance(chars);
            return Ok(bytes.iter().map(|&b| b as char).collect());
        }
        self.read_utf16(chars)
    }

    /// Read `chars` UTF-16LE characters (`2 * chars` bytes).
    pub fn read_utf16(&mut self, chars: usize) -> Result<String, ReadError> {
        let offset = self.position();
        let bytes = self.peek_bytes(chars * 2)?;
        let units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        let text = String::from_utf16(&units).map_err(|_| ReadError::InvalidText {
            offset,
            encoding: "utf-16le",
        })?;
        self.advance(chars * 2);
        Ok(text)
    }

    /// Read a u32 character count, then that many ASCII characters.
    ///
    /// The count read commits even when the following string read fails.
    pub fn read_length_prefixed_ascii(&mut self) -> Result<String, ReadError> {
        let chars = self.read_u32()? as usize;
        self.read_ascii(chars)
    }

    /// Read a u32 character count, then that many UTF-16LE characters.
    pub fn read_length_prefixed_utf16(&mut self) -> Result<String, ReadError> {
        let chars = self.read_u32()? as usize;
        self.read_utf16(chars)
    }

    /// Read single bytes up to a zero byte. The terminator is consumed
    /// but excluded from the result.
    pub fn read_null_terminated_ascii(&mut self) -> Result<String, ReadError> {
        let mut out = String::new();
        loop {
            let offset = self.position();
            let byte = self.read_u8()?;
            if byte == 0 {
                return Ok(out);
            }
            if !byte.is_ascii() {
                return Err(ReadError::InvalidText {
                    offset,
                    encoding: "ascii",
                });
            }
            out.push(byte as char);
        }
    }

    /// Read UTF-16LE code units up to a 0x0000 unit. The terminator is
    /// consumed but excluded from the result.
    pub fn read_null_terminated_utf16(&mut self) -> Result<String, ReadError> {
        let offset = self.position();
        let mut units = Vec::new();
        loop {
            let unit = self.read_u16()?;
            if unit == 0 {
                break;
            }
            units.push(unit);
        }
        String::from_utf16(&units).map_err(|_| ReadError::InvalidText {
            offset,
            encoding: "utf-16le",
        })
    }
}
