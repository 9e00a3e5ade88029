//! Recursive descent over the nested chunk container.
//!
//! After a small fixed preamble, the buffer holds two container framings
//! (`Relic Chunky`) followed by trees of chunks. A chunk header declares
//! an 8-byte type tag, a version, and the byte length of its body; tags
//! beginning with `FOLD` hold child chunks, tags beginning with `DATA`
//! hold fields. The walker seeks to the declared boundary after every
//! chunk — however much of the body it understood — so unknown or
//! version-shifted layouts can never desynchronize the siblings that
//! follow.

use crate::cursor::{Cursor, SeekFrom};
use crate::date;
use crate::error::ReadError;
use crate::header::{PlayerEntry, ReplayHeader};
use crate::MAGIC;

/// Start of the first container framing, fixed across every known
/// producer.
const FIRST_CONTAINER_OFFSET: usize = 76;

/// Recursion ceiling. Real replays nest three or four levels deep; a
/// buffer that claims more is corrupt or hostile, and its subtree is
/// skipped over instead of walked.
const MAX_DEPTH: usize = 64;

/// Value the match-mode word carries when the lobby selected victory
/// points rather than annihilation.
const VICTORY_POINT_MAGIC: u32 = 0x603872a3;

/// Garbled match-type string the Korean-locale producer writes in place
/// of `automatch`.
const KOREAN_AUTOMATCH_GARBLE: &str =
    "\u{c0de}\u{0bad}\u{0101}\u{4204}\u{4cc5}\u{0103}\u{1000}";

/// Decode a replay header from an in-memory buffer.
///
/// Never fails outright: a truncated or corrupt buffer yields a header
/// with `success == false` and every field that decoded before the
/// damage. See [`ReplayHeader`] for the field-by-field contract.
///
/// # Examples
///
/// ```
/// let header = cohrec::decode(b"too short to be a replay");
/// assert!(!header.success);
/// ```
pub fn decode(data: &[u8]) -> ReplayHeader {
    let mut walker = Walker {
        cur: Cursor::new(data),
        header: ReplayHeader::default(),
    };
    walker.header.success = true;
    if let Err(e) = walker.run() {
        log::warn!("replay header decode stopped early: {e}");
        walker.header.success = false;
    }
    walker.header
}

/// Cursor plus the record being accumulated.
struct Walker<'a> {
    cur: Cursor<'a>,
    header: ReplayHeader,
}

impl Walker<'_> {
    fn run(&mut self) -> Result<(), ReadError> {
        self.header.file_version = Some(self.cur.read_u32()?);

        let magic = self.cur.read_bytes(MAGIC.len())?;
        if magic != &MAGIC[..] {
            // Some producers write the tag loosely; not fatal.
            log::debug!("unexpected magic tag {:?}", String::from_utf8_lossy(magic));
        }

        let raw = self.cur.read_null_terminated_utf16()?;
        self.header.local_date = date::parse_timestamp(&raw);
        self.header.local_date_raw = Some(raw);

        self.cur.seek(SeekFrom::Start(FIRST_CONTAINER_OFFSET))?;

        // First container framing: 12-byte tag, reserved word, version,
        // reserved word, header length.
        let first = self.cur.position();
        self.cur.read_ascii(12)?;
        self.cur.read_u32()?;
        self.header.chunky_version = Some(self.cur.read_u32()?);
        self.cur.read_u32()?;
        let header_len = self.cur.read_u32()?;

        // Two container layouts exist in the wild and both navigation
        // paths land on the second framing: via the declared header
        // length, and via a fixed 96-byte stride. Walk both, in that
        // order, exactly as the producers' own reader does.
        self.cur.seek(SeekFrom::Current(-28))?;
        self.cur.seek(SeekFrom::Current(i64::from(header_len)))?;
        self.cur.seek(SeekFrom::Start(first))?;
        self.cur.seek(SeekFrom::Current(96))?;

        // Second container framing, same shape.
        let second = self.cur.position();
        self.cur.read_ascii(12)?;
        self.cur.read_u32()?;
        self.cur.read_u32()?;
        self.cur.read_u32()?;
        let chunk_len = self.cur.read_u32()?;
        self.cur.seek(SeekFrom::Start(second))?;
        self.cur.seek(SeekFrom::Current(i64::from(chunk_len)))?;

        // The root of the second container holds exactly two sibling
        // chunk trees.
        self.parse_chunk(0)?;
        self.parse_chunk(0)?;
        Ok(())
    }

    /// Parse one chunk (and, for containers, its children), leaving the
    /// cursor on the declared end of the chunk body.
    fn parse_chunk(&mut self, depth: usize) -> Result<(), ReadError> {
        let mut tag = [0u8; 8];
        tag.copy_from_slice(self.cur.read_bytes(8)?);
        let version = self.cur.read_u32()?;
        let length = self.cur.read_u32()?;
        let name_length = self.cur.read_u32()?;
        self.cur.skip(8)?;
        if name_length > 0 {
            self.cur.read_ascii(name_length as usize)?;
        }
        let body_start = self.cur.position();
        let body_end = body_start + length as usize;

        if tag.starts_with(b"FOLD") {
            if depth >= MAX_DEPTH {
                log::warn!("chunk nesting exceeds {MAX_DEPTH} at offset {body_start}, skipping subtree");
                self.header.success = false;
            } else {
                // Each child consumes at least its own 28-byte header
                // before snapping forward, so this loop always advances.
                while self.cur.position() < body_end {
                    self.parse_chunk(depth + 1)?;
                }
            }
        }

        match (&tag, version) {
            (b"DATASDSC", 2004) => self.read_scenario_description()?,
            (b"DATABASE", 11) => self.read_match_settings()?,
            (b"DATAINFO", 6) => self.read_player()?,
            _ => log::debug!(
                "skipping chunk {} v{version}",
                String::from_utf8_lossy(&tag)
            ),
        }

        // Boundary snap: wherever the body reads ended up, the next
        // sibling starts at the declared end of this body.
        self.cur.seek(SeekFrom::Start(body_end))?;
        Ok(())
    }

    /// `DATASDSC` v2004: scenario identity — mod, map file, map text
    /// codes, map dimensions.
    fn read_scenario_description(&mut self) -> Result<(), ReadError> {
        self.cur.read_u32()?;
        self.header.scenario_date_raw = Some(self.cur.read_length_prefixed_utf16()?);
        self.cur.read_u32()?;
        self.cur.read_u32()?;
        self.cur.read_u32()?;
        self.header.mod_name = Some(self.cur.read_length_prefixed_ascii()?);
        self.header.map_file_name = Some(self.cur.read_length_prefixed_ascii()?);
        self.cur.read_u32()?;
        self.cur.read_u32()?;
        self.cur.read_u32()?;
        self.cur.read_u32()?;
        self.cur.read_u32()?;
        self.header.map_name_code = Some(self.cur.read_length_prefixed_utf16()?);

        // Some producers duplicate the map name here; the word is the
        // character count of the copy, zero when absent.
        let duplicate = self.cur.read_u32()?;
        if duplicate != 0 {
            self.cur.read_utf16(duplicate as usize)?;
        }

        self.header.map_description_code = Some(self.cur.read_length_prefixed_utf16()?);
        self.cur.read_u32()?;
        self.header.map_width = Some(self.cur.read_u32()?);
        self.header.map_height = Some(self.cur.read_u32()?);
        self.cur.read_u32()?;
        self.cur.read_u32()?;
        self.cur.read_u32()?;
        Ok(())
    }

    /// `DATABASE` v11: lobby settings — resources, victory points,
    /// match type, game version.
    fn read_match_settings(&mut self) -> Result<(), ReadError> {
        self.cur.skip(16)?;
        self.header.random_start = self.cur.read_u32()? != 0;
        self.cur.read_u32()?; // "COLS" marker
        self.header.high_resources = self.cur.read_u32()? == 1;
        self.cur.read_u32()?; // "TSSR" marker
        let exponent = self.cur.read_u32()?;
        self.header.victory_point_count = 2u32
            .checked_pow(exponent)
            .and_then(|scale| scale.checked_mul(250));
        self.cur.skip(5)?;
        self.header.replay_name = Some(self.cur.read_length_prefixed_utf16()?);
        self.cur.skip(8)?;
        self.header.victory_point_game = self.cur.read_u32()? == VICTORY_POINT_MAGIC;
        self.cur.skip(23)?;
        self.cur.read_length_prefixed_ascii()?; // minor game version
        self.cur.skip(4)?;
        self.cur.read_length_prefixed_ascii()?; // major game version
        self.cur.skip(8)?;
        if self.cur.read_u32()? == 2 {
            self.cur.read_length_prefixed_ascii()?;
            self.header.game_version = Some(self.cur.read_length_prefixed_ascii()?);
        }
        self.cur.read_length_prefixed_ascii()?;

        let match_type = self.cur.read_length_prefixed_ascii()?;
        self.header.match_type = Some(if match_type == KOREAN_AUTOMATCH_GARBLE {
            "automatch".to_string()
        } else {
            match_type
        });
        Ok(())
    }

    /// `DATAINFO` v6: one player slot.
    fn read_player(&mut self) -> Result<(), ReadError> {
        let name = self.cur.read_length_prefixed_utf16()?;
        self.cur.read_u32()?;
        self.cur.read_u32()?;
        let faction = self.cur.read_length_prefixed_ascii()?;
        self.cur.read_u32()?;
        self.cur.read_u32()?;
        self.header.players.push(PlayerEntry { name, faction });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(tag: &str, version: u32, body: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(tag.as_bytes());
        out.extend_from_slice(&version.to_le_bytes());
        out.extend_from_slice(&(body.len() as u32).to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes()); // no name
        out.extend_from_slice(&[0u8; 8]);
        out.extend_from_slice(body);
        out
    }

    fn walker(data: &[u8]) -> Walker<'_> {
        Walker {
            cur: Cursor::new(data),
            header: ReplayHeader::default(),
        }
    }

    #[test]
    fn unknown_chunk_snaps_to_declared_boundary() {
        let data = chunk("DATAJUNK", 99, &[0xAB; 37]);
        let mut w = walker(&data);
        w.parse_chunk(0).unwrap();
        assert_eq!(w.cur.position(), data.len());
        assert_eq!(w.header, ReplayHeader::default());
    }

    #[test]
    fn known_chunk_with_trailing_slack_snaps_too() {
        // A player chunk whose body is longer than its fields.
        let mut body = Vec::new();
        body.extend_from_slice(&3u32.to_le_bytes());
        body.extend(
            "Rex".encode_utf16().flat_map(u16::to_le_bytes),
        );
        body.extend_from_slice(&[0u8; 8]);
        body.extend_from_slice(&4u32.to_le_bytes());
        body.extend_from_slice(b"axis");
        body.extend_from_slice(&[0u8; 8]);
        body.extend_from_slice(&[0xEE; 12]); // slack the reader ignores
        let data = chunk("DATAINFO", 6, &body);

        let mut w = walker(&data);
        w.parse_chunk(0).unwrap();
        assert_eq!(w.cur.position(), data.len());
        assert_eq!(w.header.players.len(), 1);
        assert_eq!(w.header.players[0].name, "Rex");
        assert_eq!(w.header.players[0].faction, "axis");
    }

    #[test]
    fn fold_descends_into_children() {
        let mut body = Vec::new();
        body.extend_from_slice(&3u32.to_le_bytes());
        body.extend(
            "Ivy".encode_utf16().flat_map(u16::to_le_bytes),
        );
        body.extend_from_slice(&[0u8; 8]);
        body.extend_from_slice(&6u32.to_le_bytes());
        body.extend_from_slice(b"allies");
        body.extend_from_slice(&[0u8; 8]);
        let child = chunk("DATAINFO", 6, &body);
        let data = chunk("FOLDINFO", 1, &child);

        let mut w = walker(&data);
        w.parse_chunk(0).unwrap();
        assert_eq!(w.cur.position(), data.len());
        assert_eq!(w.header.players.len(), 1);
    }

    #[test]
    fn unknown_version_of_known_tag_is_skipped() {
        let data = chunk("DATAINFO", 7, &[0xCD; 20]);
        let mut w = walker(&data);
        w.parse_chunk(0).unwrap();
        assert_eq!(w.cur.position(), data.len());
        assert!(w.header.players.is_empty());
    }

    #[test]
    fn corrupt_length_is_out_of_range() {
        let mut data = chunk("DATAJUNK", 1, &[0; 4]);
        // Declared body length far past the end of the buffer.
        data[12..16].copy_from_slice(&0xFFFF_FFFFu32.to_le_bytes());
        let mut w = walker(&data);
        assert!(w.parse_chunk(0).is_err());
    }

    #[test]
    fn pathological_nesting_stops_at_ceiling() {
        // FOLD chunks nested beyond the ceiling, innermost first.
        let mut data = chunk("FOLDDEEP", 1, &[]);
        for _ in 0..(MAX_DEPTH + 8) {
            data = chunk("FOLDDEEP", 1, &data);
        }
        let mut w = walker(&data);
        w.header.success = true;
        w.parse_chunk(0).unwrap();
        assert_eq!(w.cur.position(), data.len());
        assert!(!w.header.success);
    }

    #[test]
    fn named_chunk_body_starts_after_name() {
        let mut data = Vec::new();
        data.extend_from_slice(b"DATAJUNK");
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&2u32.to_le_bytes()); // body length
        data.extend_from_slice(&4u32.to_le_bytes()); // name length
        data.extend_from_slice(&[0u8; 8]);
        data.extend_from_slice(b"name");
        data.extend_from_slice(&[0xAA, 0xBB]);
        let mut w = walker(&data);
        w.parse_chunk(0).unwrap();
        assert_eq!(w.cur.position(), data.len());
    }
}
