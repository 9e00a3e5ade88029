//! Relic UCS locale tables and map-text resolution.
//!
//! The game localizes map names and descriptions through `.ucs` tables:
//! UTF-16LE text files with one `id<TAB>text` entry per line. Replay
//! headers carry only the `$id` codes; [`UcsTable`] loads a table and
//! implements [`TextResolver`] so a decoded header can be enriched with
//! the display text:
//!
//! ```no_run
//! use cohrec_ucs::UcsTable;
//! # fn main() -> std::io::Result<()> {
//! let table = UcsTable::load("RelicCOH.English.ucs".as_ref())?;
//! let mut header = cohrec::decode(&std::fs::read("match.rec")?);
//! header.resolve_map_text(&table);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

use cohrec::TextResolver;
use indexmap::IndexMap;
use std::fs;
use std::io;
use std::path::Path;

/// An in-memory locale table mapping numeric ids to display text.
///
/// Entries keep the file's order. A duplicated id keeps its first
/// position and takes the later text.
#[derive(Clone, Debug, Default)]
pub struct UcsTable {
    entries: IndexMap<u32, String>,
}

impl UcsTable {
    /// Load a `.ucs` file from disk.
    pub fn load(path: &Path) -> io::Result<Self> {
        let bytes = fs::read(path)?;
        Ok(Self::from_utf16le(&bytes))
    }

    /// Build a table from raw UTF-16LE file bytes.
    ///
    /// Decoding is lossy: unpaired surrogates become replacement
    /// characters rather than failing the whole table, and a trailing
    /// odd byte is ignored.
    pub fn from_utf16le(bytes: &[u8]) -> Self {
        let units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        let text = String::from_utf16_lossy(&units);
        Self::from_text(text.strip_prefix('\u{feff}').unwrap_or(&text))
    }

    /// Build a table from already-decoded text.
    ///
    /// Lines without a tab separator or without a numeric leading field
    /// are skipped. Text fields may themselves contain tabs; they are
    /// folded to single spaces.
    pub fn from_text(text: &str) -> Self {
        let mut entries = IndexMap::new();
        for line in text.lines() {
            let Some((id_field, rest)) = line.split_once('\t') else {
                continue;
            };
            let Ok(id) = id_field.trim().parse::<u32>() else {
                log::debug!("skipping malformed ucs line: {line:?}");
                continue;
            };
            let value = rest
                .split('\t')
                .collect::<Vec<_>>()
                .join(" ")
                .trim()
                .to_string();
            entries.insert(id, value);
        }
        Self { entries }
    }

    /// Display text for a numeric id.
    pub fn get(&self, id: u32) -> Option<&str> {
        self.entries.get(&id).map(String::as_str)
    }

    /// Number of entries in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TextResolver for UcsTable {
    fn resolve(&self, code: &str) -> Option<String> {
        let id = code.strip_prefix('$')?.trim().parse::<u32>().ok()?;
        self.get(id).map(str::to_string)
    }
}
