//! The decoded replay header record.

use chrono::NaiveDateTime;
use smallvec::SmallVec;
use std::fmt;

/// One participating player, in lobby slot order.
///
/// # Examples
///
/// ```
/// use cohrec::PlayerEntry;
///
/// let player = PlayerEntry {
///     name: "Stug Life".into(),
///     faction: "axis".into(),
/// };
/// assert_eq!(player.faction, "axis");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PlayerEntry {
    /// In-game player name.
    pub name: String,
    /// Faction identifier string (e.g. `"allies"`, `"axis"`).
    pub faction: String,
}

/// Players in order of appearance in the chunk tree, which is the lobby
/// slot order of the match.
///
/// Retail lobbies hold at most eight players, so the list stays inline.
pub type PlayerList = SmallVec<[PlayerEntry; 8]>;

/// Resolves short map-text codes (`"$12345"`) to full localized text.
///
/// Implemented by locale-table loaders such as `cohrec-ucs`. The decoder
/// never calls this itself; map text is an enrichment step the caller
/// runs after [`decode`](crate::decode) via
/// [`ReplayHeader::resolve_map_text`].
pub trait TextResolver {
    /// Full display text for `code`, or `None` when the code is unknown.
    fn resolve(&self, code: &str) -> Option<String>;
}

/// Match facts decoded from a replay header.
///
/// Every field starts absent (or false) and is filled only by a fully
/// successful read, so a partial decode — signalled by `success` being
/// false — still carries everything extracted before the damage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReplayHeader {
    /// Replay file format version, the first word of the file.
    pub file_version: Option<u32>,
    /// Version of the outer container framing.
    pub chunky_version: Option<u32>,
    /// Whether starting positions were randomized.
    pub random_start: bool,
    /// Whether the match used the high-resources setting.
    pub high_resources: bool,
    /// Victory point target, decoded from its stored exponent
    /// (`250 * 2^n`). `None` when the exponent would overflow.
    pub victory_point_count: Option<u32>,
    /// Whether the match was played in victory-point mode rather than
    /// annihilation.
    pub victory_point_game: bool,
    /// Match kind, e.g. `"automatch"` or `"skirmish"`.
    pub match_type: Option<String>,
    /// Recorded-at timestamp recovered from `local_date_raw`.
    pub local_date: Option<NaiveDateTime>,
    /// The locale-formatted date string exactly as stored.
    pub local_date_raw: Option<String>,
    /// Unparsed date string from the scenario description chunk.
    pub scenario_date_raw: Option<String>,
    /// Name the replay was saved under.
    pub replay_name: Option<String>,
    /// Game version string, when the producer recorded one.
    pub game_version: Option<String>,
    /// Module (mod) the match was played with, `"RelicCOH"` for retail.
    pub mod_name: Option<String>,
    /// Map name as a locale-table code (`"$12345"`).
    pub map_name_code: Option<String>,
    /// Scenario file path of the map.
    pub map_file_name: Option<String>,
    /// Map description as a locale-table code.
    pub map_description_code: Option<String>,
    /// Map width in game cells.
    pub map_width: Option<u32>,
    /// Map height in game cells.
    pub map_height: Option<u32>,
    /// Localized map name; absent until [`resolve_map_text`] succeeds.
    ///
    /// [`resolve_map_text`]: ReplayHeader::resolve_map_text
    pub map_name: Option<String>,
    /// Localized map description; absent until resolved.
    pub map_description: Option<String>,
    /// Participating players in lobby slot order.
    pub players: PlayerList,
    /// False when any part of the header failed to decode; the populated
    /// fields are still valid best-effort output.
    pub success: bool,
}

impl ReplayHeader {
    /// Fill `map_name` and `map_description` from their codes.
    ///
    /// Called by the consumer after decoding, with whatever locale table
    /// it has on hand. Codes the resolver does not know leave the
    /// corresponding field absent; the code fields themselves are kept
    /// either way.
    pub fn resolve_map_text(&mut self, resolver: &dyn TextResolver) {
        if let Some(code) = &self.map_name_code {
            self.map_name = resolver.resolve(code);
        }
        if let Some(code) = &self.map_description_code {
            self.map_description = resolver.resolve(code);
        }
    }
}

fn opt(value: &Option<impl fmt::Display>) -> String {
    value
        .as_ref()
        .map_or_else(|| "-".to_string(), ToString::to_string)
}

impl fmt::Display for ReplayHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "success             : {}", self.success)?;
        writeln!(f, "file version        : {}", opt(&self.file_version))?;
        writeln!(f, "chunky version      : {}", opt(&self.chunky_version))?;
        writeln!(f, "match type          : {}", opt(&self.match_type))?;
        writeln!(f, "replay name         : {}", opt(&self.replay_name))?;
        writeln!(f, "game version        : {}", opt(&self.game_version))?;
        writeln!(f, "mod                 : {}", opt(&self.mod_name))?;
        writeln!(f, "recorded            : {}", opt(&self.local_date))?;
        writeln!(f, "recorded (raw)      : {}", opt(&self.local_date_raw))?;
        writeln!(f, "map file            : {}", opt(&self.map_file_name))?;
        writeln!(f, "map name            : {}", opt(&self.map_name))?;
        writeln!(f, "map name code       : {}", opt(&self.map_name_code))?;
        writeln!(f, "map description     : {}", opt(&self.map_description))?;
        writeln!(f, "map size            : {} x {}", opt(&self.map_width), opt(&self.map_height))?;
        writeln!(f, "random start        : {}", self.random_start)?;
        writeln!(f, "high resources      : {}", self.high_resources)?;
        writeln!(f, "victory points      : {}", opt(&self.victory_point_count))?;
        writeln!(f, "victory point mode  : {}", self.victory_point_game)?;
        writeln!(f, "players             : {}", self.players.len())?;
        for (slot, player) in self.players.iter().enumerate() {
            writeln!(f, "  {}. {} ({})", slot + 1, player.name, player.faction)?;
        }
        Ok(())
    }
}
