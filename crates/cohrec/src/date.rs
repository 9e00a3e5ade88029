//! Locale-heuristic parsing of the replay's recorded-at date string.
//!
//! The game stamps the header with the machine's locale-formatted date,
//! so the same field arrives as `25.12.2023 14:30`, `12/25/2023 2:30 PM`,
//! or `2023/12/25 오후 2:30` depending on where the replay was saved.
//! Three matchers run in order and the first whose shape fits wins; a
//! string none of them fit is not an error, since the raw text is kept on
//! the header either way.

use chrono::{NaiveDate, NaiveDateTime};
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Korean "afternoon" marker, the only non-Latin meridiem the format has
/// been observed to produce.
const KOREAN_PM: &str = "오후";

/// 24-hour `DD.MM.YYYY HH:MM` with any single non-digit separators.
fn european() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{2})\D(\d{2})\D(\d{4})\s(\d{2})\D(\d{2})").expect("static pattern")
    })
}

/// 12-hour `M/D/YYYY h:mm ... XM` with non-padded fields and a trailing
/// meridiem letter.
fn us() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{1,2})\D(\d{1,2})\D(\d{4})\s(\d{1,2})\D(\d{2}).*?([APap])M")
            .expect("static pattern")
    })
}

/// `YYYY/MM/DD <meridiem> H:MM` where the meridiem is a run of non-ASCII
/// characters.
fn asian() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{4})\D(\d{2})\D(\d{2})\s([^\x00-\x7F]+)\s(\d{1,2})\D(\d{2})")
            .expect("static pattern")
    })
}

fn group(caps: &Captures<'_>, index: usize) -> Option<u32> {
    caps.get(index)?.as_str().parse().ok()
}

fn build(year: u32, month: u32, day: u32, hour: u32, minute: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year as i32, month, day)?.and_hms_opt(hour, minute, 0)
}

/// Recover a timestamp from a locale-formatted date string.
///
/// The first matcher whose shape fits decides the interpretation; if its
/// numeric fields do not form a valid calendar date and time the result
/// is `None` without consulting the remaining matchers. Hour overflow
/// from the meridiem adjustment (a 12 PM input) is rejected the same
/// way.
///
/// # Examples
///
/// ```
/// use cohrec::parse_timestamp;
///
/// let ts = parse_timestamp("25.12.2023 14:30").unwrap();
/// assert_eq!(ts.to_string(), "2023-12-25 14:30:00");
/// assert!(parse_timestamp("last tuesday").is_none());
/// ```
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    if let Some(caps) = european().captures(text) {
        return build(
            group(&caps, 3)?,
            group(&caps, 2)?,
            group(&caps, 1)?,
            group(&caps, 4)?,
            group(&caps, 5)?,
        );
    }

    if let Some(caps) = us().captures(text) {
        let mut hour = group(&caps, 4)?;
        if caps
            .get(6)
            .is_some_and(|m| m.as_str().eq_ignore_ascii_case("p"))
        {
            hour += 12;
        }
        return build(
            group(&caps, 3)?,
            group(&caps, 1)?,
            group(&caps, 2)?,
            hour,
            group(&caps, 5)?,
        );
    }

    if let Some(caps) = asian().captures(text) {
        let mut hour = group(&caps, 5)?;
        if caps.get(4).map(|m| m.as_str()) == Some(KOREAN_PM) {
            hour += 12;
        }
        return build(
            group(&caps, 1)?,
            group(&caps, 2)?,
            group(&caps, 3)?,
            hour,
            group(&caps, 6)?,
        );
    }

    None
}
