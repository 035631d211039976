//! Calendar-day helpers for bucketing and labelling.

use chrono::{DateTime, Duration as ChronoDuration, FixedOffset, NaiveDate, Offset, Utc};
use std::str::FromStr;

/// Which calendar a timestamp's day is taken from.
///
/// `Utc` keys buckets and window days by the UTC date while labels are
/// rendered in the display offset, so events close to midnight can land
/// under a neighbouring label. `Display` keys everything by the display date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayBoundary {
    #[default]
    Utc,
    Display,
}

impl FromStr for DayBoundary {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utc" => Ok(DayBoundary::Utc),
            "display" | "local" => Ok(DayBoundary::Display),
            other => Err(format!("unknown day boundary: {}", other)),
        }
    }
}

/// Calendar day of `instant` under the given boundary.
pub fn day_key(instant: DateTime<Utc>, boundary: DayBoundary, offset: FixedOffset) -> NaiveDate {
    match boundary {
        DayBoundary::Utc => instant.date_naive(),
        DayBoundary::Display => instant.with_timezone(&offset).date_naive(),
    }
}

/// Short date label such as `Jan 5`, in the display offset.
pub fn short_label(instant: DateTime<Utc>, offset: FixedOffset) -> String {
    instant.with_timezone(&offset).format("%b %-d").to_string()
}

/// Date and time in the display offset, used by the tables.
pub fn local_timestamp(instant: DateTime<Utc>, offset: FixedOffset) -> String {
    instant
        .with_timezone(&offset)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// The `days` instants `now - (days-1)d ..= now`, oldest first.
///
/// Days that would fall outside the representable date range are skipped.
pub fn trailing_days(now: DateTime<Utc>, days: u32) -> impl Iterator<Item = DateTime<Utc>> {
    (0..days as i64)
        .rev()
        .filter_map(move |i| now.checked_sub_signed(ChronoDuration::try_days(i)?))
}

/// Parse a display offset such as `+09:00`, `-0530`, `+9`, `Z` or `UTC`.
pub fn parse_offset(s: &str) -> Option<FixedOffset> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return Some(Utc.fix());
    }

    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    if !rest.is_ascii() {
        return None;
    }

    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None if rest.len() == 4 => rest.split_at(2),
        None => (rest, "0"),
    };

    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
