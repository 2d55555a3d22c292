//! Timestamp parsing for post `created_at` strings, e.g. `Wed Dec 20 10:35:09 +0800 2023`.

use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

pub const SECONDS_PER_DAY: f64 = 86_400.0;

const ZERO_PADDED: &[FormatItem<'static>] = format_description!(
    "[weekday repr:short case_sensitive:false] [month repr:short case_sensitive:false] [day] [hour]:[minute]:[second] [offset_hour sign:mandatory][offset_minute] [year]"
);

const UNPADDED: &[FormatItem<'static>] = format_description!(
    "[weekday repr:short case_sensitive:false] [month repr:short case_sensitive:false] [day padding:none] [hour]:[minute]:[second] [offset_hour sign:mandatory][offset_minute] [year]"
);

const SPACE_PADDED: &[FormatItem<'static>] = format_description!(
    "[weekday repr:short case_sensitive:false] [month repr:short case_sensitive:false] [day padding:space] [hour]:[minute]:[second] [offset_hour sign:mandatory][offset_minute] [year]"
);

/// Patterns in the order they are tried.
const PATTERNS: [&[FormatItem<'static>]; 3] = [ZERO_PADDED, UNPADDED, SPACE_PADDED];

/// Parse a `created_at` value. Returns `None` when no pattern matches.
///
/// After the ordered patterns are exhausted, the string is retried once against
/// the first pattern with all whitespace runs collapsed to single spaces.
pub fn parse_created_at(raw: &str) -> Option<OffsetDateTime> {
    for pattern in PATTERNS {
        if let Ok(dt) = OffsetDateTime::parse(raw, pattern) {
            return Some(dt);
        }
    }
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    OffsetDateTime::parse(&collapsed, ZERO_PADDED).ok()
}

/// Fractional days from `ts` up to `latest`. Negative when `ts` is later.
pub fn age_in_days(latest: OffsetDateTime, ts: OffsetDateTime) -> f64 {
    (latest - ts).as_seconds_f64() / SECONDS_PER_DAY
}
