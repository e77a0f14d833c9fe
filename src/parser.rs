//! Pure parsers for the loosely formatted values catalog pages carry.
//!
//! Every function returns `None` when the input cannot be understood; callers
//! treat that as "field not found" and move on to the next source. Sites
//! publish `0` for a running time or rating they do not know, so
//! [`parse_runtime`] and [`parse_score`] report zero as `None` too.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{4})\s*[-/.年]\s*(\d{1,2})\s*[-/.月]\s*(\d{1,2})").unwrap()
});

static ISO_DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^P(?:\d+D)?T(?:(\d+(?:\.\d+)?)H)?(?:(\d+(?:\.\d+)?)M)?(?:(\d+(?:\.\d+)?)S)?$")
        .unwrap()
});

static CLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,3}):(\d{1,2})(?::(\d{1,2}))?$").unwrap());

static INT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

static FLOAT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").unwrap());

/// Parse a calendar date.
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, `YYYY.MM.DD`, `YYYY年MM月DD日` and the
/// date part of full timestamps such as `2021-01-02T10:00:00+09:00`.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(parse_date("2021/1/2"), NaiveDate::from_ymd_opt(2021, 1, 2));
/// assert_eq!(parse_date("unknown"), None);
/// ```
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let caps = DATE_RE.captures(s.trim())?;
    let year = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    let day = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse a running time into whole minutes.
///
/// Tries an ISO-8601 duration (`PT1H2M30S`), then a clock form
/// (`HH:MM:SS` or `MM:SS`), then the first integer in the string (`120分`).
pub fn parse_runtime(s: &str) -> Option<u32> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(caps) = ISO_DURATION_RE.captures(s) {
        // a bare `PT` carries no duration
        if (1..=3).all(|i| caps.get(i).is_none()) {
            return None;
        }
        let part = |i: usize| {
            caps.get(i)
                .and_then(|m| m.as_str().parse::<f64>().ok())
                .unwrap_or(0.0)
        };
        let minutes = part(1) * 60.0 + part(2) + part(3) / 60.0;
        return nonzero(minutes.round() as u32);
    }

    if let Some(caps) = CLOCK_RE.captures(s) {
        let a: f64 = caps[1].parse().ok()?;
        let b: f64 = caps[2].parse().ok()?;
        let minutes = match caps.get(3) {
            Some(sec) => a * 60.0 + b + sec.as_str().parse::<f64>().ok()? / 60.0,
            None => a + b / 60.0,
        };
        return nonzero(minutes.round() as u32);
    }

    INT_RE.find(s)?.as_str().parse().ok().and_then(nonzero)
}

fn nonzero(minutes: u32) -> Option<u32> {
    (minutes > 0).then_some(minutes)
}

/// Parse a rating value such as `"4.5"` or `"4.5 / 5"`.
pub fn parse_score(s: &str) -> Option<f64> {
    let score: f64 = FLOAT_RE.find(s.trim())?.as_str().parse().ok()?;
    (score > 0.0).then_some(score)
}

/// Strict integer parse of the trimmed input.
pub fn parse_int(s: &str) -> Option<i64> {
    s.trim().parse().ok()
}
