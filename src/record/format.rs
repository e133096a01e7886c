//! Cell formatting conventions shared by every on-disk format.

#![allow(clippy::cast_precision_loss)]

use std::borrow::Cow;

use chrono::NaiveDateTime;

/// Timestamp layout used inside records: `yyyy:MM:dd HH:mm:ss:fff`.
pub const RECORD_TIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S:%3f";

/// Timestamp layout for section headers: `yyyy-MM-dd HH:mm:ss`.
pub const SECTION_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Placeholder text for one absent numeric cell.
pub const ZERO_CELL: &str = "0.000";

/// Fixed 3-decimal rendering applied to every measured value.
#[must_use]
pub fn format_measure(value: f64) -> String {
    format!("{value:.3}")
}

/// Render a record timestamp.
#[must_use]
pub fn format_timestamp(at: &NaiveDateTime) -> String {
    at.format(RECORD_TIME_FORMAT).to_string()
}

/// Elapsed seconds from `start` to `end` (negative when reversed).
#[must_use]
pub fn tact_seconds(start: &NaiveDateTime, end: &NaiveDateTime) -> f64 {
    (*end - *start).num_milliseconds() as f64 / 1000.0
}

/// Make free text safe for a single CSV cell.
///
/// Line breaks become spaces so a record never spans lines; cells holding a
/// comma or quote are quoted with doubled inner quotes.
#[must_use]
pub fn csv_text(raw: &str) -> Cow<'_, str> {
    let flat = single_line(raw);
    if flat.contains([',', '"']) {
        Cow::Owned(format!("\"{}\"", flat.replace('"', "\"\"")))
    } else {
        flat
    }
}

/// Make free text safe for a `key=value` line.
#[must_use]
pub fn single_line(raw: &str) -> Cow<'_, str> {
    if raw.contains(['\r', '\n']) {
        Cow::Owned(raw.replace(['\r', '\n'], " "))
    } else {
        Cow::Borrowed(raw)
    }
}
