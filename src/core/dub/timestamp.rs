//! Recognizer timestamp ingest.
//!
//! Accepts either bare milliseconds or `HH:MM:SS,mmm` / `HH:MM:SS.mmm` strings
//! and normalizes both to seconds. Generalized from the teacher's SRT
//! timestamp parser to also accept the `.` millisecond separator used by
//! WebVTT-style sources and a plain numeric-milliseconds form.

use crate::error::{TdseError, TdseResult};

/// Parses a recognizer timestamp into seconds.
///
/// Accepts:
/// - A bare integer or float of milliseconds (e.g. `"1500"`, `"1500.0"`).
/// - `HH:MM:SS,mmm` or `HH:MM:SS.mmm`. Missing milliseconds default to 0;
///   more than three digits of milliseconds are truncated to three.
pub fn parse_timestamp(raw: &str) -> TdseResult<f64> {
    let raw = raw.trim();

    if let Ok(ms) = raw.parse::<f64>() {
        return Ok(ms / 1000.0);
    }

    let fields: Vec<&str> = raw.split(':').collect();
    if fields.len() != 3 {
        return Err(TdseError::bad_timestamp(raw.to_string()));
    }

    let hours: u64 = fields[0]
        .parse()
        .map_err(|_| TdseError::bad_timestamp(raw.to_string()))?;
    let minutes: u64 = fields[1]
        .parse()
        .map_err(|_| TdseError::bad_timestamp(raw.to_string()))?;

    let sec_field = fields[2];
    let sep_pos = sec_field
        .find(|c| c == ',' || c == '.')
        .ok_or_else(|| TdseError::bad_timestamp(raw.to_string()))?;
    let (sec_part, ms_part) = sec_field.split_at(sep_pos);
    let ms_part = &ms_part[1..];

    let seconds: u64 = sec_part
        .parse()
        .map_err(|_| TdseError::bad_timestamp(raw.to_string()))?;

    let ms_digits: String = ms_part.chars().take(3).collect();
    let milliseconds: u64 = if ms_digits.is_empty() {
        0
    } else {
        let padded = format!("{:0<3}", ms_digits);
        padded
            .parse()
            .map_err(|_| TdseError::bad_timestamp(raw.to_string()))?
    };

    let total_ms = hours * 3_600_000 + minutes * 60_000 + seconds * 1000 + milliseconds;
    Ok(total_ms as f64 / 1000.0)
}

/// Formats seconds back into `HH:MM:SS,mmm`, the inverse of [`parse_timestamp`]'s
/// comma-separated form.
pub fn format_timestamp(seconds: f64) -> String {
    let total_ms = (seconds * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let ms = total_ms % 1000;
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, ms)
}
