//! Proportional text splitter.
//!
//! Partitions a translated string into exactly `N` non-empty parts on
//! linguistic boundaries, with cut positions searched in a window around
//! the ideal proportional cut.

use crate::error::{TdseError, TdseResult};

const BREAK_PREFERENCE: &[&str] = &[
    ". ", "! ", "? ", "; ", ", ", " ", ".", "!", "?", ";", ",",
];

/// Splits `text` into exactly `n` non-empty parts.
///
/// `window_fraction` controls how far the search for a break character may
/// wander from the ideal cut, as a fraction of `|T|/N`.
///
/// # Errors
///
/// Returns [`TdseError::Other`] wrapping an `EmptyTarget`-style message if
/// `n == 0`.
pub fn split_proportionally(text: &str, n: usize, window_fraction: f32) -> TdseResult<Vec<String>> {
    if n == 0 {
        return Err(TdseError::Other(anyhow::anyhow!(
            "EmptyTarget: split target part count must be >= 1"
        )));
    }

    let chars: Vec<char> = text.chars().collect();
    let total = chars.len();

    if n == 1 {
        return Ok(vec![chars.into_iter().collect()]);
    }

    let step = total as f64 / n as f64;
    let window = (window_fraction as f64 * step).round() as i64;

    let mut parts = Vec::with_capacity(n);
    let mut cursor = 0usize;

    for i in 0..n {
        if cursor >= total {
            break;
        }
        if i == n - 1 {
            parts.push(chars[cursor..total].iter().collect::<String>());
            cursor = total;
            break;
        }

        let ideal = ((i + 1) as f64 * step).round() as i64;
        let lo = (ideal - window).max(cursor as i64 + 1) as usize;
        let hi = (ideal + window).clamp(0, total as i64) as usize;

        let cut = find_best_break(&chars, cursor, lo.min(total), hi, ideal);

        let cut = match cut {
            Some(c) if c > cursor => c,
            _ => {
                let fallback = cursor + ((total as f64 / n as f64).ceil() as usize).max(1);
                fallback.min(total)
            }
        };

        parts.push(chars[cursor..cut].iter().collect::<String>());
        cursor = cut;
    }

    while parts.len() < n {
        parts.push(" ".to_string());
    }
    parts.truncate(n);

    for part in parts.iter_mut() {
        if part.trim().is_empty() {
            *part = " ".to_string();
        }
    }

    Ok(parts)
}

/// Searches `[lo, hi]` for the best break position, preferring earlier entries
/// in [`BREAK_PREFERENCE`] and, within a preference class, the candidate
/// closest to `ideal`.
fn find_best_break(chars: &[char], lo_bound: usize, lo: usize, hi: usize, ideal: i64) -> Option<usize> {
    let lo = lo.max(lo_bound);
    let hi = hi.min(chars.len());
    if lo >= hi {
        return None;
    }

    for pattern in BREAK_PREFERENCE {
        let pat_chars: Vec<char> = pattern.chars().collect();
        let mut best: Option<(i64, usize)> = None;

        for start in lo..hi {
            if start + pat_chars.len() > chars.len() {
                continue;
            }
            if chars[start..start + pat_chars.len()] == pat_chars[..] {
                let cut = start + pat_chars.len();
                let distance = (cut as i64 - ideal).abs();
                if best.map(|(d, _)| distance < d).unwrap_or(true) {
                    best = Some((distance, cut));
                }
            }
        }

        if let Some((_, cut)) = best {
            return Some(cut);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_into_exactly_n_non_empty_parts() {
        let parts = split_proportionally("Hello world. This is a test sentence.", 3, 0.2).unwrap();
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| !p.is_empty()));
    }

    #[test]
    fn single_part_returns_whole_text() {
        let parts = split_proportionally("ciao", 1, 0.2).unwrap();
        assert_eq!(parts, vec!["ciao".to_string()]);
    }

    #[test]
    fn one_char_per_part_still_yields_n_parts() {
        let text = "abcde";
        let parts = split_proportionally(text, text.chars().count(), 0.2).unwrap();
        assert_eq!(parts.len(), text.chars().count());
    }

    #[test]
    fn pads_short_text_with_spaces() {
        let parts = split_proportionally("hi", 5, 0.2).unwrap();
        assert_eq!(parts.len(), 5);
        assert!(parts.iter().all(|p| !p.is_empty()));
    }

    #[test]
    fn rejects_zero_parts() {
        assert!(split_proportionally("text", 0, 0.2).is_err());
    }

    #[test]
    fn handles_multibyte_utf8_by_scalar_count() {
        let text = "日本語のテキストです。翻訳されました。";
        let parts = split_proportionally(text, 2, 0.2).unwrap();
        assert_eq!(parts.len(), 2);
        let rejoined: String = parts.concat();
        assert_eq!(rejoined.chars().count(), text.chars().count());
    }
}
