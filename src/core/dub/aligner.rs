//! Segment aligner.
//!
//! Produces a list of [`TimedSegment`]s from translated parts and recognizer
//! intervals, under the three count regimes described in the module's design
//! notes: one-to-one (M=R), grouping (M<R), and overlap-repairing
//! redistribution (M>R).

use crate::core::dub::types::{RecognizerSegment, TimedSegment};
use crate::error::{TdseError, TdseResult};

/// Redistributes an overlapping run's shared interval among its members.
///
/// The aligner calls this only when a maximal run of segments has collapsed
/// onto a single recognizer interval; implementations decide how to split
/// `[run_start, run_end]` among `parts.len()` slots.
pub trait RedistributionPolicy {
    fn redistribute(&self, parts: &[String], run_start: f64, run_end: f64) -> Vec<(f64, f64)>;
}

/// Default redistribution: proportional to each part's character count.
pub struct CharCountPolicy;

impl RedistributionPolicy for CharCountPolicy {
    fn redistribute(&self, parts: &[String], run_start: f64, run_end: f64) -> Vec<(f64, f64)> {
        let counts: Vec<usize> = parts.iter().map(|p| p.chars().count().max(1)).collect();
        let total: usize = counts.iter().sum();
        let span = run_end - run_start;

        let mut cursor = run_start;
        let mut out = Vec::with_capacity(parts.len());
        for (i, count) in counts.iter().enumerate() {
            let share = span * (*count as f64 / total as f64);
            let end = if i == counts.len() - 1 {
                run_end
            } else {
                cursor + share
            };
            out.push((cursor, end));
            cursor = end;
        }
        out
    }
}

/// Aligns `translated_parts` against `recognizer_segments`, producing timed
/// segments under whichever count regime applies.
///
/// Warns (`log::warn!`) on any recognizer segment that needed inverted/
/// zero-duration repair, on any inter-segment gap wider than
/// `gap_warn_threshold_s`, and on any residual overlap left after repair —
/// none of these are fatal, but all three are signals of upstream recognizer
/// trouble worth surfacing.
pub fn align(
    translated_parts: &[String],
    recognizer_segments: &[RecognizerSegment],
    original_duration_s: f64,
    policy: &dyn RedistributionPolicy,
    gap_warn_threshold_s: f64,
) -> TdseResult<Vec<TimedSegment>> {
    for seg in recognizer_segments {
        if !seg.start_s.is_finite() || !seg.end_s.is_finite() {
            return Err(TdseError::invalid_timestamps(
                "recognizer segment has a non-finite timestamp".to_string(),
            ));
        }
    }

    for (i, seg) in recognizer_segments.iter().enumerate() {
        if seg.start_s >= seg.end_s {
            log::warn!(
                "recognizer segment {} has an inverted/zero-duration interval [{}, {}]; repairing to [{}, {}]",
                i,
                seg.start_s,
                seg.end_s,
                seg.start_s,
                seg.start_s + 0.1
            );
        }
    }

    let normalized: Vec<RecognizerSegment> =
        recognizer_segments.iter().map(|s| s.normalized()).collect();

    let m = translated_parts.len();
    let r = normalized.len();

    let mut aligned = if m == r {
        align_one_to_one(translated_parts, &normalized)
    } else if m < r {
        align_grouped(translated_parts, &normalized)
    } else {
        align_redistributed(translated_parts, &normalized, policy)
    };

    repair_overlaps(&mut aligned);
    clamp_to_bounds(&mut aligned, original_duration_s);
    warn_on_gaps_and_overlaps(&aligned, gap_warn_threshold_s);

    Ok(aligned)
}

/// Emits a warning for any gap wider than `gap_warn_threshold_s` and for any
/// residual overlap (negative gap) between adjacent aligned segments.
fn warn_on_gaps_and_overlaps(aligned: &[TimedSegment], gap_warn_threshold_s: f64) {
    for i in 1..aligned.len() {
        let gap = aligned[i].start_s - aligned[i - 1].end_s;
        if gap < 0.0 {
            log::warn!(
                "residual overlap of {:.3}s between aligned segments {} and {}",
                -gap,
                i - 1,
                i
            );
        } else if gap > gap_warn_threshold_s {
            log::warn!(
                "gap of {:.3}s between aligned segments {} and {} exceeds the {:.3}s warn threshold",
                gap,
                i - 1,
                i,
                gap_warn_threshold_s
            );
        }
    }
}

fn align_one_to_one(parts: &[String], recs: &[RecognizerSegment]) -> Vec<TimedSegment> {
    parts
        .iter()
        .zip(recs.iter())
        .map(|(part, seg)| TimedSegment {
            text: part.clone(),
            start_s: seg.start_s,
            end_s: seg.end_s,
        })
        .collect()
}

fn align_grouped(parts: &[String], recs: &[RecognizerSegment]) -> Vec<TimedSegment> {
    let m = parts.len();
    let r = recs.len();
    let ratio = m as f64 / r as f64;

    let mut buckets: Vec<Option<(f64, f64)>> = vec![None; m];
    for (i, seg) in recs.iter().enumerate() {
        let idx = ((i as f64 * ratio).floor() as usize).min(m - 1);
        buckets[idx] = match buckets[idx] {
            None => Some((seg.start_s, seg.end_s)),
            Some((s, _)) => Some((s, seg.end_s)),
        };
    }

    buckets
        .into_iter()
        .zip(parts.iter())
        .filter_map(|(bucket, part)| {
            bucket.map(|(start_s, end_s)| TimedSegment {
                text: part.clone(),
                start_s,
                end_s,
            })
        })
        .collect()
}

fn align_redistributed(
    parts: &[String],
    recs: &[RecognizerSegment],
    policy: &dyn RedistributionPolicy,
) -> Vec<TimedSegment> {
    let m = parts.len();
    let r = recs.len();
    let ratio = r as f64 / m as f64;

    let raw: Vec<(usize, f64, f64)> = (0..m)
        .map(|i| {
            let j = ((i as f64 * ratio).floor() as usize).min(r - 1);
            (j, recs[j].start_s, recs[j].end_s)
        })
        .collect();

    let mut out = Vec::with_capacity(m);
    let mut i = 0;
    while i < m {
        let mut k = i;
        while k + 1 < m && raw[k + 1].0 == raw[i].0 {
            k += 1;
        }

        if k == i {
            out.push(TimedSegment {
                text: parts[i].clone(),
                start_s: raw[i].1,
                end_s: raw[i].2,
            });
        } else {
            let run_parts = &parts[i..=k];
            let slots = policy.redistribute(run_parts, raw[i].1, raw[i].2);
            for (part, (start_s, end_s)) in run_parts.iter().zip(slots.into_iter()) {
                out.push(TimedSegment {
                    text: part.clone(),
                    start_s,
                    end_s,
                });
            }
        }
        i = k + 1;
    }

    out
}

fn repair_overlaps(aligned: &mut [TimedSegment]) {
    for i in 1..aligned.len() {
        if aligned[i].start_s < aligned[i - 1].end_s {
            aligned[i].start_s = aligned[i - 1].end_s;
            if aligned[i].end_s < aligned[i].start_s {
                aligned[i].end_s = aligned[i].start_s;
            }
        }
    }
}

fn clamp_to_bounds(aligned: &mut [TimedSegment], original_duration_s: f64) {
    if let Some(first) = aligned.first_mut() {
        if first.start_s < 0.0 {
            first.start_s = 0.0;
        }
    }
    if let Some(last) = aligned.last_mut() {
        if last.end_s > original_duration_s {
            last.end_s = original_duration_s;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: f64, end: f64, text: &str) -> RecognizerSegment {
        RecognizerSegment {
            start_s: start,
            end_s: end,
            text: text.to_string(),
        }
    }

    #[test]
    fn case_a_one_to_one_is_identity_on_timings() {
        let parts = vec!["ciao".to_string(), "mondo".to_string()];
        let recs = vec![seg(0.0, 5.0, "hello"), seg(5.0, 10.0, "world")];
        let aligned = align(&parts, &recs, 10.0, &CharCountPolicy, 5.0).unwrap();
        assert_eq!(aligned.len(), 2);
        assert_eq!(aligned[0].start_s, 0.0);
        assert_eq!(aligned[0].end_s, 5.0);
        assert_eq!(aligned[1].start_s, 5.0);
        assert_eq!(aligned[1].end_s, 10.0);
    }

    #[test]
    fn case_b_groups_recognizer_segments_into_fewer_parts() {
        let parts = vec!["one".to_string()];
        let recs = vec![seg(0.0, 2.0, "a"), seg(2.0, 4.0, "b")];
        let aligned = align(&parts, &recs, 4.0, &CharCountPolicy, 5.0).unwrap();
        assert_eq!(aligned.len(), 1);
        assert_eq!(aligned[0].start_s, 0.0);
        assert_eq!(aligned[0].end_s, 4.0);
    }

    #[test]
    fn case_c_redistributes_overlapping_run_by_char_count() {
        let parts = vec!["ab".to_string(), "abcdefgh".to_string()];
        let recs = vec![seg(0.0, 10.0, "only")];
        let aligned = align(&parts, &recs, 10.0, &CharCountPolicy, 5.0).unwrap();
        assert_eq!(aligned.len(), 2);
        assert!(aligned[0].start_s >= 0.0);
        assert!(aligned[1].start_s >= aligned[0].end_s);
        assert_eq!(aligned[1].end_s, 10.0);
        assert!(aligned[0].end_s - aligned[0].start_s < aligned[1].end_s - aligned[1].start_s);
    }

    #[test]
    fn repairs_inverted_segment_and_proceeds() {
        let parts = vec!["invalid".to_string()];
        let recs = vec![seg(5.0, 4.0, "invalid")];
        let aligned = align(&parts, &recs, 10.0, &CharCountPolicy, 5.0).unwrap();
        assert_eq!(aligned[0].start_s, 5.0);
        assert_eq!(aligned[0].end_s, 5.1);
    }

    #[test]
    fn rejects_non_finite_timestamps() {
        let parts = vec!["x".to_string()];
        let recs = vec![seg(f64::NAN, 1.0, "x")];
        assert!(align(&parts, &recs, 10.0, &CharCountPolicy, 5.0).is_err());
    }

    #[test]
    fn no_overlaps_after_repair() {
        let parts = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let recs = vec![seg(0.0, 3.0, "x"), seg(2.0, 4.0, "y"), seg(1.0, 5.0, "z")];
        let aligned = align(&parts, &recs, 5.0, &CharCountPolicy, 5.0).unwrap();
        for i in 1..aligned.len() {
            assert!(aligned[i].start_s >= aligned[i - 1].end_s);
        }
    }

    #[test]
    fn wide_gap_does_not_fail_alignment() {
        let parts = vec!["a".to_string(), "b".to_string()];
        let recs = vec![seg(0.0, 1.0, "x"), seg(20.0, 21.0, "y")];
        let aligned = align(&parts, &recs, 21.0, &CharCountPolicy, 5.0).unwrap();
        assert_eq!(aligned.len(), 2);
        assert!(aligned[1].start_s - aligned[0].end_s > 5.0);
    }
}
