//! Fallback ladder (§4.8): a job runs one of three strategies, degrading one
//! rung at a time on a non-retryable failure, never partially completing a
//! strategy and handing off a half-built track — each rung allocates its own
//! scratch temp directory, dropped before the next rung starts.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::core::dub::engine::DubEngine;
use crate::core::dub::job::SynthesisJob;
use crate::core::dub::types::DubReport;
use crate::error::TdseResult;

/// One rung of the fallback ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DubStrategy {
    Timestamp,
    Proportional,
    SingleShot,
}

impl DubStrategy {
    fn next(self) -> Option<Self> {
        match self {
            DubStrategy::Timestamp => Some(DubStrategy::Proportional),
            DubStrategy::Proportional => Some(DubStrategy::SingleShot),
            DubStrategy::SingleShot => None,
        }
    }
}

fn recognizer_segments_usable(job: &SynthesisJob) -> bool {
    !job.recognizer_segments.is_empty()
        && job
            .recognizer_segments
            .iter()
            .all(|s| s.start_s.is_finite() && s.end_s.is_finite())
}

/// Runs the ladder for `job`, choosing the timestamp strategy iff every
/// recognizer segment has a numeric, finite interval; otherwise starting
/// from the proportional strategy. Degrades one level on any error for
/// which [`crate::error::TdseError::triggers_fallback`] is true.
pub async fn run_ladder(
    engine: &DubEngine,
    job: &SynthesisJob,
    translated_text: &str,
    language: &str,
    cancel: &Arc<AtomicBool>,
) -> TdseResult<DubReport> {
    let mut strategy = if recognizer_segments_usable(job) {
        DubStrategy::Timestamp
    } else {
        DubStrategy::Proportional
    };

    loop {
        let attempt = match strategy {
            DubStrategy::Timestamp => engine.run_timestamped(job, translated_text, language, cancel).await,
            DubStrategy::Proportional => engine.run_proportional(job, translated_text, language, cancel).await,
            DubStrategy::SingleShot => engine.run_single_shot(job, translated_text, language).await,
        };

        match attempt {
            Ok(report) => return Ok(report),
            Err(e) if e.triggers_fallback() => match strategy.next() {
                Some(next) => {
                    log::warn!("dub strategy {:?} failed ({}), degrading to {:?}", strategy, e, next);
                    strategy = next;
                }
                None => return Err(e),
            },
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_degrades_in_order() {
        assert_eq!(DubStrategy::Timestamp.next(), Some(DubStrategy::Proportional));
        assert_eq!(DubStrategy::Proportional.next(), Some(DubStrategy::SingleShot));
        assert_eq!(DubStrategy::SingleShot.next(), None);
    }

    #[test]
    fn recognizer_usability_rejects_empty_and_non_finite() {
        let with_segments = SynthesisJob::new(
            10.0,
            vec![crate::core::dub::types::RecognizerSegment {
                start_s: 0.0,
                end_s: 1.0,
                text: "hi".to_string(),
            }],
        )
        .unwrap();
        assert!(recognizer_segments_usable(&with_segments));

        let empty = SynthesisJob::new(10.0, vec![]).unwrap();
        assert!(!recognizer_segments_usable(&empty));

        let non_finite = SynthesisJob::new(
            10.0,
            vec![crate::core::dub::types::RecognizerSegment {
                start_s: f64::NAN,
                end_s: 1.0,
                text: "hi".to_string(),
            }],
        )
        .unwrap();
        assert!(!recognizer_segments_usable(&non_finite));
    }
}
