//! Sequence assembler: concatenates synthesized segments and silences with a
//! triangular cross-fade, then applies a bounded pitch-invariant final
//! micro-trim to bring the whole track to the original duration.

use std::path::PathBuf;

use crate::core::dub::job::SynthesisJob;
use crate::error::TdseResult;
use crate::services::audio::AudioToolkit;

/// Decomposes a tempo factor outside `[min, max]` into a chain of per-link
/// stretches, each within range, whose product reconstructs the original
/// factor (e.g. a factor of `0.3` with `min=0.5` chains as `0.5 * 0.6`).
pub fn stretch_chain(tau: f64, min: f64, max: f64) -> Vec<f64> {
    if tau.is_finite() && tau >= min && tau <= max {
        return vec![tau];
    }
    let mut factors = Vec::new();
    let mut remaining = if tau.is_finite() && tau > 0.0 { tau } else { 1.0 };
    for _ in 0..16 {
        if remaining >= min && remaining <= max {
            factors.push(remaining);
            return factors;
        }
        if remaining > max {
            factors.push(max);
            remaining /= max;
        } else {
            factors.push(min);
            remaining /= min;
        }
    }
    factors.push(remaining.clamp(min, max));
    factors
}

/// Concatenates `artifacts` in order with a `crossfade_ms` triangular
/// cross-fade between each adjacent pair, then trims the result to within
/// `tolerance` of `d_orig` via a clamp-chained pitch-invariant stretch.
///
/// Returns the final output path (written into the job's workspace as
/// `dubbed_audio.wav`) and the measured final duration.
pub async fn assemble(
    toolkit: &dyn AudioToolkit,
    job: &SynthesisJob,
    artifacts: &[PathBuf],
    crossfade_ms: u64,
    d_orig: f64,
    tolerance: f32,
    stretch_min: f64,
    stretch_max: f64,
) -> TdseResult<(PathBuf, f64)> {
    let assembled = job.artifact_path("assembled.wav");
    toolkit.concat_with_crossfade(artifacts, &assembled, crossfade_ms).await?;

    let d_assembled = toolkit.probe_duration(&assembled).await?;
    let rel_diff = if d_orig > 0.0 {
        (d_assembled - d_orig).abs() / d_orig
    } else {
        0.0
    };

    let dest = job.artifact_path("dubbed_audio.wav");

    if rel_diff as f32 <= tolerance {
        tokio::fs::copy(&assembled, &dest).await?;
        return Ok((dest, d_assembled));
    }

    let tau = d_assembled / d_orig.max(1e-6);
    let chain = stretch_chain(tau, stretch_min, stretch_max);
    let mut current = assembled;
    let mut out = job.artifact_path("trimmed_0.wav");
    for (i, factor) in chain.iter().enumerate() {
        out = job.artifact_path(&format!("trimmed_{i}.wav"));
        toolkit.time_stretch(&current, &out, *factor).await?;
        current = out.clone();
    }

    tokio::fs::copy(&out, &dest).await?;
    let d_final = toolkit.probe_duration(&dest).await?;
    Ok((dest, d_final))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_when_already_in_range() {
        assert_eq!(stretch_chain(1.1, 0.5, 2.0), vec![1.1]);
    }

    #[test]
    fn chains_when_out_of_range() {
        let chain = stretch_chain(0.2, 0.5, 2.0);
        assert!(chain.len() > 1);
        let product: f64 = chain.iter().product();
        assert!((product - 0.2).abs() < 1e-6);
        for factor in &chain {
            assert!(*factor >= 0.5 && *factor <= 2.0);
        }
    }

    #[test]
    fn chains_when_above_range() {
        let chain = stretch_chain(5.0, 0.5, 2.0);
        let product: f64 = chain.iter().product();
        assert!((product - 5.0).abs() < 1e-6);
    }
}
