//! The Temporal Dub Synthesis Engine proper: the Segment Synthesizer and
//! Silence Bookkeeper, interleaved per the data flow Aligner → (Calibrator ⇄
//! Synthesizer per segment) → Bookkeeper → Assembler → Final-trim.
//!
//! [`DubEngine`] depends only on the [`VoiceSynthesizer`] and [`AudioToolkit`]
//! capability traits; the fallback ladder in [`crate::core::dub::strategy`]
//! picks which of the three entry points below to run.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::config::DubConfig;
use crate::core::dub::aligner::{self, CharCountPolicy};
use crate::core::dub::assembler;
use crate::core::dub::calibrator;
use crate::core::dub::job::SynthesisJob;
use crate::core::dub::splitter;
use crate::core::dub::types::{AdaptiveRate, CalibrationSample, DubReport, TimedSegment};
use crate::core::dub::voice_table;
use crate::error::{TdseError, TdseResult};
use crate::services::audio::AudioToolkit;
use crate::services::tts::VoiceSynthesizer;

/// Owns the synthesis/audio-toolkit collaborators and the TDSE numeric
/// knobs; stateless across jobs (all job-local state lives on the
/// [`SynthesisJob`] and in the local call chain, per the spec's "explicit
/// value passing instead of shared mutable job state" design note).
pub struct DubEngine {
    synthesizer: Arc<dyn VoiceSynthesizer>,
    toolkit: Arc<dyn AudioToolkit>,
    config: DubConfig,
    voice_overrides: HashMap<String, String>,
}

impl DubEngine {
    pub fn new(synthesizer: Arc<dyn VoiceSynthesizer>, toolkit: Arc<dyn AudioToolkit>, config: DubConfig) -> Self {
        let voice_overrides = config.voice_overrides.clone();
        Self {
            synthesizer,
            toolkit,
            config,
            voice_overrides,
        }
    }

    /// Runs the fallback ladder for `job`, returning the end-of-job report.
    pub async fn dub(
        &self,
        job: &SynthesisJob,
        translated_text: &str,
        language: &str,
        cancel: &Arc<AtomicBool>,
    ) -> TdseResult<DubReport> {
        crate::core::dub::strategy::run_ladder(self, job, translated_text, language, cancel).await
    }

    /// Strategy 1 (§4.2–4.7): one-to-one/grouped/redistributed alignment
    /// against recognizer timestamps.
    pub async fn run_timestamped(
        &self,
        job: &SynthesisJob,
        translated_text: &str,
        language: &str,
        cancel: &Arc<AtomicBool>,
    ) -> TdseResult<DubReport> {
        let segments = &job.recognizer_segments;
        if segments.is_empty() {
            return self
                .synthesize_and_assemble(
                    job,
                    &[],
                    language,
                    cancel,
                    self.config.final_trim_tolerance,
                    self.config.crossfade_ms,
                    "timestamp",
                )
                .await;
        }

        for seg in segments {
            if !seg.start_s.is_finite() || !seg.end_s.is_finite() {
                return Err(TdseError::invalid_timestamps(
                    "recognizer segment has a non-finite timestamp".to_string(),
                ));
            }
        }

        let n = segments.len();
        let parts = splitter::split_proportionally(translated_text, n, self.config.splitter_window_fraction)?;
        let policy = CharCountPolicy;
        let aligned = aligner::align(
            &parts,
            segments,
            job.original_duration_s,
            &policy,
            self.config.gap_warn_threshold_s as f64,
        )?;

        self.synthesize_and_assemble(
            job,
            &aligned,
            language,
            cancel,
            self.config.final_trim_tolerance,
            self.config.crossfade_ms,
            "timestamp",
        )
        .await
    }

    /// Strategy 2 (§4.8.2): ignores recognizer times, splits the
    /// translation on sentence/clause punctuation, and allocates target
    /// durations by character proportion of the original duration.
    pub async fn run_proportional(
        &self,
        job: &SynthesisJob,
        translated_text: &str,
        language: &str,
        cancel: &Arc<AtomicBool>,
    ) -> TdseResult<DubReport> {
        let parts = split_into_clauses(translated_text);
        let total_chars: usize = parts.iter().map(|p| p.chars().count().max(1)).sum();
        let mut aligned = Vec::with_capacity(parts.len());
        let mut cursor = 0.0f64;
        for (i, part) in parts.iter().enumerate() {
            let chars = part.chars().count().max(1);
            let share = job.original_duration_s * (chars as f64 / total_chars.max(1) as f64);
            let end = if i == parts.len() - 1 {
                job.original_duration_s
            } else {
                cursor + share
            };
            aligned.push(TimedSegment {
                text: part.clone(),
                start_s: cursor,
                end_s: end,
            });
            cursor = end;
        }

        self.synthesize_and_assemble(
            job,
            &aligned,
            language,
            cancel,
            self.config.proportional_trim_tolerance,
            0,
            "proportional",
        )
        .await
    }

    /// Strategy 3 (§4.8.3): synthesizes the whole translated text at `+0%`
    /// with no per-segment stretching.
    pub async fn run_single_shot(&self, job: &SynthesisJob, translated_text: &str, language: &str) -> TdseResult<DubReport> {
        let scratch = tempfile::TempDir::new()?;
        let voice = voice_table::voice_for(language, &self.voice_overrides);
        let raw_path = scratch.path().join("single_shot_raw.bin");
        let timeout = Duration::from_secs(self.config.synth_timeout_s);

        match tokio::time::timeout(
            timeout,
            self.synthesizer.synthesize(translated_text, &voice, "+0%", &raw_path),
        )
        .await
        {
            Ok(Ok(())) => {}
            _ => return Err(TdseError::SynthesisFailed(0)),
        }

        let pcm_path = job.artifact_path("dubbed_audio.wav");
        self.toolkit.convert_to_pcm(&raw_path, &pcm_path).await?;
        let d_final = self.toolkit.probe_duration(&pcm_path).await?;

        Ok(self.build_report(job, pcm_path, d_final, 1, 1, "single-shot"))
    }

    /// The interleaved Rate Calibrator / Segment Synthesizer / Silence
    /// Bookkeeper loop, followed by the Sequence Assembler and Final
    /// Micro-Trim.
    async fn synthesize_and_assemble(
        &self,
        job: &SynthesisJob,
        aligned: &[TimedSegment],
        language: &str,
        cancel: &Arc<AtomicBool>,
        trim_tolerance: f32,
        crossfade_ms: u64,
        strategy_label: &str,
    ) -> TdseResult<DubReport> {
        let scratch = tempfile::TempDir::new()?;
        let min_silence_s = self.config.min_silence_ms as f64 / 1000.0;

        if aligned.is_empty() {
            let sp = scratch.path().join("silence_only.wav");
            self.toolkit.generate_silence(&sp, job.original_duration_s.max(0.0)).await?;
            let (final_path, d_final) = assembler::assemble(
                self.toolkit.as_ref(),
                job,
                &[sp],
                crossfade_ms,
                job.original_duration_s,
                trim_tolerance,
                self.config.stretch_clamp_min as f64,
                self.config.stretch_clamp_max as f64,
            )
            .await?;
            return Ok(self.build_report(job, final_path, d_final, 0, 1, strategy_label));
        }

        let k = calibrator::calibration_population(
            aligned.len(),
            self.config.calibration_max_samples,
            self.config.calibration_fraction,
        );

        let calibration_results = if k > 0 {
            self.run_calibration_phase(job.id(), scratch.path(), aligned, k, language).await?
        } else {
            Vec::new()
        };

        let samples: Vec<CalibrationSample> = calibration_results.iter().filter_map(|(_, s)| *s).collect();
        let rate = calibrator::resolve_rate(&samples, self.config.calibration_variance_gate, self.config.rate_clamp_pct);

        let mut artifacts: Vec<PathBuf> = Vec::with_capacity(aligned.len() * 2);
        let mut prev_end = 0.0f64;

        for (i, seg) in aligned.iter().enumerate() {
            if cancel.load(Ordering::SeqCst) {
                return Err(TdseError::Cancelled);
            }

            let gap = if i == 0 { seg.start_s } else { seg.start_s - prev_end };
            if gap > min_silence_s {
                let sp = scratch.path().join(format!("silence_{i:04}.wav"));
                self.toolkit.generate_silence(&sp, gap).await?;
                artifacts.push(sp);
            }

            let artifact = if i < k {
                calibration_results[i].0.clone()
            } else {
                self.synthesize_one(job.id(), scratch.path(), i, seg.target_duration_s(), &seg.text, rate, language)
                    .await?
                    .0
            };
            artifacts.push(artifact);
            prev_end = seg.end_s;
        }

        let final_silence = job.original_duration_s - prev_end;
        if final_silence > min_silence_s {
            let sp = scratch.path().join("silence_trailing.wav");
            self.toolkit.generate_silence(&sp, final_silence).await?;
            artifacts.push(sp);
        }

        let (final_path, d_final) = assembler::assemble(
            self.toolkit.as_ref(),
            job,
            &artifacts,
            crossfade_ms,
            job.original_duration_s,
            trim_tolerance,
            self.config.stretch_clamp_min as f64,
            self.config.stretch_clamp_max as f64,
        )
        .await?;

        Ok(self.build_report(job, final_path, d_final, aligned.len(), artifacts.len(), strategy_label))
    }

    /// Synthesizes the first `K` calibration-phase segments, optionally
    /// concurrently via `futures::future::join_all` when
    /// `calibrate_concurrently` is enabled — the only point in the engine
    /// where segment ordering is relaxed (§5).
    async fn run_calibration_phase(
        &self,
        job_id: uuid::Uuid,
        scratch: &Path,
        aligned: &[TimedSegment],
        k: usize,
        language: &str,
    ) -> TdseResult<Vec<(PathBuf, Option<CalibrationSample>)>> {
        if self.config.calibrate_concurrently && k > 1 {
            let futs = aligned[..k]
                .iter()
                .enumerate()
                .map(|(i, seg)| self.synthesize_one(job_id, scratch, i, seg.target_duration_s(), &seg.text, AdaptiveRate::ZERO, language));
            futures::future::join_all(futs).await.into_iter().collect()
        } else {
            let mut out = Vec::with_capacity(k);
            for (i, seg) in aligned[..k].iter().enumerate() {
                out.push(
                    self.synthesize_one(job_id, scratch, i, seg.target_duration_s(), &seg.text, AdaptiveRate::ZERO, language)
                        .await?,
                );
            }
            Ok(out)
        }
    }

    /// Synthesizes, measures, and (if needed) time-stretches a single
    /// segment. Returns `None` for the calibration sample when the segment
    /// is a silence placeholder, since no synthesis call was made.
    async fn synthesize_one(
        &self,
        job_id: uuid::Uuid,
        scratch: &Path,
        index: usize,
        target_s: f64,
        text: &str,
        rate: AdaptiveRate,
        language: &str,
    ) -> TdseResult<(PathBuf, Option<CalibrationSample>)> {
        if text.trim().is_empty() {
            let path = scratch.join(format!("seg_{index:04}_silence.wav"));
            self.toolkit.generate_silence(&path, target_s.max(0.0)).await?;
            return Ok((path, None));
        }

        let voice = voice_table::voice_for(language, &self.voice_overrides);
        let raw_path = scratch.join(format!("seg_{index:04}_raw.bin"));
        let timeout = Duration::from_secs(self.config.synth_timeout_s);

        match tokio::time::timeout(
            timeout,
            self.synthesizer.synthesize(text, &voice, &rate.as_rpc_string(), &raw_path),
        )
        .await
        {
            Ok(Ok(())) => {}
            _ => return Err(TdseError::SynthesisFailed(index)),
        }

        let pcm_path = scratch.join(format!("seg_{index:04}_pcm.wav"));
        self.toolkit.convert_to_pcm(&raw_path, &pcm_path).await?;
        let actual_s = self.toolkit.probe_duration(&pcm_path).await?;

        let sample = CalibrationSample { target_s, actual_s };
        let diff = (target_s - actual_s).abs();

        let final_path = if diff > 0.001 {
            let tau = actual_s / target_s.max(1e-6);
            let chain = assembler::stretch_chain(tau, self.config.stretch_clamp_min as f64, self.config.stretch_clamp_max as f64);
            let mut current = pcm_path.clone();
            let mut out_path = pcm_path.clone();
            for (link, factor) in chain.iter().enumerate() {
                out_path = scratch.join(format!("seg_{index:04}_stretch_{link}.wav"));
                self.toolkit.time_stretch(&current, &out_path, *factor).await?;
                current = out_path.clone();
            }
            out_path
        } else {
            pcm_path
        };

        log::debug!(
            "{}",
            serde_json::json!({
                "jobId": job_id.to_string(),
                "index": index,
                "target_s": target_s,
                "actual_s": actual_s,
                "stretched": diff > 0.001,
                "difference_s": target_s - actual_s,
                "ttsRate": rate.as_rpc_string(),
            })
        );

        Ok((final_path, Some(sample)))
    }

    fn build_report(
        &self,
        job: &SynthesisJob,
        output_path: PathBuf,
        d_final: f64,
        segments: usize,
        files_concatenated: usize,
        strategy_label: &str,
    ) -> DubReport {
        let d_orig = job.original_duration_s;
        let diff = d_final - d_orig;
        let diff_pct = if d_orig > 0.0 { (diff.abs() / d_orig) * 100.0 } else { 0.0 };
        let accuracy = 100.0 - diff_pct;

        let report = DubReport {
            original_duration_s: d_orig,
            final_duration_s: d_final,
            difference_s: diff,
            difference_percent: diff_pct,
            segments,
            accuracy_percent: accuracy,
            files_concatenated,
            output_path,
            strategy: strategy_label.to_string(),
        };

        log::info!(
            "{}",
            serde_json::json!({
                "jobId": job.id().to_string(),
                "originalDuration": report.original_duration_s,
                "finalDuration": report.final_duration_s,
                "difference_s": report.difference_s,
                "differencePercent": report.difference_percent,
                "segments": report.segments,
                "accuracy_percent": report.accuracy_percent,
                "filesConcatenated": report.files_concatenated,
            })
        );

        report
    }
}

/// Splits translated text on sentence/clause punctuation (`.`, `!`, `?`,
/// `;`), keeping the punctuation and any trailing whitespace attached to
/// the preceding clause. Used only by the proportional fallback strategy,
/// which does not need the Splitter's target-count-driven window search.
fn split_into_clauses(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut i = 0;
    while i < chars.len() {
        current.push(chars[i]);
        if matches!(chars[i], '.' | '!' | '?' | ';') {
            let mut j = i + 1;
            while j < chars.len() && chars[j].is_whitespace() {
                current.push(chars[j]);
                j += 1;
            }
            parts.push(std::mem::take(&mut current));
            i = j;
            continue;
        }
        i += 1;
    }
    if !current.trim().is_empty() {
        parts.push(current);
    }
    if parts.is_empty() {
        parts.push(" ".to_string());
    }
    parts
}
