//! The `dub` command: wires every collaborator trait object together and
//! drives a single video (or, in batch mode, a directory of videos) through
//! acquire -> demux -> recognize -> translate -> [`DubEngine::dub`] -> remux.

use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::cli::{collect_video_files, create_progress_bar, DubArgs};
use crate::config::{Config, ConfigService};
use crate::core::dub::{DubEngine, SynthesisJob};
use crate::core::dub::types::VideoSource;
use crate::error::TdseError;
use crate::services::acquirer::{HttpVideoAcquirer, VideoAcquirer};
use crate::services::audio::{AudioToolkit, FfmpegAudioToolkit};
use crate::services::demux::{AudioDemuxer, FfmpegAudioDemuxer};
use crate::services::recognizer::{SpeechRecognizer, WhisperRecognizer};
use crate::services::remux::{FfmpegVideoRemuxer, VideoRemuxer};
use crate::services::translator::{OpenAiClient, OpenAiTranslator, Translator};
use crate::services::tts::{HttpVoiceSynthesizer, VoiceSynthesizer};
use crate::Result;

fn parse_source(raw: &str) -> VideoSource {
    match url::Url::parse(raw) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => VideoSource::Url(url),
        _ => VideoSource::LocalPath(PathBuf::from(raw)),
    }
}

/// The collaborators a single dub job needs; built once per invocation and
/// shared (via `Arc`) across every job in batch mode.
struct Collaborators {
    acquirer: Arc<dyn VideoAcquirer>,
    demuxer: Arc<dyn AudioDemuxer>,
    recognizer: Arc<dyn SpeechRecognizer>,
    translator: Arc<dyn Translator>,
    synthesizer: Arc<dyn VoiceSynthesizer>,
    toolkit: Arc<dyn AudioToolkit>,
    remuxer: Arc<dyn VideoRemuxer>,
    config: Config,
}

impl Collaborators {
    fn build(config: Config) -> Result<Self> {
        let recognizer_api_key = config
            .recognizer
            .api_key
            .clone()
            .ok_or_else(|| TdseError::config("missing recognizer API key"))?;

        Ok(Self {
            acquirer: Arc::new(HttpVideoAcquirer::new()),
            demuxer: Arc::new(FfmpegAudioDemuxer::new(config.general.ffmpeg_path.clone())),
            recognizer: Arc::new(WhisperRecognizer::new(
                recognizer_api_key,
                config.recognizer.base_url.clone(),
                config.recognizer.clone(),
            )?),
            translator: Arc::new(OpenAiTranslator::new(OpenAiClient::from_config(&config.translator)?)),
            synthesizer: Arc::new(HttpVoiceSynthesizer::from_config(&config.tts)?),
            toolkit: Arc::new(FfmpegAudioToolkit::new(
                config.general.ffmpeg_path.clone(),
                config.general.ffprobe_path.clone(),
            )),
            remuxer: Arc::new(FfmpegVideoRemuxer::new(config.general.ffmpeg_path.clone())),
            config,
        })
    }

    /// Runs the full pipeline for one video, writing the dubbed output to `output_path`.
    async fn run_one(
        &self,
        source: VideoSource,
        target_language: &str,
        source_language: Option<&str>,
        output_path: &Path,
    ) -> Result<crate::core::dub::DubReport> {
        let workspace = tempfile::TempDir::new()?;

        let video_path = self.acquirer.acquire(&source, workspace.path()).await?;

        let audio_path = workspace.path().join("audio.wav");
        self.demuxer.demux(&video_path, &audio_path).await?;
        let original_duration_s = self.toolkit.probe_duration(&audio_path).await?;

        let recognition = self.recognizer.recognize(&audio_path).await?;
        let effective_source_language = source_language.unwrap_or(recognition.language.as_str());
        let translated_text = self
            .translator
            .translate(&recognition.text, Some(effective_source_language), target_language)
            .await?;

        let job = SynthesisJob::new(original_duration_s, recognition.segments)?;
        let engine = DubEngine::new(
            Arc::clone(&self.synthesizer),
            Arc::clone(&self.toolkit),
            self.config.dub.clone(),
        );
        let cancel = Arc::new(AtomicBool::new(false));
        let report = engine.dub(&job, &translated_text, target_language, &cancel).await?;

        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        self.remuxer.remux(&video_path, &report.output_path, output_path).await?;

        let mut final_report = report;
        final_report.output_path = output_path.to_path_buf();
        Ok(final_report)
    }
}

fn print_report(label: &str, report: &crate::core::dub::DubReport) {
    crate::cli::print_success(&format!(
        "{}: {:.2}s -> {:.2}s ({:+.2}%, {} segments, strategy={}) -> {}",
        label,
        report.original_duration_s,
        report.final_duration_s,
        report.difference_percent,
        report.segments,
        report.strategy,
        report.output_path.display()
    ));
}

/// Executes the `dub` subcommand.
pub async fn execute(args: DubArgs, config_service: &dyn ConfigService) -> Result<()> {
    let config = config_service.get_config()?;
    let collaborators = Collaborators::build(config)?;

    if !args.batch {
        let source = parse_source(&args.source);
        let report = collaborators
            .run_one(source, &args.target_language, args.source_language.as_deref(), &args.output)
            .await?;
        print_report(&args.source, &report);
        return Ok(());
    }

    let dir = PathBuf::from(&args.source);
    let files = collect_video_files(&dir, args.recursive)?;
    if files.is_empty() {
        crate::cli::print_warning(&format!("no video files found under {}", dir.display()));
        return Ok(());
    }
    std::fs::create_dir_all(&args.output)?;

    let parallel_config = crate::core::parallel::ParallelConfig::from_app_config(&collaborators.config);
    parallel_config.validate()?;

    let progress_bar = if collaborators.config.general.enable_progress_bar {
        Some(Arc::new(create_progress_bar(files.len() as u64)))
    } else {
        None
    };

    let collaborators = Arc::new(collaborators);
    let target_language = args.target_language.clone();
    let source_language = args.source_language.clone();
    let output_dir = args.output.clone();
    let progress_bar_for_finish = progress_bar.clone();

    let results = crate::core::parallel::run_batch(&parallel_config, files, move |file: PathBuf| {
        let collaborators = Arc::clone(&collaborators);
        let target_language = target_language.clone();
        let source_language = source_language.clone();
        let progress_bar = progress_bar.clone();
        let output_path = output_dir.join(
            file.file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("dubbed.mp4")),
        );
        async move {
            let source = VideoSource::LocalPath(file.clone());
            let outcome = collaborators
                .run_one(source, &target_language, source_language.as_deref(), &output_path)
                .await;
            if let Some(pb) = &progress_bar {
                pb.inc(1);
            }
            (file, outcome)
        }
    })
    .await;

    if let Some(pb) = progress_bar_for_finish {
        pb.finish_and_clear();
    }

    let mut failures = 0usize;
    for (file, outcome) in results {
        match outcome {
            Ok(report) => print_report(&file.display().to_string(), &report),
            Err(e) => {
                failures += 1;
                crate::cli::print_error(&format!("{}: {}", file.display(), e.user_friendly_message()));
            }
        }
    }

    if failures > 0 {
        return Err(TdseError::config(format!("{} of the batch's jobs failed", failures)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_http_url_as_remote_source() {
        assert!(matches!(parse_source("https://example.com/a.mp4"), VideoSource::Url(_)));
    }

    #[test]
    fn parses_local_path_as_local_source() {
        assert!(matches!(parse_source("./videos/a.mp4"), VideoSource::LocalPath(_)));
    }

    #[test]
    fn parses_windows_style_path_as_local_source() {
        assert!(matches!(parse_source("C:\\videos\\a.mp4"), VideoSource::LocalPath(_)));
    }
}
