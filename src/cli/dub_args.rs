// src/cli/dub_args.rs
use clap::Args;
use std::path::PathBuf;

/// Arguments for the `dub` subcommand: dub a video, or a directory of videos, into another language.
#[derive(Args, Debug)]
pub struct DubArgs {
    /// Source video: a local path, a directory (with `--batch`), or a URL to download first.
    pub source: String,

    /// Target language the dubbed audio should be synthesized in (e.g. `es`, `fr`, `ja`).
    #[arg(long, short = 't')]
    pub target_language: String,

    /// Source language hint for the recognizer; omit to let it auto-detect.
    #[arg(long, short = 's')]
    pub source_language: Option<String>,

    /// Output video path. In batch mode this is treated as an output directory.
    #[arg(long, short = 'o')]
    pub output: PathBuf,

    /// Treat `source` as a directory and dub every video file found inside it.
    #[arg(long)]
    pub batch: bool,

    /// In batch mode, also descend into subdirectories.
    #[arg(long, requires = "batch")]
    pub recursive: bool,
}
