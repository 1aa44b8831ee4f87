//! Command-line interface for the temporal dub synthesis engine.
//!
//! This module provides the top-level CLI application structure and
//! subcommands: dubbing a video (or a directory of videos) into another
//! language, configuration management, and shell completion generation.
//!
//! # Architecture
//!
//! The CLI is built using `clap` and follows a subcommand pattern:
//! - `dub` - dub a single video, or an entire directory of videos, into a target language
//! - `config` - configuration management and inspection
//! - `generate-completion` - shell completion script generation
//!
//! # Examples
//!
//! ```bash
//! # Dub a local file into Spanish
//! tdse dub movie.mp4 -t es -o movie.es.mp4
//!
//! # Dub a remote video
//! tdse dub https://example.com/clip.mp4 -t fr -o clip.fr.mp4
//!
//! # Dub every video under a directory
//! tdse dub ./videos -t ja -o ./dubbed --batch --recursive
//! ```

mod config_args;
mod dub_args;
mod generate_completion_args;
mod input_handler;
pub mod ui;

use clap::{Parser, Subcommand};
pub use config_args::{ConfigAction, ConfigArgs};
pub use dub_args::DubArgs;
pub use generate_completion_args::GenerateCompletionArgs;
pub use input_handler::collect_video_files;
pub use ui::{create_progress_bar, print_error, print_success, print_warning};

/// Main CLI application structure defining the top-level interface.
#[derive(Parser, Debug)]
#[command(name = "tdse")]
#[command(about = "Temporal dub synthesis: re-voice a video in another language on its own timeline")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for the TDSE CLI application.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Dub a video, or a directory of videos, into another language
    Dub(DubArgs),

    /// Manage and inspect application configuration
    Config(ConfigArgs),

    /// Generate shell completion scripts
    GenerateCompletion(GenerateCompletionArgs),
}

/// Executes the TDSE CLI application with parsed arguments.
pub async fn run() -> crate::Result<()> {
    let config_service = std::sync::Arc::new(crate::config::ProductionConfigService::new()?);
    run_with_config(config_service.as_ref()).await
}

/// Runs the CLI with a provided configuration service, enabling dependency
/// injection for tests and alternative hosting.
pub async fn run_with_config(
    config_service: &dyn crate::config::ConfigService,
) -> crate::Result<()> {
    let cli = Cli::parse();
    crate::commands::dispatcher::dispatch_command_with_ref(cli.command, config_service).await
}
