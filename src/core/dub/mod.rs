//! Temporal Dub Synthesis Engine (TDSE): the subsystem that, given an
//! original audio duration, recognizer segments, and a translated text,
//! produces a dubbed audio track whose duration matches the original and
//! whose per-segment timing tracks the recognizer's intervals.
//!
//! Data flow: Splitter → Aligner → (Calibrator ⇄ Synthesizer per segment) →
//! Bookkeeper interleaved → Assembler → Final-trim, all driven by the
//! [`strategy::run_ladder`] fallback ladder in [`engine::DubEngine::dub`].

pub mod aligner;
pub mod assembler;
pub mod calibrator;
pub mod engine;
pub mod job;
pub mod splitter;
pub mod strategy;
pub mod timestamp;
pub mod types;
pub mod voice_table;

pub use engine::DubEngine;
pub use job::SynthesisJob;
pub use strategy::{run_ladder, DubStrategy};
pub use types::*;
