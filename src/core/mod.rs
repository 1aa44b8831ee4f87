//! Core processing engine.
//!
//! - `dub` — the Temporal Dub Synthesis Engine: splitting, alignment, rate
//!   calibration, segment synthesis, silence bookkeeping, assembly, and the
//!   fallback ladder.
//! - `parallel` — bounded concurrent fan-out for batches of independent jobs.
#![allow(dead_code)]

pub mod dub;
pub mod parallel;
