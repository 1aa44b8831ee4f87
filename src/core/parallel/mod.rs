//! Outer batch fan-out for independent dub jobs (e.g. a directory of
//! videos). Each spawned task owns one fully independent
//! [`crate::core::dub::SynthesisJob`] end to end; there is no shared
//! mutable state across jobs, only a bounded concurrency semaphore.

pub mod config;
pub mod runner;

pub use config::ParallelConfig;
pub use runner::run_batch;
