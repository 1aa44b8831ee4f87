//! Synthesis job: the per-run owner of the scoped temporary workspace and
//! the inputs the engine threads through the fallback ladder.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use uuid::Uuid;

use crate::core::dub::types::RecognizerSegment;
use crate::error::TdseResult;

/// One complete run of the pipeline for a single input video.
///
/// Owns the job's `tempfile::TempDir`; every transient artifact the engine
/// writes lives under it and is deleted when the job is dropped, on every
/// exit path, matching the teacher's scoped-transcoder lifecycle.
pub struct SynthesisJob {
    id: Uuid,
    workspace: TempDir,
    pub original_duration_s: f64,
    pub recognizer_segments: Vec<RecognizerSegment>,
    progress: usize,
}

impl SynthesisJob {
    /// Creates a new job, normalizing recognizer segments (repairing
    /// inverted or zero-duration intervals) up front.
    pub fn new(original_duration_s: f64, recognizer_segments: Vec<RecognizerSegment>) -> TdseResult<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            workspace: TempDir::new()?,
            original_duration_s,
            recognizer_segments: recognizer_segments.into_iter().map(|s| s.normalized()).collect(),
            progress: 0,
        })
    }

    /// The job's unique identifier, used to correlate log records across a run.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The job's scoped temporary directory.
    pub fn workspace_path(&self) -> &Path {
        self.workspace.path()
    }

    /// Builds a path for `name` inside the job's workspace.
    pub fn artifact_path(&self, name: &str) -> PathBuf {
        self.workspace.path().join(name)
    }

    /// Advances and returns the job's monotonic progress counter.
    pub fn advance(&mut self) -> usize {
        self.progress += 1;
        self.progress
    }

    pub fn progress(&self) -> usize {
        self.progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_segments_on_construction() {
        let job = SynthesisJob::new(
            10.0,
            vec![RecognizerSegment {
                start_s: 5.0,
                end_s: 4.0,
                text: "invalid".to_string(),
            }],
        )
        .unwrap();
        assert_eq!(job.recognizer_segments[0].end_s, 5.1);
    }

    #[test]
    fn artifact_path_lives_under_workspace() {
        let job = SynthesisJob::new(1.0, vec![]).unwrap();
        let p = job.artifact_path("foo.wav");
        assert_eq!(p.parent().unwrap(), job.workspace_path());
    }

    #[test]
    fn progress_advances_monotonically() {
        let mut job = SynthesisJob::new(1.0, vec![]).unwrap();
        assert_eq!(job.advance(), 1);
        assert_eq!(job.advance(), 2);
        assert_eq!(job.progress(), 2);
    }

    #[test]
    fn each_job_gets_a_distinct_id() {
        let a = SynthesisJob::new(1.0, vec![]).unwrap();
        let b = SynthesisJob::new(1.0, vec![]).unwrap();
        assert_ne!(a.id(), b.id());
    }
}
