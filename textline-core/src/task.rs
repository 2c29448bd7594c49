//! Job and task-attempt identities supplied by the host engine

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of one write job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobContext {
    job_id: Uuid,
}

impl JobContext {
    /// Create a context with a fresh job id
    pub fn new() -> Self {
        Self {
            job_id: Uuid::new_v4(),
        }
    }

    /// Create a context for a known job id
    pub fn with_id(job_id: Uuid) -> Self {
        Self { job_id }
    }

    /// Job-scoped unique identifier
    pub fn job_id(&self) -> Uuid {
        self.job_id
    }

    /// Directory under `base` that only this job writes into
    pub fn scoped_output_dir(&self, base: &Path) -> PathBuf {
        base.join("_temporary").join(self.job_id.to_string())
    }

    /// Context for one attempt of the task with the given split index
    pub fn task(&self, split: u32, attempt: u32) -> TaskAttemptContext {
        TaskAttemptContext {
            job_id: self.job_id,
            split,
            attempt,
        }
    }
}

impl Default for JobContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Identity of one execution of a write task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskAttemptContext {
    job_id: Uuid,
    split: u32,
    attempt: u32,
}

impl TaskAttemptContext {
    /// Job this attempt belongs to
    pub fn job_id(&self) -> Uuid {
        self.job_id
    }

    /// Numeric split index of the task within its job
    pub fn split(&self) -> u32 {
        self.split
    }

    /// Attempt number of this execution
    pub fn attempt(&self) -> u32 {
        self.attempt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_dirs_differ_per_job() {
        let base = Path::new("/data/out");
        let a = JobContext::new();
        let b = JobContext::new();

        assert_ne!(a.scoped_output_dir(base), b.scoped_output_dir(base));
        assert!(a.scoped_output_dir(base).starts_with(base));
    }

    #[test]
    fn test_task_inherits_job_id() {
        let job = JobContext::new();
        let task = job.task(7, 1);

        assert_eq!(task.job_id(), job.job_id());
        assert_eq!(task.split(), 7);
        assert_eq!(task.attempt(), 1);
    }
}
