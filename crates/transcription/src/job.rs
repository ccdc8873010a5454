use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

/// Lifecycle of one pipeline invocation:
/// `starting → running → {completed | error}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Starting,
    Running,
    Completed,
    Error,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error)
    }
}

/// Snapshot of one transcription job.
#[derive(Debug, Clone, Serialize)]
pub struct Job {
    pub id: String,
    pub filename: String,
    pub status: JobStatus,
    pub progress: u8,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Receives progress updates from a running pipeline.
///
/// The pipeline itself stays free of any registry; the serving component
/// bridges updates into its own job store through this trait.
pub trait ProgressSink: Send + Sync {
    fn update(&self, progress: u8, message: &str);
}

/// Sink that discards updates. Pipeline stages still log through tracing.
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn update(&self, _progress: u8, _message: &str) {}
}

/// Registry of jobs, owned by the serving component and injected where
/// needed.
///
/// Mutation only happens through these methods, from the job's own worker
/// task. Terminal states are final: a retry is a brand-new job with its
/// own id.
#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: DashMap<String, Job>,
}

impl JobRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Creates a job in `starting` state.
    pub fn create(&self, filename: &str) -> Job {
        let job = Job {
            id: Uuid::new_v4().to_string(),
            filename: filename.to_string(),
            status: JobStatus::Starting,
            progress: 0,
            message: "Preparing transcription".to_string(),
            result: None,
            error: None,
            created_at: Utc::now(),
        };
        self.jobs.insert(job.id.clone(), job.clone());
        info!(job = %job.id, filename, "Job created");
        job
    }

    pub fn get(&self, id: &str) -> Option<Job> {
        self.jobs.get(id).map(|j| j.clone())
    }

    /// Records progress. The first update moves `starting` to `running`.
    /// Updates against a terminal job are ignored.
    pub fn update_progress(&self, id: &str, progress: u8, message: &str) {
        if let Some(mut job) = self.jobs.get_mut(id) {
            if job.status.is_terminal() {
                return;
            }
            job.status = JobStatus::Running;
            job.progress = progress.min(100);
            job.message = message.to_string();
        }
    }

    /// Marks completion. Only called once the rendered transcript artifact
    /// is confirmed written.
    pub fn complete(&self, id: &str, result_location: &str) {
        if let Some(mut job) = self.jobs.get_mut(id) {
            if job.status.is_terminal() {
                return;
            }
            job.status = JobStatus::Completed;
            job.progress = 100;
            job.message = "Transcription completed".to_string();
            job.result = Some(result_location.to_string());
            info!(job = %job.id, result = result_location, "Job completed");
        }
    }

    /// Marks failure. Progress stays frozen at its last reported value and
    /// the collaborator's raw output is preserved in `error`.
    pub fn fail(&self, id: &str, message: &str, detail: Option<String>) {
        if let Some(mut job) = self.jobs.get_mut(id) {
            if job.status.is_terminal() {
                return;
            }
            job.status = JobStatus::Error;
            job.message = message.to_string();
            job.error = detail;
            info!(job = %job.id, message, "Job failed");
        }
    }
}

/// Sink that writes progress into a registry entry.
pub struct RegistryProgress {
    registry: Arc<JobRegistry>,
    job_id: String,
}

impl RegistryProgress {
    pub fn new(registry: Arc<JobRegistry>, job_id: String) -> Self {
        Self { registry, job_id }
    }
}

impl ProgressSink for RegistryProgress {
    fn update(&self, progress: u8, message: &str) {
        self.registry.update_progress(&self.job_id, progress, message);
    }
}
