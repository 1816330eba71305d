//! The long-running video job poller.
//!
//! A job walks Submitted, Polling, then Completed or Failed. The poll tick
//! is a cancellable timer: dropping or firing the abandon signal halts
//! local polling between ticks without touching the remote operation
//! (the provider exposes no cancellation primitive, so abandoning a job is
//! forgetting it, not stopping it).
//!
//! The provider's operation handle is opaque about progress, so the poller
//! narrates a coarse phase story of its own: submitting, crafting,
//! rendering on every tick, finalizing around the result fetch.

use crate::blob::BlobStore;
use crate::error::StudioError;
use crate::job::{GenerationJob, JobStatus, VideoBrief};
use crate::keys::KeyChooser;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::watch;

const STATUS_SUBMITTING: &str = "Starting video generation engine...";
const STATUS_CRAFTING: &str = "AI is crafting scenes (usually takes 1-2 mins)...";
const STATUS_RENDERING: &str = "Rendering textures and motion...";
const STATUS_FINALIZING: &str = "Finalizing video file...";
const STATUS_READY: &str = "Video ready.";
const STATUS_FAILED: &str = "Video generation failed.";

const RESULT_MIME: &str = "video/mp4";

/// An in-progress remote render, as much of it as the poller needs.
#[derive(Debug, Clone)]
pub struct OperationHandle {
    pub name: String,
    pub done: bool,
    pub result_uri: Option<String>,
    pub error: Option<String>,
}

/// Provider calls the poller makes. One implementation talks to the real
/// API; tests script their own.
#[async_trait]
pub trait VideoOps: Send + Sync {
    /// Submit a render and receive the operation handle.
    async fn submit(&self, brief: &VideoBrief) -> Result<OperationHandle, StudioError>;

    /// Re-fetch the handle.
    async fn poll(&self, handle: &OperationHandle) -> Result<OperationHandle, StudioError>;

    /// Download the finished bytes behind a result locator.
    async fn fetch_result(&self, locator: &str) -> Result<Vec<u8>, StudioError>;
}

#[async_trait]
impl<T: VideoOps + ?Sized> VideoOps for std::sync::Arc<T> {
    async fn submit(&self, brief: &VideoBrief) -> Result<OperationHandle, StudioError> {
        (**self).submit(brief).await
    }

    async fn poll(&self, handle: &OperationHandle) -> Result<OperationHandle, StudioError> {
        (**self).poll(handle).await
    }

    async fn fetch_result(&self, locator: &str) -> Result<Vec<u8>, StudioError> {
        (**self).fetch_result(locator).await
    }
}

/// Poll cadence. The exact interval is a policy choice; anything in the
/// 5 to 10 second range behaves the same.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self { interval: Duration::from_secs(8) }
    }
}

/// Runs video jobs end to end: submit, poll, materialize the result.
pub struct VideoLab<O, K> {
    ops: O,
    chooser: K,
    blobs: BlobStore,
    policy: PollPolicy,
}

impl<O: VideoOps, K: KeyChooser> VideoLab<O, K> {
    pub fn new(ops: O, chooser: K) -> Self {
        Self { ops, chooser, blobs: BlobStore::new(), policy: PollPolicy::default() }
    }

    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_blob_store(mut self, blobs: BlobStore) -> Self {
        self.blobs = blobs;
        self
    }

    /// The store holding finished video bytes.
    pub fn blobs(&self) -> &BlobStore {
        &self.blobs
    }

    /// Run one job to a terminal state.
    ///
    /// `on_status` fires on every visible change. `abandon` halts local
    /// polling between ticks; the job is returned as it stood, still
    /// non-terminal. A completed job's `result_uri` is a `blob:` locator
    /// into [`Self::blobs`], never the remote URL.
    #[tracing::instrument(skip_all, fields(aspect = brief.aspect_ratio.as_str()))]
    pub async fn generate<F>(
        &self,
        brief: VideoBrief,
        mut abandon: watch::Receiver<bool>,
        mut on_status: F,
    ) -> GenerationJob
    where
        F: FnMut(&GenerationJob) + Send,
    {
        let mut job = GenerationJob::new(brief, STATUS_SUBMITTING);
        on_status(&job);

        if !self.chooser.has_selected_key().await {
            job.set_status(JobStatus::Submitted, "Waiting for API Key selection...");
            on_status(&job);
            self.chooser.open_select_key().await;
            if !self.chooser.has_selected_key().await {
                job.fail("no API key selected", STATUS_FAILED);
                on_status(&job);
                return job;
            }
        }

        let mut handle = match self.ops.submit(&job.brief).await {
            Ok(handle) => handle,
            Err(e) => return self.fail_job(job, e, &mut on_status).await,
        };
        tracing::info!(operation = %handle.name, "render submitted");
        job.set_status(JobStatus::Polling, STATUS_CRAFTING);
        on_status(&job);

        while !handle.done {
            tokio::select! {
                changed = abandon.changed() => {
                    if changed.is_err() || *abandon.borrow() {
                        tracing::debug!(operation = %handle.name, "polling abandoned");
                        return job;
                    }
                }
                _ = tokio::time::sleep(self.policy.interval) => {
                    handle = match self.ops.poll(&handle).await {
                        Ok(handle) => handle,
                        Err(e) => return self.fail_job(job, e, &mut on_status).await,
                    };
                    if !handle.done {
                        job.set_status(JobStatus::Polling, STATUS_RENDERING);
                        on_status(&job);
                    }
                }
            }
        }

        if let Some(message) = handle.error {
            let err = if message.contains("Requested entity was not found") {
                StudioError::EntityNotFound
            } else {
                StudioError::network(message)
            };
            return self.fail_job(job, err, &mut on_status).await;
        }

        let Some(locator) = handle.result_uri else {
            let err = StudioError::malformed("operation finished without a result locator");
            return self.fail_job(job, err, &mut on_status).await;
        };

        job.set_status(JobStatus::Polling, STATUS_FINALIZING);
        on_status(&job);

        // The single result-bytes fetch for this job.
        match self.ops.fetch_result(&locator).await {
            Ok(bytes) => {
                let blob_uri = self.blobs.insert(bytes, RESULT_MIME);
                job.complete(blob_uri, STATUS_READY);
                on_status(&job);
                job
            }
            Err(e) => self.fail_job(job, e, &mut on_status).await,
        }
    }

    /// Terminal failure path. An entity-not-found failure additionally
    /// opens the key chooser once, as a recovery hint for the next
    /// submission; the job itself is never resubmitted.
    async fn fail_job<F>(
        &self,
        mut job: GenerationJob,
        err: StudioError,
        on_status: &mut F,
    ) -> GenerationJob
    where
        F: FnMut(&GenerationJob) + Send,
    {
        if err.is_entity_not_found() {
            tracing::warn!("provider rejected the credential mid-job, reopening key selection");
            self.chooser.open_select_key().await;
            if !self.chooser.has_selected_key().await {
                tracing::warn!("key selection dismissed without a choice");
            }
        }
        job.fail(err.to_string(), STATUS_FAILED);
        on_status(&job);
        job
    }
}
