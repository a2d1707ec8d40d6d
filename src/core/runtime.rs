//! Download job runtime.
//!
//! A thin async command queue that runs submitted jobs one at a time on a
//! background task, so callers stay responsive while a job downloads and
//! merges. Cancellation bypasses the queue through a shared flag map.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::core::models::{AppError, AppResult, DownloadJob, JobOutcome};
use crate::core::pipeline::{CancelFlag, DownloadPipeline};

/// Commands understood by the runtime router.
#[derive(Debug)]
pub enum RuntimeCommand {
    Run {
        job: DownloadJob,
        cancel: CancelFlag,
        respond_to: oneshot::Sender<AppResult<JobOutcome>>,
    },
}

/// Handle exposed to the command layer.
#[derive(Clone)]
pub struct JobRuntimeHandle {
    sender: mpsc::Sender<RuntimeCommand>,
    active: Arc<DashMap<Uuid, CancelFlag>>,
}

impl JobRuntimeHandle {
    fn new(sender: mpsc::Sender<RuntimeCommand>) -> Self {
        Self {
            sender,
            active: Arc::new(DashMap::new()),
        }
    }

    async fn send_command<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<AppResult<T>>) -> RuntimeCommand,
    ) -> AppResult<T> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(build(tx))
            .await
            .map_err(|e| AppError::System(format!("Job runtime unavailable: {}", e)))?;
        rx.await
            .map_err(|_| AppError::System("Job runtime dropped response".into()))?
    }

    /// Queue `job` and wait for its outcome. The job can be cancelled by id
    /// while it waits in the queue or runs.
    pub async fn submit(&self, job: DownloadJob) -> AppResult<JobOutcome> {
        let job_id = job.id;
        let cancel = CancelFlag::new();
        self.active.insert(job_id, cancel.clone());

        let result = self
            .send_command(|tx| RuntimeCommand::Run {
                job,
                cancel,
                respond_to: tx,
            })
            .await;

        self.active.remove(&job_id);
        result
    }

    /// Request cancellation of a queued or running job
    pub fn cancel(&self, job_id: Uuid) -> bool {
        match self.active.get(&job_id) {
            Some(flag) => {
                flag.cancel();
                info!("🛑 Cancellation requested for job {}", job_id);
                true
            }
            None => false,
        }
    }
}

/// Spawn the router loop on the current tokio runtime.
pub fn spawn_job_runtime(pipeline: DownloadPipeline) -> AppResult<JobRuntimeHandle> {
    let handle = Handle::try_current()
        .map_err(|e| AppError::System(format!("No tokio runtime for job router: {}", e)))?;

    let (tx, rx) = mpsc::channel(32);
    handle.spawn(router_loop(pipeline, rx));
    debug!("[RUNTIME] Job router spawned");

    Ok(JobRuntimeHandle::new(tx))
}

async fn router_loop(pipeline: DownloadPipeline, mut rx: mpsc::Receiver<RuntimeCommand>) {
    while let Some(cmd) = rx.recv().await {
        handle_command(&pipeline, cmd).await;
    }
    debug!("Job runtime channel closed, exiting router loop");
}

#[instrument(skip(pipeline, command))]
async fn handle_command(pipeline: &DownloadPipeline, command: RuntimeCommand) {
    match command {
        RuntimeCommand::Run {
            job,
            cancel,
            respond_to,
        } => {
            debug!("[RUNTIME_CMD] Processing job: {}", job.id);
            let result = pipeline.run(&job, &cancel).await;
            debug!(
                "[RUNTIME_CMD] Job {} finished, success: {}",
                job.id,
                result.is_ok()
            );
            let _ = respond_to.send(result);
        }
    }
}
