//! Background job scheduling and workers

pub mod banner_sync;

use std::sync::Arc;

use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::info;

use crate::jobs::banner_sync::BannerSyncJob;
use crate::services::progress::{ProgressNotification, ProgressTracker};

/// Initialize and start the job scheduler
pub async fn start_scheduler(
    banner_job: Arc<BannerSyncJob>,
    progress: Arc<ProgressTracker>,
) -> anyhow::Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    // Banner sync - run nightly at 2 AM
    let sync_job = Job::new_async("0 0 2 * * *", move |_uuid, _l| {
        let job = banner_job.clone();
        let progress = progress.clone();
        Box::pin(async move {
            info!("Running scheduled banner sync");
            let notification = Arc::new(ProgressNotification::new("Banner Download"));
            progress.begin(notification.clone());
            if let Err(e) = job.run_all(&notification).await {
                tracing::error!("Banner sync error: {e:#}");
            }
        })
    })?;
    scheduler.add(sync_job).await?;

    scheduler.start().await?;

    info!("Job scheduler started");
    Ok(scheduler)
}
