//! Banner sync job
//!
//! Downloads the remote banner image for one or every series in the library.
//! Individual download failures are recorded and the batch carries on; the
//! only fatal condition is failing to create the banner directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::db::SeriesRecord;
use crate::services::progress::ProgressNotification;

/// Supplies the series to sync. Implemented by the database repository;
/// tests substitute counting doubles.
#[async_trait]
pub trait SeriesProvider: Send + Sync {
    async fn list_all(&self) -> Result<Vec<SeriesRecord>>;
    async fn get_by_id(&self, id: i64) -> Result<Option<SeriesRecord>>;
}

/// One download attempt. `true` on success, `false` on any failure;
/// ordinary fetch failures never surface as errors.
#[async_trait]
pub trait BannerFetcher: Send + Sync {
    async fn download(&self, source_url: &str, destination: &Path) -> bool;
}

/// Filesystem access for the banner directory.
#[async_trait]
pub trait DiskProvider: Send + Sync {
    async fn create_directory(&self, path: &Path) -> Result<PathBuf>;
}

/// Result of one per-series sync step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Series has no banner URL; nothing to do
    Skipped,
    /// One download was attempted
    Attempted { success: bool },
}

/// Counters for a completed run
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SyncSummary {
    /// Series seen, including skips
    pub processed: usize,
    pub fetched: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl SyncSummary {
    fn record(&mut self, outcome: FetchOutcome) {
        self.processed += 1;
        match outcome {
            FetchOutcome::Skipped => self.skipped += 1,
            FetchOutcome::Attempted { success: true } => self.fetched += 1,
            FetchOutcome::Attempted { success: false } => self.failed += 1,
        }
    }
}

/// Batch job that downloads series banners to `<banner_root>/<id>.jpg`
pub struct BannerSyncJob {
    series: Arc<dyn SeriesProvider>,
    fetcher: Arc<dyn BannerFetcher>,
    disk: Arc<dyn DiskProvider>,
    banner_root: PathBuf,
}

impl BannerSyncJob {
    pub fn new(
        series: Arc<dyn SeriesProvider>,
        fetcher: Arc<dyn BannerFetcher>,
        disk: Arc<dyn DiskProvider>,
        banner_root: PathBuf,
    ) -> Self {
        Self {
            series,
            fetcher,
            disk,
            banner_root,
        }
    }

    /// Destination path for a series banner. Deterministic; one file per series.
    pub fn banner_path(&self, series_id: i64) -> PathBuf {
        self.banner_root.join(format!("{series_id}.jpg"))
    }

    /// Sync banners for every series, in listing order.
    ///
    /// Per-series failures are counted but never abort the batch. The run
    /// only errors when the banner directory cannot be created.
    pub async fn run_all(&self, notification: &ProgressNotification) -> Result<SyncSummary> {
        info!(job = "banner_sync", "Starting banner sync");

        self.ensure_banner_root(notification).await?;

        let series = self.series.list_all().await?;
        let total = series.len();
        let mut summary = SyncSummary::default();

        for item in &series {
            let outcome = self.fetch_banner(notification, item).await;
            summary.record(outcome);
            notification.set_message(format!("Processed {} of {}", summary.processed, total));
        }

        notification.complete();
        info!(
            job = "banner_sync",
            processed = summary.processed,
            fetched = summary.fetched,
            skipped = summary.skipped,
            failed = summary.failed,
            "Banner sync complete"
        );

        Ok(summary)
    }

    /// Sync the banner for a single series by id.
    ///
    /// A missing series, or one with no banner URL, completes as a no-op.
    pub async fn run_one(
        &self,
        notification: &ProgressNotification,
        series_id: i64,
    ) -> Result<SyncSummary> {
        info!(job = "banner_sync", series_id, "Starting banner sync");

        self.ensure_banner_root(notification).await?;

        let mut summary = SyncSummary::default();

        match self.series.get_by_id(series_id).await? {
            Some(series) => {
                let outcome = self.fetch_banner(notification, &series).await;
                summary.record(outcome);
            }
            None => {
                debug!(series_id, "Series not found, nothing to sync");
            }
        }

        notification.complete();
        Ok(summary)
    }

    /// The unit step: one download attempt for an already-resolved series.
    ///
    /// Does not touch the banner directory; callers ensure it exists first.
    pub async fn fetch_banner(
        &self,
        notification: &ProgressNotification,
        series: &SeriesRecord,
    ) -> FetchOutcome {
        let Some(url) = series.banner_url.as_deref().filter(|u| !u.is_empty()) else {
            debug!(series_id = series.id, "No banner URL, skipping");
            return FetchOutcome::Skipped;
        };

        notification.set_message(format!("Downloading banner for {}", series.title));

        let destination = self.banner_path(series.id);
        let success = self.fetcher.download(url, &destination).await;

        if !success {
            warn!(
                series_id = series.id,
                title = %series.title,
                "Banner download failed"
            );
        }

        FetchOutcome::Attempted { success }
    }

    /// Create the banner directory, failing the run when it cannot be created.
    async fn ensure_banner_root(&self, notification: &ProgressNotification) -> Result<()> {
        if let Err(e) = self.disk.create_directory(&self.banner_root).await {
            notification.fail();
            return Err(e).context("Failed to create banner directory");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoSeries;

    #[async_trait]
    impl SeriesProvider for NoSeries {
        async fn list_all(&self) -> Result<Vec<SeriesRecord>> {
            Ok(Vec::new())
        }

        async fn get_by_id(&self, _id: i64) -> Result<Option<SeriesRecord>> {
            Ok(None)
        }
    }

    struct NeverFetch;

    #[async_trait]
    impl BannerFetcher for NeverFetch {
        async fn download(&self, _source_url: &str, _destination: &Path) -> bool {
            panic!("fetcher should not be called");
        }
    }

    struct NoopDisk;

    #[async_trait]
    impl DiskProvider for NoopDisk {
        async fn create_directory(&self, path: &Path) -> Result<PathBuf> {
            Ok(path.to_path_buf())
        }
    }

    fn job() -> BannerSyncJob {
        BannerSyncJob::new(
            Arc::new(NoSeries),
            Arc::new(NeverFetch),
            Arc::new(NoopDisk),
            PathBuf::from("banners"),
        )
    }

    #[test]
    fn banner_path_is_id_dot_jpg_under_root() {
        assert_eq!(job().banner_path(12), PathBuf::from("banners/12.jpg"));
        assert_eq!(job().banner_path(1), PathBuf::from("banners/1.jpg"));
    }

    #[test]
    fn summary_counts_each_outcome() {
        let mut summary = SyncSummary::default();
        summary.record(FetchOutcome::Skipped);
        summary.record(FetchOutcome::Attempted { success: true });
        summary.record(FetchOutcome::Attempted { success: false });

        assert_eq!(summary.processed, 3);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.fetched, 1);
        assert_eq!(summary.failed, 1);
    }
}
