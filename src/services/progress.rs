//! Job progress notifications
//!
//! A `ProgressNotification` is created per run and mutated only by the job
//! that owns it; everyone else reads point-in-time snapshots.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;

/// Terminal and in-flight states of a job run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    InProgress,
    Completed,
    Failed,
}

#[derive(Debug)]
struct ProgressInner {
    message: String,
    status: ProgressStatus,
}

/// Mutable status record for one job run
#[derive(Debug)]
pub struct ProgressNotification {
    title: String,
    inner: RwLock<ProgressInner>,
}

/// Point-in-time copy of a notification, safe to hand out
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressSnapshot {
    pub title: String,
    pub message: String,
    pub status: ProgressStatus,
}

impl ProgressNotification {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            inner: RwLock::new(ProgressInner {
                message: String::new(),
                status: ProgressStatus::InProgress,
            }),
        }
    }

    /// Update the current step description
    pub fn set_message(&self, message: impl Into<String>) {
        self.inner.write().message = message.into();
    }

    /// Mark the run as finished successfully
    pub fn complete(&self) {
        self.inner.write().status = ProgressStatus::Completed;
    }

    /// Mark the run as failed
    pub fn fail(&self) {
        self.inner.write().status = ProgressStatus::Failed;
    }

    pub fn status(&self) -> ProgressStatus {
        self.inner.read().status
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        let inner = self.inner.read();
        ProgressSnapshot {
            title: self.title.clone(),
            message: inner.message.clone(),
            status: inner.status,
        }
    }
}

/// Holds the notification of the most recent run for the progress endpoint
#[derive(Default)]
pub struct ProgressTracker {
    current: RwLock<Option<Arc<ProgressNotification>>>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new run as the current one
    pub fn begin(&self, notification: Arc<ProgressNotification>) {
        *self.current.write() = Some(notification);
    }

    /// Snapshot of the most recent run, if any run has happened
    pub fn snapshot(&self) -> Option<ProgressSnapshot> {
        self.current.read().as_ref().map(|n| n.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_starts_in_progress() {
        let notification = ProgressNotification::new("Banner Download");
        assert_eq!(notification.status(), ProgressStatus::InProgress);
        assert_eq!(notification.snapshot().message, "");
    }

    #[test]
    fn snapshot_reflects_updates() {
        let notification = ProgressNotification::new("Banner Download");
        notification.set_message("Processed 3 of 10");
        notification.complete();

        let snapshot = notification.snapshot();
        assert_eq!(snapshot.title, "Banner Download");
        assert_eq!(snapshot.message, "Processed 3 of 10");
        assert_eq!(snapshot.status, ProgressStatus::Completed);
    }

    #[test]
    fn tracker_exposes_latest_run() {
        let tracker = ProgressTracker::new();
        assert!(tracker.snapshot().is_none());

        let notification = Arc::new(ProgressNotification::new("Banner Download"));
        tracker.begin(notification.clone());
        notification.fail();

        let snapshot = tracker.snapshot().unwrap();
        assert_eq!(snapshot.status, ProgressStatus::Failed);
    }
}
