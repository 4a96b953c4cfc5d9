//! Application services

pub mod downloader;
pub mod progress;
pub mod webhook;

pub use downloader::{HttpBannerFetcher, TokioDisk};
pub use progress::{ProgressNotification, ProgressSnapshot, ProgressStatus, ProgressTracker};
pub use webhook::{WebhookError, WebhookSender};
