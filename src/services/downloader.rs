//! Concrete network and filesystem collaborators for the banner sync job

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::jobs::banner_sync::{BannerFetcher, DiskProvider};

/// Downloads banners over HTTP with a shared reqwest client
pub struct HttpBannerFetcher {
    client: reqwest::Client,
}

impl HttpBannerFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    async fn try_download(&self, source_url: &str, destination: &Path) -> Result<()> {
        let response = self
            .client
            .get(source_url)
            .send()
            .await
            .context("Failed to request banner")?;

        if !response.status().is_success() {
            anyhow::bail!("Banner request returned {}", response.status());
        }

        let bytes = response
            .bytes()
            .await
            .context("Failed to read banner body")?;

        tokio::fs::write(destination, &bytes)
            .await
            .context("Failed to write banner file")?;

        debug!(url = %source_url, path = %destination.display(), size = bytes.len(), "Banner downloaded");
        Ok(())
    }
}

impl Default for HttpBannerFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BannerFetcher for HttpBannerFetcher {
    async fn download(&self, source_url: &str, destination: &Path) -> bool {
        match self.try_download(source_url, destination).await {
            Ok(()) => true,
            Err(e) => {
                warn!(url = %source_url, error = %format!("{e:#}"), "Banner download failed");
                false
            }
        }
    }
}

/// Filesystem access backed by tokio::fs
pub struct TokioDisk;

#[async_trait]
impl DiskProvider for TokioDisk {
    async fn create_directory(&self, path: &Path) -> Result<PathBuf> {
        tokio::fs::create_dir_all(path)
            .await
            .with_context(|| format!("Failed to create directory {}", path.display()))?;

        Ok(path.to_path_buf())
    }
}
