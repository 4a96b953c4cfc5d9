//! Outbound webhook notifications
//!
//! Builds the JSON payloads for library events (grab, import, delete, rename,
//! health, update) and POSTs them to the configured endpoint. Delivery is a
//! single attempt; failures surface as a typed error for the caller to log.

use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::db::SeriesRecord;

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("no webhook URL configured")]
    NotConfigured,
    #[error("webhook returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WebhookEventType {
    Grab,
    Download,
    SeriesAdded,
    EpisodeFileDelete,
    SeriesDelete,
    Rename,
    Health,
    ApplicationUpdate,
    Test,
}

/// Series fields shared by every payload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookSeries {
    pub id: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tvdb_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_path: Option<String>,
}

impl From<&SeriesRecord> for WebhookSeries {
    fn from(series: &SeriesRecord) -> Self {
        Self {
            id: series.id,
            title: series.title.clone(),
            tvdb_id: series.tvdb_id,
            folder_path: series.path.clone(),
        }
    }
}

/// Release details attached to grab events
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRelease {
    pub quality: String,
    pub quality_version: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_group: Option<String>,
    pub release_title: String,
    pub indexer: String,
    pub size: i64,
}

/// An episode file referenced by import/delete events
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEpisodeFile {
    pub id: i64,
    pub relative_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub quality: String,
    pub size: i64,
}

/// Caller-side description of a grabbed release
#[derive(Debug, Clone)]
pub struct GrabbedRelease {
    pub quality: String,
    pub quality_version: i32,
    pub release_group: Option<String>,
    pub release_title: String,
    pub indexer: String,
    pub size: i64,
    pub download_client: Option<String>,
    pub download_client_type: Option<String>,
    pub download_id: Option<String>,
}

/// Caller-side description of an imported or deleted episode file
#[derive(Debug, Clone)]
pub struct EpisodeFileInfo {
    pub id: i64,
    pub relative_path: String,
    pub quality: String,
    pub size: i64,
}

/// One renamed file for rename events
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRenamedFile {
    pub previous_relative_path: String,
    pub relative_path: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookGrabPayload {
    pub event_type: WebhookEventType,
    pub instance_name: String,
    pub series: WebhookSeries,
    pub release: WebhookRelease,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_client: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_client_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookImportPayload {
    pub event_type: WebhookEventType,
    pub instance_name: String,
    pub series: WebhookSeries,
    pub episode_file: WebhookEpisodeFile,
    pub is_upgrade: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_files: Option<Vec<WebhookEpisodeFile>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookSeriesAddedPayload {
    pub event_type: WebhookEventType,
    pub instance_name: String,
    pub series: WebhookSeries,
    pub add_method: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEpisodeFileDeletePayload {
    pub event_type: WebhookEventType,
    pub instance_name: String,
    pub series: WebhookSeries,
    pub episode_file: WebhookEpisodeFile,
    pub delete_reason: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookSeriesDeletePayload {
    pub event_type: WebhookEventType,
    pub instance_name: String,
    pub series: WebhookSeries,
    pub deleted_files: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_folder_size: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRenamePayload {
    pub event_type: WebhookEventType,
    pub instance_name: String,
    pub series: WebhookSeries,
    pub renamed_files: Vec<WebhookRenamedFile>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookHealthPayload {
    pub event_type: WebhookEventType,
    pub instance_name: String,
    pub level: String,
    pub message: String,
    #[serde(rename = "type")]
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wiki_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookApplicationUpdatePayload {
    pub event_type: WebhookEventType,
    pub instance_name: String,
    pub message: String,
    pub previous_version: String,
    pub new_version: String,
}

/// Builds event payloads and delivers them to the configured endpoint
pub struct WebhookSender {
    instance_name: String,
    url: Option<Url>,
    client: reqwest::Client,
}

impl WebhookSender {
    pub fn new(instance_name: String, url: Option<Url>) -> Self {
        Self {
            instance_name,
            url,
            client: reqwest::Client::new(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some()
    }

    pub fn grab_payload(
        &self,
        series: &SeriesRecord,
        release: &GrabbedRelease,
    ) -> WebhookGrabPayload {
        WebhookGrabPayload {
            event_type: WebhookEventType::Grab,
            instance_name: self.instance_name.clone(),
            series: series.into(),
            release: WebhookRelease {
                quality: release.quality.clone(),
                quality_version: release.quality_version,
                release_group: release.release_group.clone(),
                release_title: release.release_title.clone(),
                indexer: release.indexer.clone(),
                size: release.size,
            },
            download_client: release.download_client.clone(),
            download_client_type: release.download_client_type.clone(),
            download_id: release.download_id.clone(),
        }
    }

    pub fn import_payload(
        &self,
        series: &SeriesRecord,
        episode_file: &EpisodeFileInfo,
        replaced_files: &[EpisodeFileInfo],
    ) -> WebhookImportPayload {
        let deleted_files = if replaced_files.is_empty() {
            None
        } else {
            // Replaced files are reported with their full path under the series folder
            Some(
                replaced_files
                    .iter()
                    .map(|f| self.episode_file(f, series.path.as_deref()))
                    .collect(),
            )
        };

        WebhookImportPayload {
            event_type: WebhookEventType::Download,
            instance_name: self.instance_name.clone(),
            series: series.into(),
            episode_file: self.episode_file(episode_file, None),
            is_upgrade: !replaced_files.is_empty(),
            deleted_files,
        }
    }

    pub fn series_added_payload(
        &self,
        series: &SeriesRecord,
        add_method: &str,
    ) -> WebhookSeriesAddedPayload {
        WebhookSeriesAddedPayload {
            event_type: WebhookEventType::SeriesAdded,
            instance_name: self.instance_name.clone(),
            series: series.into(),
            add_method: add_method.to_string(),
        }
    }

    pub fn episode_file_delete_payload(
        &self,
        series: &SeriesRecord,
        episode_file: &EpisodeFileInfo,
        delete_reason: &str,
    ) -> WebhookEpisodeFileDeletePayload {
        WebhookEpisodeFileDeletePayload {
            event_type: WebhookEventType::EpisodeFileDelete,
            instance_name: self.instance_name.clone(),
            series: series.into(),
            episode_file: self.episode_file(episode_file, None),
            delete_reason: delete_reason.to_string(),
        }
    }

    pub fn series_delete_payload(
        &self,
        series: &SeriesRecord,
        deleted_files: bool,
        folder_size: Option<i64>,
    ) -> WebhookSeriesDeletePayload {
        WebhookSeriesDeletePayload {
            event_type: WebhookEventType::SeriesDelete,
            instance_name: self.instance_name.clone(),
            series: series.into(),
            deleted_files,
            // Folder size is only meaningful when files were actually removed
            series_folder_size: if deleted_files { folder_size } else { None },
        }
    }

    pub fn rename_payload(
        &self,
        series: &SeriesRecord,
        renamed_files: Vec<WebhookRenamedFile>,
    ) -> WebhookRenamePayload {
        WebhookRenamePayload {
            event_type: WebhookEventType::Rename,
            instance_name: self.instance_name.clone(),
            series: series.into(),
            renamed_files,
        }
    }

    pub fn health_payload(
        &self,
        level: &str,
        message: &str,
        source: &str,
        wiki_url: Option<&str>,
    ) -> WebhookHealthPayload {
        WebhookHealthPayload {
            event_type: WebhookEventType::Health,
            instance_name: self.instance_name.clone(),
            level: level.to_string(),
            message: message.to_string(),
            source: source.to_string(),
            wiki_url: wiki_url.map(str::to_string),
        }
    }

    pub fn application_update_payload(
        &self,
        message: &str,
        previous_version: &str,
        new_version: &str,
    ) -> WebhookApplicationUpdatePayload {
        WebhookApplicationUpdatePayload {
            event_type: WebhookEventType::ApplicationUpdate,
            instance_name: self.instance_name.clone(),
            message: message.to_string(),
            previous_version: previous_version.to_string(),
            new_version: new_version.to_string(),
        }
    }

    /// Grab-shaped payload with fixed placeholder values for connection tests
    pub fn test_payload(&self) -> WebhookGrabPayload {
        WebhookGrabPayload {
            event_type: WebhookEventType::Test,
            instance_name: self.instance_name.clone(),
            series: WebhookSeries {
                id: 1,
                title: "Test Title".to_string(),
                tvdb_id: Some(1234),
                folder_path: Some("/testpath".to_string()),
            },
            release: WebhookRelease {
                quality: "Test Quality".to_string(),
                quality_version: 1,
                release_group: Some("Test Group".to_string()),
                release_title: "Test Title".to_string(),
                indexer: "Test Indexer".to_string(),
                size: 9_999_999,
            },
            download_client: None,
            download_client_type: None,
            download_id: None,
        }
    }

    /// POST a payload as JSON to the configured URL. One attempt, no retries.
    pub async fn send<T: Serialize>(&self, payload: &T) -> Result<(), WebhookError> {
        let url = self.url.as_ref().ok_or(WebhookError::NotConfigured)?;

        let response = self.client.post(url.clone()).json(payload).send().await?;

        if !response.status().is_success() {
            return Err(WebhookError::Status(response.status()));
        }

        Ok(())
    }

    fn episode_file(
        &self,
        file: &EpisodeFileInfo,
        series_path: Option<&str>,
    ) -> WebhookEpisodeFile {
        WebhookEpisodeFile {
            id: file.id,
            relative_path: file.relative_path.clone(),
            path: series_path.map(|base| format!("{}/{}", base, file.relative_path)),
            quality: file.quality.clone(),
            size: file.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sender() -> WebhookSender {
        WebhookSender::new("Showkeeper".to_string(), None)
    }

    fn series() -> SeriesRecord {
        SeriesRecord {
            id: 42,
            tvdb_id: Some(7),
            title: "The Expanse".to_string(),
            banner_url: Some("http://images.example/42.jpg".to_string()),
            path: Some("/tv/The Expanse".to_string()),
            monitored: true,
            added_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn file(id: i64, relative_path: &str) -> EpisodeFileInfo {
        EpisodeFileInfo {
            id,
            relative_path: relative_path.to_string(),
            quality: "WEBDL-1080p".to_string(),
            size: 1_000,
        }
    }

    #[test]
    fn grab_payload_carries_release_and_download_client() {
        let release = GrabbedRelease {
            quality: "WEBDL-1080p".to_string(),
            quality_version: 2,
            release_group: Some("GROUP".to_string()),
            release_title: "The.Expanse.S01E01.1080p.WEB-DL".to_string(),
            indexer: "Indexer A".to_string(),
            size: 2_000_000,
            download_client: Some("qbittorrent".to_string()),
            download_client_type: Some("torrent".to_string()),
            download_id: Some("abc123".to_string()),
        };
        let payload = sender().grab_payload(&series(), &release);

        assert_eq!(payload.event_type, WebhookEventType::Grab);
        assert_eq!(payload.release.quality_version, 2);
        assert_eq!(payload.release.indexer, "Indexer A");
        assert_eq!(payload.download_id.as_deref(), Some("abc123"));
    }

    #[test]
    fn rename_payload_lists_previous_and_current_paths() {
        let renamed = vec![WebhookRenamedFile {
            previous_relative_path: "s01e01.mkv".to_string(),
            relative_path: "S01E01 - Dulcinea.mkv".to_string(),
        }];
        let payload = sender().rename_payload(&series(), renamed);

        assert_eq!(payload.renamed_files.len(), 1);
        assert_eq!(payload.renamed_files[0].previous_relative_path, "s01e01.mkv");
    }

    #[test]
    fn episode_file_delete_payload_includes_the_reason() {
        let payload =
            sender().episode_file_delete_payload(&series(), &file(9, "S01E02.mkv"), "upgrade");

        assert_eq!(payload.event_type, WebhookEventType::EpisodeFileDelete);
        assert_eq!(payload.delete_reason, "upgrade");
        assert_eq!(payload.episode_file.id, 9);
    }

    #[test]
    fn import_without_replaced_files_is_not_an_upgrade() {
        let payload = sender().import_payload(&series(), &file(1, "S01E01.mkv"), &[]);

        assert!(!payload.is_upgrade);
        assert!(payload.deleted_files.is_none());
    }

    #[test]
    fn import_with_replaced_files_lists_their_full_paths() {
        let payload = sender().import_payload(
            &series(),
            &file(2, "S01E01.mkv"),
            &[file(1, "S01E01.old.mkv")],
        );

        assert!(payload.is_upgrade);
        let deleted = payload.deleted_files.unwrap();
        assert_eq!(deleted.len(), 1);
        assert_eq!(
            deleted[0].path.as_deref(),
            Some("/tv/The Expanse/S01E01.old.mkv")
        );
    }

    #[test]
    fn series_delete_only_reports_size_when_files_were_deleted() {
        let with_files = sender().series_delete_payload(&series(), true, Some(5_000));
        assert_eq!(with_files.series_folder_size, Some(5_000));

        let without_files = sender().series_delete_payload(&series(), false, Some(5_000));
        assert_eq!(without_files.series_folder_size, None);
    }

    #[test]
    fn test_payload_uses_placeholder_values() {
        let payload = sender().test_payload();

        assert_eq!(payload.event_type, WebhookEventType::Test);
        assert_eq!(payload.series.id, 1);
        assert_eq!(payload.series.title, "Test Title");
        assert_eq!(payload.release.indexer, "Test Indexer");
        assert_eq!(payload.release.size, 9_999_999);
    }

    #[test]
    fn payloads_serialize_with_camel_case_fields() {
        let payload = sender().series_added_payload(&series(), "manual");
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["eventType"], "SeriesAdded");
        assert_eq!(json["instanceName"], "Showkeeper");
        assert_eq!(json["addMethod"], "manual");
        assert_eq!(json["series"]["tvdbId"], 7);
    }

    #[test]
    fn health_payload_renames_source_to_type() {
        let payload = sender().health_payload(
            "warning",
            "Indexer unreachable",
            "IndexerStatusCheck",
            Some("https://wiki.example/indexers"),
        );
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["eventType"], "Health");
        assert_eq!(json["type"], "IndexerStatusCheck");
        assert_eq!(json["wikiUrl"], "https://wiki.example/indexers");
    }

    #[test]
    fn application_update_payload_carries_both_versions() {
        let payload = sender().application_update_payload("Updated", "1.0.0", "1.1.0");

        assert_eq!(payload.previous_version, "1.0.0");
        assert_eq!(payload.new_version, "1.1.0");
        assert_eq!(payload.event_type, WebhookEventType::ApplicationUpdate);
    }

    #[tokio::test]
    async fn send_without_url_is_not_configured() {
        let payload = sender().test_payload();
        let result = sender().send(&payload).await;

        assert!(matches!(result, Err(WebhookError::NotConfigured)));
    }
}
