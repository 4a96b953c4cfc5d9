//! Series database repository

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::jobs::banner_sync::SeriesProvider;

/// Series record from database
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SeriesRecord {
    pub id: i64,
    pub tvdb_id: Option<i64>,
    pub title: String,
    pub banner_url: Option<String>,
    pub path: Option<String>,
    pub monitored: bool,
    pub added_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Input for creating a series
#[derive(Debug)]
pub struct CreateSeries {
    pub tvdb_id: Option<i64>,
    pub title: String,
    pub banner_url: Option<String>,
    pub path: Option<String>,
    pub monitored: bool,
}

pub struct SeriesRepository {
    pool: SqlitePool,
}

impl SeriesRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get all series in listing (insertion) order
    pub async fn list_all(&self) -> Result<Vec<SeriesRecord>> {
        let records = sqlx::query_as::<_, SeriesRecord>(
            r#"
            SELECT id, tvdb_id, title, banner_url, path, monitored, added_at, updated_at
            FROM series
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Get a single series by id
    pub async fn get_by_id(&self, id: i64) -> Result<Option<SeriesRecord>> {
        let record = sqlx::query_as::<_, SeriesRecord>(
            r#"
            SELECT id, tvdb_id, title, banner_url, path, monitored, added_at, updated_at
            FROM series
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Insert a new series and return the stored record
    pub async fn insert(&self, input: CreateSeries) -> Result<SeriesRecord> {
        let now = chrono::Utc::now();

        let record = sqlx::query_as::<_, SeriesRecord>(
            r#"
            INSERT INTO series (tvdb_id, title, banner_url, path, monitored, added_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id, tvdb_id, title, banner_url, path, monitored, added_at, updated_at
            "#,
        )
        .bind(input.tvdb_id)
        .bind(&input.title)
        .bind(&input.banner_url)
        .bind(&input.path)
        .bind(input.monitored)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    /// Delete a series; returns false when the id did not exist
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM series WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl SeriesProvider for SeriesRepository {
    async fn list_all(&self) -> Result<Vec<SeriesRecord>> {
        SeriesRepository::list_all(self).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<SeriesRecord>> {
        SeriesRepository::get_by_id(self, id).await
    }
}
