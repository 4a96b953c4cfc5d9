//! Integration tests for the series repository against a real SQLite file

use showkeeper::db::{CreateSeries, Database};
use tempfile::TempDir;

async fn database() -> (Database, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("showkeeper-test.db");
    let db = Database::connect(path.to_str().unwrap()).await.unwrap();
    db.sync_schema().await.unwrap();
    (db, dir)
}

fn create(title: &str, banner_url: Option<&str>) -> CreateSeries {
    CreateSeries {
        tvdb_id: None,
        title: title.to_string(),
        banner_url: banner_url.map(str::to_string),
        path: None,
        monitored: true,
    }
}

#[tokio::test]
async fn insert_then_get_round_trips() {
    let (db, _dir) = database().await;
    let repo = db.series();

    let inserted = repo
        .insert(create("Dark", Some("http://images.example/dark.jpg")))
        .await
        .unwrap();

    let fetched = repo.get_by_id(inserted.id).await.unwrap().unwrap();
    assert_eq!(fetched.title, "Dark");
    assert_eq!(
        fetched.banner_url.as_deref(),
        Some("http://images.example/dark.jpg")
    );
    assert!(fetched.monitored);
}

#[tokio::test]
async fn list_all_returns_insertion_order() {
    let (db, _dir) = database().await;
    let repo = db.series();

    repo.insert(create("First", None)).await.unwrap();
    repo.insert(create("Second", None)).await.unwrap();
    repo.insert(create("Third", None)).await.unwrap();

    let all = repo.list_all().await.unwrap();
    let titles: Vec<_> = all.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["First", "Second", "Third"]);
}

#[tokio::test]
async fn get_by_id_returns_none_for_missing_series() {
    let (db, _dir) = database().await;
    assert!(db.series().get_by_id(404).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_removes_the_row() {
    let (db, _dir) = database().await;
    let repo = db.series();

    let inserted = repo.insert(create("Gone", None)).await.unwrap();

    assert!(repo.delete(inserted.id).await.unwrap());
    assert!(repo.get_by_id(inserted.id).await.unwrap().is_none());
    // Deleting again reports nothing to do
    assert!(!repo.delete(inserted.id).await.unwrap());
}

#[tokio::test]
async fn sync_schema_is_idempotent() {
    let (db, _dir) = database().await;
    db.sync_schema().await.unwrap();
    db.sync_schema().await.unwrap();

    db.series().insert(create("Still Works", None)).await.unwrap();
    assert_eq!(db.series().list_all().await.unwrap().len(), 1);
}
