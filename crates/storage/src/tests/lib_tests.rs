use super::*;
use shared::error::ErrorCode;

fn record(id: &str, order: i64, kind: MediaKind, blob: &[u8]) -> MediaRecord {
    MediaRecord {
        id: MediaId::from(id),
        name: format!("{id}.bin"),
        kind,
        blob: Arc::from(blob.to_vec()),
        order,
    }
}

fn temp_database_url(dir: &tempfile::TempDir) -> String {
    let db_path = dir.path().join("nested").join("media.db");
    format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"))
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = Storage::initialize("sqlite::memory:").await.expect("db");
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn creates_database_file_and_order_index() {
    let dir = tempfile::tempdir().expect("tempdir");
    let database_url = temp_database_url(&dir);

    let storage = Storage::initialize(&database_url).await.expect("db");
    assert!(storage.has_order_index().await.expect("index lookup"));
    drop(storage);

    assert!(dir.path().join("nested").join("media.db").exists());
}

#[tokio::test]
async fn initialize_is_idempotent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let database_url = temp_database_url(&dir);

    let first = Storage::initialize(&database_url).await.expect("first open");
    first
        .put(&record("a", 1, MediaKind::Image, b"one"))
        .await
        .expect("put");
    drop(first);

    let second = Storage::initialize(&database_url).await.expect("second open");
    assert_eq!(second.count().await.expect("count"), 1);
}

#[tokio::test]
async fn put_with_existing_id_replaces_record() {
    let storage = Storage::initialize("sqlite::memory:").await.expect("db");
    storage
        .put(&record("dup", 10, MediaKind::Image, b"old"))
        .await
        .expect("first put");
    storage
        .put(&record("dup", 20, MediaKind::Video, b"new"))
        .await
        .expect("second put");

    let all = storage.get_all().await.expect("get all");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].kind, MediaKind::Video);
    assert_eq!(&*all[0].blob, b"new");
    assert_eq!(all[0].order, 20);
}

#[tokio::test]
async fn get_all_is_sorted_by_order() {
    let storage = Storage::initialize("sqlite::memory:").await.expect("db");
    for (id, order) in [("c", 300), ("a", 100), ("b", 200)] {
        storage
            .put(&record(id, order, MediaKind::Image, id.as_bytes()))
            .await
            .expect("put");
    }

    let ids: Vec<String> = storage
        .get_all()
        .await
        .expect("get all")
        .into_iter()
        .map(|r| r.id.0)
        .collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn deleting_absent_id_is_noop() {
    let storage = Storage::initialize("sqlite::memory:").await.expect("db");
    storage
        .put(&record("keep", 1, MediaKind::Image, b"x"))
        .await
        .expect("put");

    storage
        .delete(&MediaId::from("missing"))
        .await
        .expect("delete missing");
    storage.delete(&MediaId::from("keep")).await.expect("delete");
    storage.delete(&MediaId::from("keep")).await.expect("delete twice");

    assert_eq!(storage.count().await.expect("count"), 0);
}

#[tokio::test]
async fn reports_unavailable_when_parent_is_a_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").expect("write blocker");
    let database_url = format!(
        "sqlite://{}",
        blocker.join("media.db").to_string_lossy().replace('\\', "/")
    );

    let err = match Storage::initialize(&database_url).await {
        Ok(_) => panic!("store should be unavailable"),
        Err(err) => err,
    };
    assert_eq!(err.code(), ErrorCode::StorageUnavailable);
}

#[test]
fn memory_urls_have_no_file_path() {
    assert_eq!(sqlite_path("sqlite::memory:"), None);
    assert_eq!(
        sqlite_path("sqlite://./data/media.db?mode=rwc"),
        Some(PathBuf::from("./data/media.db"))
    );
}
