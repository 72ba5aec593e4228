use super::*;
use anyhow::{anyhow, Result};
use async_trait::async_trait;

fn image(name: &str) -> FileInput {
    FileInput::new(name, "image/jpeg", 1_700_000_000_000, name.as_bytes().to_vec())
}

fn video(name: &str) -> FileInput {
    FileInput::new(name, "video/mp4", 1_700_000_000_000, name.as_bytes().to_vec())
}

fn names(controller: &GalleryController) -> Vec<&str> {
    controller.items().iter().map(|i| i.name.as_str()).collect()
}

async fn memory_store() -> Arc<dyn MediaStore> {
    Arc::new(Storage::initialize("sqlite::memory:").await.expect("db"))
}

struct FailingStore;

#[async_trait]
impl MediaStore for FailingStore {
    async fn put(&self, record: &MediaRecord) -> Result<()> {
        Err(anyhow!("quota exceeded while storing {}", record.id))
    }

    async fn delete(&self, _id: &MediaId) -> Result<()> {
        Err(anyhow!("store is read-only"))
    }

    async fn get_all(&self) -> Result<Vec<MediaRecord>> {
        Err(anyhow!("store is unreadable"))
    }
}

#[test]
fn capacity_is_never_exceeded_across_calls() {
    let mut gallery = GalleryController::with_store(None, 5);
    for batch in 0..4 {
        let files = (0..3).map(|i| image(&format!("b{batch}-{i}.jpg")));
        gallery.ingest(files);
        assert!(gallery.len() <= gallery.capacity());
    }
    assert_eq!(gallery.len(), 5);
    assert_eq!(gallery.remaining(), 0);
}

#[test]
fn capacity_three_accepts_one_of_two_late_files() {
    let mut gallery = GalleryController::with_store(None, 3);

    let first = gallery.ingest(vec![image("1.jpg"), image("2.jpg")]);
    assert_eq!(first.accepted, 2);
    assert_eq!(names(&gallery), vec!["1.jpg", "2.jpg"]);

    let second = gallery.ingest(vec![image("3.jpg"), image("4.jpg")]);
    assert_eq!(second.accepted, 1);
    assert_eq!(second.dropped_over_capacity, 1);
    assert_eq!(gallery.len(), 3);
    assert_eq!(names(&gallery), vec!["1.jpg", "2.jpg", "3.jpg"]);
}

#[test]
fn ingest_is_noop_once_full() {
    let mut gallery = GalleryController::with_store(None, 1);
    gallery.ingest(vec![image("only.jpg")]);

    let report = gallery.ingest(vec![image("late.jpg"), video("late.mp4")]);
    assert_eq!(report.accepted, 0);
    assert_eq!(report.dropped_over_capacity, 2);
    assert_eq!(names(&gallery), vec!["only.jpg"]);
}

#[test]
fn filters_unsupported_files_silently() {
    let mut gallery = GalleryController::with_store(None, DEFAULT_CAPACITY);
    let report = gallery.ingest(vec![
        FileInput::new("notes.txt", "text/plain", 1, b"hi".to_vec()),
        FileInput::new("clip.MOV", "", 2, b"mov".to_vec()),
        image("beach.jpg"),
        FileInput::new("report.pdf", "application/pdf", 3, b"pdf".to_vec()),
    ]);

    assert_eq!(report.accepted, 2);
    assert_eq!(report.unsupported, 2);
    let kinds: Vec<MediaKind> = gallery.items().iter().map(|i| i.kind).collect();
    assert_eq!(kinds, vec![MediaKind::Video, MediaKind::Image]);
}

#[test]
fn unsupported_files_do_not_consume_capacity() {
    let mut gallery = GalleryController::with_store(None, 1);
    let report = gallery.ingest(vec![
        FileInput::new("a.txt", "text/plain", 1, b"a".to_vec()),
        image("b.jpg"),
    ]);
    assert_eq!(report.accepted, 1);
    assert_eq!(names(&gallery), vec!["b.jpg"]);
}

#[test]
fn orders_stay_monotonic_within_a_millisecond() {
    let mut gallery = GalleryController::with_store(None, DEFAULT_CAPACITY);
    gallery.ingest_at(vec![image("a.jpg"), image("b.jpg")], 1_000);
    gallery.ingest_at(vec![image("c.jpg")], 1_000);
    gallery.ingest_at(vec![image("d.jpg")], 500);

    assert_eq!(gallery.last_order, 1_003);
    assert_eq!(names(&gallery), vec!["a.jpg", "b.jpg", "c.jpg", "d.jpg"]);
}

#[test]
fn remove_drops_first_match_and_releases_handle() {
    let mut gallery = GalleryController::with_store(None, DEFAULT_CAPACITY);
    gallery.ingest(vec![image("a.jpg"), image("b.jpg")]);
    assert_eq!(gallery.registry().live_count(), 2);

    let reference = gallery.items()[0].display().reference().to_string();
    let id = gallery.items()[0].id.clone();
    assert!(gallery.remove(&id));

    assert_eq!(names(&gallery), vec!["b.jpg"]);
    assert_eq!(gallery.registry().live_count(), 1);
    assert!(gallery.registry().resolve(&reference).is_none());
    assert!(!gallery.remove(&id));
}

#[test]
fn dropping_controller_releases_all_handles() {
    let mut gallery = GalleryController::with_store(None, DEFAULT_CAPACITY);
    gallery.ingest(vec![image("a.jpg"), video("b.mp4")]);
    let registry = gallery.registry().clone();
    assert_eq!(registry.live_count(), 2);

    drop(gallery);
    assert_eq!(registry.live_count(), 0);
}

#[test]
fn display_handle_resolves_to_file_bytes() {
    let mut gallery = GalleryController::with_store(None, DEFAULT_CAPACITY);
    gallery.ingest(vec![FileInput::new("a.png", "image/png", 9, vec![7u8, 8, 9])]);

    let handle = gallery.items()[0].display();
    assert!(handle.reference().starts_with("blob:tripbook/"));
    let bytes = gallery.registry().resolve(handle.reference()).expect("live");
    assert_eq!(&*bytes, &[7u8, 8, 9]);
}

#[test]
fn removing_the_only_viewed_item_closes_viewer() {
    let mut gallery = GalleryController::with_store(None, DEFAULT_CAPACITY);
    gallery.ingest(vec![image("solo.jpg")]);
    assert!(gallery.open_viewer(0));

    let id = gallery.items()[0].id.clone();
    gallery.remove(&id);
    assert_eq!(gallery.viewer().state(), ViewerState::Closed);
}

#[test]
fn removing_before_open_item_keeps_it_on_screen() {
    let mut gallery = GalleryController::with_store(None, DEFAULT_CAPACITY);
    gallery.ingest(vec![image("a.jpg"), image("b.jpg"), image("c.jpg")]);
    gallery.open_viewer(2);

    let first = gallery.items()[0].id.clone();
    gallery.remove(&first);
    let slide = gallery
        .current_slide(Size::new(1000, 1000))
        .expect("still open");
    assert_eq!(slide.item.name, "c.jpg");
    assert_eq!(slide.index, 1);
}

#[test]
fn next_twice_from_middle_of_three_wraps_to_start() {
    let mut gallery = GalleryController::with_store(None, DEFAULT_CAPACITY);
    gallery.ingest(vec![image("a.jpg"), image("b.jpg"), image("c.jpg")]);
    gallery.open_viewer(1);

    gallery.show_next();
    gallery.show_next();
    assert_eq!(gallery.viewer().state(), ViewerState::Open(0));
}

#[test]
fn keys_drive_viewer_only_while_open() {
    let mut gallery = GalleryController::with_store(None, DEFAULT_CAPACITY);
    gallery.ingest(vec![image("a.jpg"), image("b.jpg")]);

    assert!(!gallery.handle_key(Key::ArrowRight));
    assert_eq!(gallery.viewer().state(), ViewerState::Closed);

    gallery.open_viewer(0);
    assert!(gallery.handle_key(Key::ArrowLeft));
    assert_eq!(gallery.viewer().state(), ViewerState::Open(1));
    assert!(gallery.handle_key(Key::Escape));
    assert_eq!(gallery.viewer().state(), ViewerState::Closed);
}

#[test]
fn video_slides_autoplay_with_controls() {
    let mut gallery = GalleryController::with_store(None, DEFAULT_CAPACITY);
    gallery.ingest(vec![video("clip.mp4")]);
    gallery.open_viewer(0);

    let slide = gallery.current_slide(Size::new(1000, 1000)).expect("open");
    assert_eq!(
        slide.presentation,
        Presentation::Video {
            max: Size::new(880, 820),
            autoplay: true,
            controls: true,
        }
    );
}

#[tokio::test]
async fn remove_then_reload_never_reintroduces_item() {
    let store = memory_store().await;

    let mut session = GalleryController::with_store(Some(store.clone()), DEFAULT_CAPACITY);
    session.ingest(vec![image("keep.jpg"), image("gone.jpg")]);
    let gone = session.items()[1].id.clone();
    session.remove(&gone);
    session.flush().await;
    drop(session);

    let mut reloaded = GalleryController::with_store(Some(store), DEFAULT_CAPACITY);
    reloaded.load_from_store().await;
    assert_eq!(names(&reloaded), vec!["keep.jpg"]);
    assert!(reloaded.items().iter().all(|item| item.id != gone));
}

#[tokio::test]
async fn reload_restores_order_kind_and_bytes() {
    let store = memory_store().await;

    let mut session = GalleryController::with_store(Some(store.clone()), DEFAULT_CAPACITY);
    session.ingest_at(vec![video("first.mp4"), image("second.jpg")], 10);
    session.ingest_at(vec![image("third.jpg")], 5);
    session.flush().await;

    let mut reloaded = GalleryController::with_store(Some(store), DEFAULT_CAPACITY);
    reloaded.load_from_store().await;
    assert_eq!(names(&reloaded), vec!["first.mp4", "second.jpg", "third.jpg"]);
    assert_eq!(reloaded.items()[0].kind, MediaKind::Video);

    let bytes = reloaded.items()[2].display().bytes().expect("live handle");
    assert_eq!(&*bytes, b"third.jpg");

    let more = reloaded.ingest_at(vec![image("fourth.jpg")], 0);
    assert_eq!(more.accepted, 1);
    assert_eq!(reloaded.last_order, 13);
}

#[tokio::test]
async fn unavailable_store_starts_empty_and_still_ingests() {
    let dir = tempfile::tempdir().expect("tempdir");
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"file").expect("write blocker");
    let database_url = format!(
        "sqlite://{}",
        blocker.join("gallery.db").to_string_lossy().replace('\\', "/")
    );

    let mut gallery = GalleryController::start(&database_url, 3).await;
    assert!(gallery.is_empty());
    assert!(!gallery.is_persistent());

    let report = gallery.ingest(vec![image("a.jpg")]);
    assert_eq!(report.accepted, 1);
    gallery.flush().await;
    assert_eq!(gallery.failed_writes(), 0);
}

#[tokio::test]
async fn failed_writes_do_not_roll_back_items() {
    let mut gallery =
        GalleryController::with_store(Some(Arc::new(FailingStore)), DEFAULT_CAPACITY);
    gallery.load_from_store().await;
    assert!(gallery.is_empty());

    gallery.ingest(vec![image("a.jpg"), image("b.jpg")]);
    let id = gallery.items()[0].id.clone();
    gallery.remove(&id);
    gallery.flush().await;

    assert_eq!(names(&gallery), vec!["b.jpg"]);
    assert_eq!(gallery.failed_writes(), 3);
}

#[tokio::test]
async fn reload_closes_viewer_and_replaces_items() {
    let store = memory_store().await;
    let mut gallery = GalleryController::with_store(Some(store), DEFAULT_CAPACITY);
    gallery.ingest(vec![image("a.jpg"), image("b.jpg")]);
    gallery.open_viewer(1);

    gallery.load_from_store().await;
    assert_eq!(gallery.viewer().state(), ViewerState::Closed);
    assert_eq!(gallery.len(), 2);
    assert_eq!(gallery.registry().live_count(), 2);
}

#[tokio::test]
async fn duplicate_ids_remove_only_first_and_clear_store() {
    let store = memory_store().await;
    let mut gallery = GalleryController::with_store(Some(store.clone()), DEFAULT_CAPACITY);
    let photo = image("twice.jpg");

    gallery.ingest(vec![photo.clone(), photo.clone()]);
    assert_eq!(gallery.len(), 2);
    gallery.open_viewer(1);

    assert!(gallery.remove(&photo.id()));
    assert_eq!(gallery.len(), 1);
    assert_eq!(gallery.registry().live_count(), 1);
    assert_eq!(gallery.viewer().state(), ViewerState::Open(0));

    gallery.flush().await;
    assert!(store.get_all().await.expect("get all").is_empty());
}

#[tokio::test]
async fn hidden_over_capacity_records_still_seed_order() {
    let store = memory_store().await;
    for (name, order) in [("a.jpg", 100), ("b.jpg", 200), ("c.jpg", 300)] {
        let record = MediaRecord {
            id: MediaId::from(name),
            name: name.to_string(),
            kind: MediaKind::Image,
            blob: Arc::from(name.as_bytes().to_vec()),
            order,
        };
        store.put(&record).await.expect("seed record");
    }

    let mut gallery = GalleryController::with_store(Some(store), 2);
    gallery.load_from_store().await;
    assert_eq!(names(&gallery), vec!["a.jpg", "b.jpg"]);
    assert_eq!(gallery.last_order, 300);

    gallery.remove(&MediaId::from("a.jpg"));
    gallery.ingest_at(vec![image("late.jpg")], 0);
    assert_eq!(gallery.last_order, 301);
    gallery.flush().await;
}
