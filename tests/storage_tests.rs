use job_portal::storage::{LocalStorageService, MockStorageService, StorageService};

#[tokio::test]
async fn local_storage_writes_under_generated_name() {
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalStorageService::new(dir.path());
    storage.ensure_uploads_dir().await;

    let stored = storage
        .store_resume("resume.pdf", b"resume body")
        .await
        .expect("write must succeed");

    // Generated name keeps the original filename as a suffix.
    assert!(stored.ends_with("_resume.pdf"));
    assert_ne!(stored, "resume.pdf");

    let bytes = tokio::fs::read(dir.path().join(&stored)).await.unwrap();
    assert_eq!(bytes, b"resume body");
}

#[tokio::test]
async fn local_storage_names_never_collide() {
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalStorageService::new(dir.path());
    storage.ensure_uploads_dir().await;

    let first = storage.store_resume("cv.pdf", b"one").await.unwrap();
    let second = storage.store_resume("cv.pdf", b"two").await.unwrap();
    assert_ne!(first, second);

    assert_eq!(
        tokio::fs::read(dir.path().join(&first)).await.unwrap(),
        b"one"
    );
    assert_eq!(
        tokio::fs::read(dir.path().join(&second)).await.unwrap(),
        b"two"
    );
}

#[tokio::test]
async fn local_storage_contains_traversal_attempts() {
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalStorageService::new(dir.path());
    storage.ensure_uploads_dir().await;

    let stored = storage
        .store_resume("../../etc/passwd", b"nope")
        .await
        .unwrap();

    // The stored name has no path separators, so the file stays inside the
    // uploads directory.
    assert!(!stored.contains('/'));
    assert!(dir.path().join(&stored).exists());
}

#[tokio::test]
async fn local_storage_removes_stored_resume() {
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalStorageService::new(dir.path());
    storage.ensure_uploads_dir().await;

    let stored = storage.store_resume("cv.pdf", b"body").await.unwrap();
    assert!(dir.path().join(&stored).exists());

    storage.remove_resume(&stored).await;
    assert!(!dir.path().join(&stored).exists());

    // Removing an already-missing file is a quiet no-op.
    storage.remove_resume(&stored).await;
    storage.remove_resume("never-stored.pdf").await;
}

#[tokio::test]
async fn mock_storage_failure_path() {
    let ok = MockStorageService::new();
    assert!(ok.store_resume("cv.pdf", b"x").await.is_ok());

    let failing = MockStorageService::new_failing();
    assert!(failing.store_resume("cv.pdf", b"x").await.is_err());
}
