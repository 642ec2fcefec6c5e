use std::sync::Arc;

use shortly_storage::{DurableStorage, FileStorage};
use shortly_test_infra::{StateFileConfig, TempStateFile};

#[tokio::test]
async fn load_missing_file_is_absent() {
    let fixture = TempStateFile::absent().unwrap();
    let storage = FileStorage::new(fixture.path());

    assert!(storage.load().await.unwrap().is_none());
    assert!(!fixture.exists());
}

#[tokio::test]
async fn load_returns_existing_contents() {
    let fixture = TempStateFile::new(
        StateFileConfig::builder()
            .contents(r#"{"version":1,"mappings":[]}"#)
            .build(),
    )
    .unwrap();
    let storage = FileStorage::new(fixture.path());

    let blob = storage.load().await.unwrap().unwrap();
    assert_eq!(blob, br#"{"version":1,"mappings":[]}"#.to_vec());
}

#[tokio::test]
async fn save_then_load() {
    let fixture = TempStateFile::absent().unwrap();
    let storage = FileStorage::new(fixture.path());

    storage.save(b"snapshot-1").await.unwrap();
    assert_eq!(storage.load().await.unwrap(), Some(b"snapshot-1".to_vec()));

    storage.save(b"snapshot-2").await.unwrap();
    assert_eq!(fixture.read().unwrap(), b"snapshot-2".to_vec());
}

#[tokio::test]
async fn save_leaves_no_temp_file_behind() {
    let fixture = TempStateFile::absent().unwrap();
    let storage = FileStorage::new(fixture.path());

    storage.save(b"snapshot").await.unwrap();

    let entries: Vec<_> = std::fs::read_dir(fixture.dir())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("shortly.json")]);
}

#[tokio::test]
async fn save_creates_parent_directories() {
    let fixture = TempStateFile::absent().unwrap();
    let nested = fixture.dir().join("a").join("b").join("state.json");
    let storage = FileStorage::new(&nested);

    storage.save(b"snapshot").await.unwrap();

    assert_eq!(std::fs::read(&nested).unwrap(), b"snapshot".to_vec());
}

#[tokio::test]
async fn concurrent_saves_leave_one_complete_blob() {
    let fixture = TempStateFile::absent().unwrap();
    let storage = Arc::new(FileStorage::new(fixture.path()));

    let blobs: Vec<Vec<u8>> = (0..16)
        .map(|i| format!("snapshot-{i:02}-{}", "x".repeat(4096)).into_bytes())
        .collect();

    let mut handles = vec![];
    for blob in blobs.clone() {
        let storage = Arc::clone(&storage);
        handles.push(tokio::spawn(async move {
            storage.save(&blob).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let saved = storage.load().await.unwrap().unwrap();
    assert!(blobs.contains(&saved));
}

#[tokio::test]
async fn failed_save_removes_temp_file() {
    let fixture = TempStateFile::absent().unwrap();
    // a directory in place of the state file makes the final rename fail
    std::fs::create_dir(fixture.path()).unwrap();
    let storage = FileStorage::new(fixture.path());

    assert!(storage.save(b"snapshot").await.is_err());

    let entries: Vec<_> = std::fs::read_dir(fixture.dir())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("shortly.json")]);
    assert!(fixture.path().is_dir());
}
