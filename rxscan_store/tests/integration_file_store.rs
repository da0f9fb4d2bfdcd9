use rxscan_core::{Pattern, PatternStore};
use rxscan_store::{JsonFilePatternStore, StoreError};
use std::path::PathBuf;

fn temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("rxscan_store_{}", uuid::Uuid::now_v7()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[tokio::test]
async fn missing_file_loads_empty() {
    let dir = temp_dir();
    let store = JsonFilePatternStore::new(dir.join("patterns.json"));
    assert!(store.load().await.unwrap().is_empty());
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn append_persists_in_order_across_instances() {
    let dir = temp_dir();
    let path = dir.join("nested").join("patterns.json");

    let store = JsonFilePatternStore::new(&path);
    store.append(Pattern::from(r"api[_-]?key")).await.unwrap();
    store.append(Pattern::from("token")).await.unwrap();
    store.append(Pattern::from("token")).await.unwrap();

    let reopened = JsonFilePatternStore::new(&path);
    assert_eq!(
        reopened.load().await.unwrap(),
        vec![
            Pattern::from(r"api[_-]?key"),
            Pattern::from("token"),
            Pattern::from("token"),
        ]
    );

    let raw: Vec<String> = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw, vec![r"api[_-]?key", "token", "token"]);
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn remove_deletes_only_first_match() {
    let dir = temp_dir();
    let store = JsonFilePatternStore::new(dir.join("patterns.json"));
    for p in ["a", "b", "a"] {
        store.append(Pattern::from(p)).await.unwrap();
    }

    assert!(store.remove(&Pattern::from("a")).await.unwrap());
    assert_eq!(
        store.load().await.unwrap(),
        vec![Pattern::from("b"), Pattern::from("a")]
    );

    assert!(!store.remove(&Pattern::from("zzz")).await.unwrap());
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn invalid_patterns_are_stored_verbatim() {
    let dir = temp_dir();
    let store = JsonFilePatternStore::new(dir.join("patterns.json"));
    store.append(Pattern::from("(")).await.unwrap();
    assert_eq!(store.load().await.unwrap(), vec![Pattern::from("(")]);
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn malformed_file_is_an_error() {
    let dir = temp_dir();
    let path = dir.join("patterns.json");
    std::fs::write(&path, "{ not json").unwrap();

    let store = JsonFilePatternStore::new(&path);
    let err = store.load().await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<StoreError>(),
        Some(StoreError::Json { .. })
    ));
    let _ = std::fs::remove_dir_all(&dir);
}
