use organizer_core::{logging_status, PersonInput, PersonRepository, RepoError, Store, StoreConfig};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_temp_dir(suffix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!(
        "organizer-store-{suffix}-{}-{nanos}",
        std::process::id()
    ))
}

#[test]
fn open_with_starts_logging_and_opens_configured_file() {
    let log_dir = unique_temp_dir("logs");
    let db_dir = tempfile::tempdir().unwrap();
    let db_path = db_dir.path().join("organizer.sqlite3");
    let config = StoreConfig {
        db_path: Some(db_path.clone()),
        log_level: "info".to_string(),
        log_dir: Some(log_dir.clone()),
    };

    let mut store = Store::open_with(&config).unwrap();
    store.people().upsert_person(PersonInput::named("Ana")).unwrap();
    drop(store);

    let (level, dir) = logging_status().expect("logging should be active");
    assert_eq!(level, "info");
    assert_eq!(dir, log_dir);
    assert!(db_path.exists());

    let mut reopened = Store::open_with(&config).unwrap();
    assert_eq!(reopened.people().list_people("").unwrap().len(), 1);

    let conflicting = StoreConfig {
        log_dir: Some(unique_temp_dir("other")),
        ..config
    };
    let err = Store::open_with(&conflicting).err().unwrap();
    assert!(matches!(err, RepoError::Config(_)));
}
