use cragmap::prelude::*;
use cragmap::{CragmapError, ErrorKind, SnapshotConfig};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tempfile::tempdir;

#[test]
fn test_reopen_restores_records() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempdir().unwrap();
    let path = dir.path().join("catalog.snap");

    let (id, created_at) = {
        let catalog = Catalog::open(&path).unwrap();
        let stored = catalog
            .upsert(
                NewLocation::new("Rotary Park", ClimbingType::Boulder, 40.55, -105.16)
                    .with_difficulty("V5")
                    .with_website("https://example.com/rotary"),
            )
            .unwrap()
            .into_location();
        catalog
            .upsert(NewLocation::new("Ascent Studio", ClimbingType::Gym, 40.58, -105.08))
            .unwrap();
        catalog.close().unwrap();
        (stored.id, stored.created_at)
    };

    let reopened = Catalog::open(&path).unwrap();
    assert_eq!(reopened.len(), 2);

    let rotary = reopened.get("Rotary Park").unwrap().unwrap();
    assert_eq!(rotary.id, id);
    assert_eq!(rotary.created_at, created_at);
    assert_eq!(rotary.difficulty, "V5");

    // Spatial index is rebuilt on load
    let nearby = reopened
        .find_nearby(&NearbyQuery::new(40.55, -105.16).with_radius_km(1.0))
        .unwrap();
    assert_eq!(nearby.len(), 1);
}

#[test]
fn test_checkpoint_without_close() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("catalog.snap");

    let catalog = Catalog::open(&path).unwrap();
    catalog
        .upsert(NewLocation::new("Carter Lake", ClimbingType::Boulder, 40.33, -105.21))
        .unwrap();
    catalog.checkpoint().unwrap();

    let other = Catalog::open(&path).unwrap();
    assert!(other.get("Carter Lake").unwrap().is_some());
}

#[test]
fn test_auto_snapshot_every_n_upserts() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("catalog.snap");
    let config = Config::default().with_auto_snapshot_ops(2);

    let catalog = Catalog::open_with_config(&path, config).unwrap();
    catalog
        .upsert(NewLocation::new("one", ClimbingType::Gym, 1.0, 1.0))
        .unwrap();
    assert!(!path.exists());

    catalog
        .upsert(NewLocation::new("two", ClimbingType::Gym, 2.0, 2.0))
        .unwrap();
    assert!(path.exists());
    assert_eq!(Catalog::open(&path).unwrap().len(), 2);
}

#[test]
fn test_failed_auto_snapshot_does_not_fail_upsert() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempdir().unwrap();
    let data_dir = dir.path().join("data");
    std::fs::create_dir(&data_dir).unwrap();
    let config = Config::default().with_auto_snapshot_ops(1);

    let catalog = Catalog::open_with_config(data_dir.join("catalog.snap"), config).unwrap();
    std::fs::remove_dir_all(&data_dir).unwrap();

    let outcome = catalog
        .upsert(NewLocation::new("Applied", ClimbingType::Boulder, 40.0, -105.0))
        .unwrap();
    assert!(outcome.is_insert());
    assert!(catalog.get("Applied").unwrap().is_some());

    // Later writes keep succeeding while the directory is gone
    catalog
        .upsert(NewLocation::new("Applied", ClimbingType::Boulder, 40.1, -105.0))
        .unwrap();
    catalog
        .upsert(NewLocation::new("Second", ClimbingType::Gym, 40.0, -105.0))
        .unwrap();
    let stats = catalog.stats();
    assert_eq!(stats.inserts, 2);
    assert_eq!(stats.updates, 1);

    // An explicit checkpoint still reports the failure
    let err = catalog.checkpoint().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StoreUnavailable);

    std::fs::create_dir(&data_dir).unwrap();
    catalog.checkpoint().unwrap();
    assert_eq!(Catalog::open(data_dir.join("catalog.snap")).unwrap().len(), 2);
}

#[test]
fn test_close_snapshot_includes_every_accepted_upsert() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("catalog.snap");
    let catalog = Catalog::open(&path).unwrap();
    let started = Arc::new(AtomicBool::new(false));

    let writers: Vec<_> = (0..4)
        .map(|t| {
            let catalog = catalog.clone();
            let started = Arc::clone(&started);
            thread::spawn(move || {
                let mut accepted = Vec::new();
                for i in 0.. {
                    let name = format!("writer-{}-{}", t, i);
                    match catalog.upsert(NewLocation::new(&name, ClimbingType::Gym, 40.0, -105.0)) {
                        Ok(_) => accepted.push(name),
                        Err(CragmapError::StoreClosed) => break,
                        Err(e) => panic!("unexpected upsert error: {}", e),
                    }
                    started.store(true, Ordering::Release);
                }
                accepted
            })
        })
        .collect();

    while !started.load(Ordering::Acquire) {
        thread::yield_now();
    }
    catalog.close().unwrap();

    let accepted: Vec<String> = writers
        .into_iter()
        .flat_map(|handle| handle.join().unwrap())
        .collect();
    assert!(!accepted.is_empty());

    let reopened = Catalog::open(&path).unwrap();
    assert_eq!(reopened.len(), accepted.len());
    for name in &accepted {
        assert!(reopened.get(name).unwrap().is_some(), "{} missing", name);
    }
}

#[test]
fn test_closed_catalog_rejects_checkpoint() {
    let dir = tempdir().unwrap();
    let catalog = Catalog::builder()
        .path(dir.path().join("catalog.snap"))
        .build()
        .unwrap();
    catalog.close().unwrap();

    assert!(matches!(catalog.checkpoint(), Err(CragmapError::StoreClosed)));
    let err = catalog.get("anything").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
    assert_eq!(err.public_message(), "location store is unavailable");
}

#[test]
fn test_corrupt_snapshot_is_store_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("catalog.snap");
    std::fs::write(&path, b"definitely not a snapshot file").unwrap();

    let err = Catalog::open(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
}

#[test]
fn test_invalid_config_is_rejected_on_open() {
    let dir = tempdir().unwrap();
    let mut config = Config::default();
    config.snapshot = SnapshotConfig {
        auto_snapshot_ops: Some(0),
    };
    let err = Catalog::open_with_config(dir.path().join("catalog.snap"), config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn test_memory_catalog_never_writes() {
    let catalog = Catalog::memory().unwrap();
    catalog
        .upsert(NewLocation::new("Ephemeral", ClimbingType::Gym, 0.0, 0.0))
        .unwrap();
    assert!(catalog.checkpoint().is_ok());
    assert!(catalog.close().is_ok());
}
