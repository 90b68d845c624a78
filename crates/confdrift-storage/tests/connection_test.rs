//! Storage connection tests: pragmas, migrations, reader/writer visibility.

use std::sync::Arc;
use std::thread;

use confdrift_storage::connection::pragmas::verify_wal_mode;
use confdrift_storage::connection::writer::with_immediate_transaction;
use confdrift_storage::migrations::{current_version, LATEST_VERSION};
use confdrift_core::errors::StorageError;
use confdrift_storage::queries::rules::query_rules;
use confdrift_storage::DatabaseManager;
use rusqlite::Connection;
use tempfile::TempDir;

fn rule_count(conn: &Connection) -> Result<usize, StorageError> {
    Ok(query_rules(conn)?.len())
}

#[test]
fn test_pragmas_set_correctly() {
    let dir = TempDir::new().unwrap();
    let db = DatabaseManager::open(&dir.path().join("test.db")).unwrap();

    db.with_writer(|conn| {
        assert!(verify_wal_mode(conn)?);

        let sync: i64 = conn
            .pragma_query_value(None, "synchronous", |row| row.get(0))
            .unwrap();
        assert_eq!(sync, 1, "synchronous should be NORMAL (1)");

        let fk: i64 = conn
            .pragma_query_value(None, "foreign_keys", |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1, "foreign_keys should be ON");

        let timeout: i64 = conn
            .pragma_query_value(None, "busy_timeout", |row| row.get(0))
            .unwrap();
        assert_eq!(timeout, 5000);
        Ok(())
    })
    .unwrap();
}

#[test]
fn test_open_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("data").join("confdrift.db");
    let db = DatabaseManager::open(&path).unwrap();
    assert!(path.exists());
    assert_eq!(db.path(), Some(path.as_path()));
    assert_eq!(db.reader_count(), 4);
}

#[test]
fn test_migrations_applied_and_rules_seeded() {
    let db = DatabaseManager::open_in_memory().unwrap();
    db.with_reader(|conn| {
        assert_eq!(current_version(conn)?, LATEST_VERSION);
        assert_eq!(rule_count(conn)?, 6);
        let keys: Vec<_> = query_rules(conn)?.into_iter().map(|r| r.config_key).collect();
        assert_eq!(
            keys,
            [
                "server.port",
                "spring.profiles.active",
                "debug",
                "logging.level.*",
                "payment.timeout",
                "database.*"
            ]
        );
        Ok(())
    })
    .unwrap();
}

#[test]
fn test_reopen_does_not_reseed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.db");
    {
        let db = DatabaseManager::open(&path).unwrap();
        db.with_writer(|conn| {
            conn.execute("DELETE FROM config_rules WHERE id = 'rule-1'", [])
                .unwrap();
            Ok(())
        })
        .unwrap();
    }
    let db = DatabaseManager::open(&path).unwrap();
    let count = db.with_reader(rule_count).unwrap();
    assert_eq!(count, 5);
}

#[test]
fn test_reader_sees_committed_writes() {
    let dir = TempDir::new().unwrap();
    let db = DatabaseManager::open(&dir.path().join("test.db")).unwrap();
    db.with_writer(|conn| {
        conn.execute("DELETE FROM config_rules", []).unwrap();
        Ok(())
    })
    .unwrap();
    for _ in 0..db.reader_count() {
        assert_eq!(db.with_reader(rule_count).unwrap(), 0);
    }
}

#[test]
fn test_failed_transaction_rolls_back() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let result: Result<(), _> = db.with_writer(|conn| {
        with_immediate_transaction(conn, |tx| {
            tx.execute("DELETE FROM config_rules", []).unwrap();
            Err(StorageError::DbBusy)
        })
    });
    assert!(result.is_err());
    assert_eq!(db.with_reader(rule_count).unwrap(), 6);
}

#[test]
fn test_concurrent_readers() {
    let dir = TempDir::new().unwrap();
    let db = Arc::new(DatabaseManager::open(&dir.path().join("test.db")).unwrap());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let db = Arc::clone(&db);
            thread::spawn(move || db.with_reader(rule_count).unwrap())
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), 6);
    }
}
