#![allow(dead_code)]
use ikeeper::bootstrap;
use ikeeper::infrastructure::persistence::Database;
use uuid::Uuid;

/// A migrated, catalog-seeded SQLite database in its own file. The file is
/// removed when the value is dropped.
pub struct TestDatabase {
    db: Database,
    path: String,
}

impl TestDatabase {
    pub fn db(&self) -> &Database {
        &self.db
    }
}

impl Drop for TestDatabase {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", self.path, suffix));
        }
    }
}

pub async fn setup_test_db() -> TestDatabase {
    // Install drivers for AnyPool (required for tests)
    sqlx::any::install_default_drivers();

    // Unique file per test so tests can run in parallel
    let path = format!("test_{}.db", Uuid::new_v4());
    let db_url = format!("sqlite://{}?mode=rwc", path);

    let db = Database::connect(&db_url)
        .await
        .expect("Failed to connect to test database");

    db.run_migrations()
        .await
        .expect("Failed to run migrations");

    bootstrap::seed_catalog(&db)
        .await
        .expect("Failed to seed permission catalog");

    TestDatabase { db, path }
}
