//! Startup seeding against a real pooled SQLite database.

use quiz_server::database::init_db;
use quiz_server::seed::{SeedReport, apply_seed, load_seed_file, parse_seed};

use crate::common::{FIXTURE_SEED, test_config};

fn demo_seed_path() -> String {
    format!("{}/config/seed.toml", env!("CARGO_MANIFEST_DIR"))
}

#[tokio::test]
async fn demo_seed_applies_through_a_pool() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("quiz.db").display());
    let config = test_config(url);
    assert!(config.database.max_connections > 1);

    let db = init_db(&config.database).await.unwrap();
    let seed = load_seed_file(demo_seed_path()).unwrap();

    let report = apply_seed(&db, &seed).await.unwrap();
    assert_eq!(
        report,
        SeedReport {
            quizzes: 1,
            questions: 6
        }
    );

    let again = apply_seed(&db, &seed).await.unwrap();
    assert_eq!(again, SeedReport::default());
}

#[tokio::test]
async fn reopened_database_keeps_unique_keys() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("quiz.db").display());
    let config = test_config(url);
    let seed = parse_seed(FIXTURE_SEED).unwrap();

    let first = init_db(&config.database).await.unwrap();
    let report = apply_seed(&first, &seed).await.unwrap();
    assert_eq!(report.questions, 4);
    first.close().await.unwrap();

    let second = init_db(&config.database).await.unwrap();
    let again = apply_seed(&second, &seed).await.unwrap();
    assert_eq!(again, SeedReport::default());
}
