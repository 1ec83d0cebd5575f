use axum::Router;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection};

use crate::router::create_router;
use crate::schemas::AppState;

/// Create an in-memory SQLite database for testing
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    // The cascade backstops in the schema only fire with foreign keys on
    db.execute_unprepared("PRAGMA foreign_keys = ON;")
        .await
        .expect("Failed to enable foreign keys");

    // Run migrations
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Create AppState for testing
pub async fn setup_test_app_state() -> AppState {
    AppState {
        db: setup_test_db().await,
    }
}

/// Create axum app for testing
pub async fn setup_test_app() -> Router {
    let state = setup_test_app_state().await;
    create_router(state)
}
