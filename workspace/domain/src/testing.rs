//! Test scaffolding: every test builds its own in-memory database, so no
//! state is ever shared between cases.

use migration::{Migrator, MigratorTrait};
use model::entities::user;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection};

use crate::user::NewUser;

/// A fresh in-memory SQLite database with foreign keys on and the full
/// schema applied.
pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    db.execute_unprepared("PRAGMA foreign_keys = ON;")
        .await
        .expect("Failed to enable foreign keys");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Seed one user through the regular sign-up path. The password is
/// always "foobar".
pub async fn seed_user(db: &DatabaseConnection, name: &str, email: &str) -> user::Model {
    crate::user::create(
        db,
        NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password: "foobar".to_string(),
        },
    )
    .await
    .expect("Failed to seed user")
}
