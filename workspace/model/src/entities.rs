//! This file serves as the root for all SeaORM entity modules.
//! We define the data models for the micro-blogging application here:
//! users, their microposts and the directed follow edges between users.

pub mod micropost;
pub mod relationship;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::micropost::Entity as Micropost;
    pub use super::relationship::Entity as Relationship;
    pub use super::user::Entity as User;
}

#[cfg(test)]
mod test {
    use chrono::Utc;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
        EntityTrait, QueryFilter, Set, SqlErr,
    };

    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        // Connect to the SQLite database
        let db = Database::connect("sqlite::memory:").await?;

        // Enable foreign keys
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

        // Try to apply migrations first
        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    fn user_row(name: &str, email: &str) -> user::ActiveModel {
        let now = Utc::now();
        user::ActiveModel {
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            password_digest: Set("$2b$04$test-digest".to_string()),
            remember_digest: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        // Setup database
        let db = setup_db().await?;

        // Create users
        let alice = user_row("Alice", "alice@example.com").insert(&db).await?;
        let bob = user_row("Bob", "bob@example.com").insert(&db).await?;

        // Create microposts
        let post = micropost::ActiveModel {
            content: Set("First post".to_string()),
            user_id: Set(alice.id),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        micropost::ActiveModel {
            content: Set("Hello from Bob".to_string()),
            user_id: Set(bob.id),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Create a follow edge: alice -> bob
        relationship::ActiveModel {
            follower_id: Set(alice.id),
            followed_id: Set(bob.id),
        }
        .insert(&db)
        .await?;

        // Read back and verify data
        let users = User::find().all(&db).await?;
        assert_eq!(users.len(), 2);
        assert!(users.iter().any(|u| u.email == "alice@example.com"));
        assert!(users.iter().any(|u| u.email == "bob@example.com"));

        let posts = Micropost::find().all(&db).await?;
        assert_eq!(posts.len(), 2);
        assert!(posts.iter().any(|p| p.id == post.id));

        let edges = Relationship::find().all(&db).await?;
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].follower_id, alice.id);
        assert_eq!(edges[0].followed_id, bob.id);

        // The unique index on email rejects a duplicate row
        let duplicate = user_row("Alice Again", "alice@example.com").insert(&db).await;
        assert!(matches!(
            duplicate.err().and_then(|e| e.sql_err()),
            Some(SqlErr::UniqueConstraintViolation(_))
        ));

        // The composite primary key rejects a duplicate edge
        let duplicate_edge = relationship::ActiveModel {
            follower_id: Set(alice.id),
            followed_id: Set(bob.id),
        }
        .insert(&db)
        .await;
        assert!(matches!(
            duplicate_edge.err().and_then(|e| e.sql_err()),
            Some(SqlErr::UniqueConstraintViolation(_))
        ));

        // Deleting a user cascades at the storage layer: their posts and
        // any edges touching them go with the row
        User::delete_by_id(alice.id).exec(&db).await?;

        let remaining_posts = Micropost::find()
            .filter(micropost::Column::UserId.eq(alice.id))
            .all(&db)
            .await?;
        assert!(remaining_posts.is_empty());

        let remaining_edges = Relationship::find().all(&db).await?;
        assert!(remaining_edges.is_empty());

        // Bob's post is untouched
        let bobs_posts = Micropost::find()
            .filter(micropost::Column::UserId.eq(bob.id))
            .all(&db)
            .await?;
        assert_eq!(bobs_posts.len(), 1);

        Ok(())
    }
}
