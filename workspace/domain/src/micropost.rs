//! Micropost lifecycle. Posts belong to exactly one author and die with
//! them; see `user::destroy` for the cascade.

use chrono::Utc;
use model::entities::{micropost, user};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::instrument;

use crate::error::{DomainError, Result};
use crate::validate;

/// Create a post for the given author.
#[instrument(skip(db, content))]
pub async fn create(
    db: &DatabaseConnection,
    user_id: i32,
    content: &str,
) -> Result<micropost::Model> {
    validate::micropost(content)?;
    if user::Entity::find_by_id(user_id).one(db).await?.is_none() {
        return Err(validate::author_missing().into());
    }

    Ok(micropost::ActiveModel {
        content: Set(content.to_string()),
        user_id: Set(user_id),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?)
}

/// Delete one post.
#[instrument(skip(db))]
pub async fn destroy(db: &DatabaseConnection, micropost_id: i32) -> Result<()> {
    let deleted = micropost::Entity::delete_by_id(micropost_id)
        .exec(db)
        .await?;
    if deleted.rows_affected == 0 {
        return Err(DomainError::NotFound("micropost"));
    }
    Ok(())
}

/// The author's own posts, newest first.
pub async fn of_user(db: &DatabaseConnection, user_id: i32) -> Result<Vec<micropost::Model>> {
    Ok(micropost::Entity::find()
        .filter(micropost::Column::UserId.eq(user_id))
        .order_by_desc(micropost::Column::CreatedAt)
        .all(db)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{seed_user, setup_db};

    #[tokio::test]
    async fn create_and_list_posts() {
        let db = setup_db().await;
        let user = seed_user(&db, "A User", "user@test.com").await;

        let post = create(&db, user.id, "Lorem ipsum").await.unwrap();
        assert_eq!(post.user_id, user.id);

        let posts = of_user(&db, user.id).await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].content, "Lorem ipsum");
    }

    #[tokio::test]
    async fn content_is_validated() {
        let db = setup_db().await;
        let user = seed_user(&db, "A User", "user@test.com").await;

        let blank = create(&db, user.id, "   ").await.unwrap_err();
        assert!(matches!(blank, DomainError::Validation(ref e) if e.on("content")));

        let long = create(&db, user.id, &"a".repeat(141)).await.unwrap_err();
        assert!(matches!(long, DomainError::Validation(ref e) if e.on("content")));
    }

    #[tokio::test]
    async fn author_must_exist() {
        let db = setup_db().await;
        let err = create(&db, 9999, "orphan").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(ref e) if e.on("user")));
    }

    #[tokio::test]
    async fn destroy_removes_one_post() {
        let db = setup_db().await;
        let user = seed_user(&db, "A User", "user@test.com").await;
        let post = create(&db, user.id, "short lived").await.unwrap();

        destroy(&db, post.id).await.unwrap();
        assert!(of_user(&db, user.id).await.unwrap().is_empty());

        let err = destroy(&db, post.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
