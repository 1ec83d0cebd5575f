//! Feed composition: the posts a user sees are their own plus those of
//! every user they follow, and nothing else. The feed is computed at
//! query time from the follow graph; nothing is materialized.

use model::entities::micropost;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::error::Result;
use crate::follow;

/// All microposts authored by `user_id` or any of their followees,
/// newest first. A user with no followees and no posts gets an empty
/// feed, not an error. Users who merely follow `user_id` contribute
/// nothing; the edge direction is what counts.
pub async fn feed(db: &DatabaseConnection, user_id: i32) -> Result<Vec<micropost::Model>> {
    let mut author_ids = follow::followee_ids(db, user_id).await?;
    author_ids.push(user_id);

    Ok(micropost::Entity::find()
        .filter(micropost::Column::UserId.is_in(author_ids))
        .order_by_desc(micropost::Column::CreatedAt)
        .all(db)
        .await?)
}
