//! The follow graph: directed edges between users, with membership and
//! enumeration queries. Edges are asymmetric; a mutual follow is simply
//! two edges.

use model::entities::{relationship, user};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
};
use tracing::instrument;

use crate::error::Result;
use crate::validate;

/// Create the edge `follower -> followed` if it is absent. A duplicate
/// insert loses against the pair's primary key and is reported as
/// success, which keeps concurrent double submits idempotent.
#[instrument(skip(db))]
pub async fn follow(db: &DatabaseConnection, follower_id: i32, followed_id: i32) -> Result<()> {
    if follower_id == followed_id {
        return Err(validate::self_follow().into());
    }
    let edge = relationship::ActiveModel {
        follower_id: Set(follower_id),
        followed_id: Set(followed_id),
    };
    match edge.insert(db).await {
        Ok(_) => Ok(()),
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Remove the edge `follower -> followed`. Removing an absent edge is a
/// no-op, not an error.
#[instrument(skip(db))]
pub async fn unfollow(db: &DatabaseConnection, follower_id: i32, followed_id: i32) -> Result<()> {
    relationship::Entity::delete_many()
        .filter(relationship::Column::FollowerId.eq(follower_id))
        .filter(relationship::Column::FollowedId.eq(followed_id))
        .exec(db)
        .await?;
    Ok(())
}

/// Does the directed edge `follower -> followed` exist?
pub async fn following(
    db: &DatabaseConnection,
    follower_id: i32,
    followed_id: i32,
) -> Result<bool> {
    Ok(relationship::Entity::find()
        .filter(relationship::Column::FollowerId.eq(follower_id))
        .filter(relationship::Column::FollowedId.eq(followed_id))
        .one(db)
        .await?
        .is_some())
}

/// Ids of the users `user_id` has an edge pointing at.
pub(crate) async fn followee_ids(db: &DatabaseConnection, user_id: i32) -> Result<Vec<i32>> {
    Ok(relationship::Entity::find()
        .filter(relationship::Column::FollowerId.eq(user_id))
        .all(db)
        .await?
        .into_iter()
        .map(|edge| edge.followed_id)
        .collect())
}

/// Users with an edge pointing at `user_id`. Membership only; callers
/// must not rely on any ordering.
pub async fn followers_of(db: &DatabaseConnection, user_id: i32) -> Result<Vec<user::Model>> {
    let follower_ids: Vec<i32> = relationship::Entity::find()
        .filter(relationship::Column::FollowedId.eq(user_id))
        .all(db)
        .await?
        .into_iter()
        .map(|edge| edge.follower_id)
        .collect();
    Ok(user::Entity::find()
        .filter(user::Column::Id.is_in(follower_ids))
        .all(db)
        .await?)
}

/// Users `user_id` has an edge pointing at. Membership only.
pub async fn followees_of(db: &DatabaseConnection, user_id: i32) -> Result<Vec<user::Model>> {
    let ids = followee_ids(db, user_id).await?;
    Ok(user::Entity::find()
        .filter(user::Column::Id.is_in(ids))
        .all(db)
        .await?)
}
