//! User lifecycle: sign-up, profile changes, credential checks and the
//! transactional cascade that removes a user together with everything
//! they own.

use chrono::Utc;
use model::entities::{micropost, relationship, user};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, Set,
    SqlErr, TransactionTrait,
};
use tracing::{debug, instrument, warn};

use crate::auth;
use crate::error::{DomainError, Result};
use crate::validate;

/// Attributes for a sign-up.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Partial profile update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Which stored digest `authenticated` checks a token against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credential {
    Password,
    Remember,
}

/// Emails compare and persist lowercased; the unique index sits on the
/// normalized form.
fn normalize_email(email: &str) -> String {
    email.to_lowercase()
}

/// Look a user up by email, in the normalized form.
pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<user::Model>> {
    Ok(user::Entity::find()
        .filter(user::Column::Email.eq(normalize_email(email)))
        .one(db)
        .await?)
}

/// Sign a new user up: validate, normalize the email, digest the password
/// and insert.
#[instrument(skip(db, attrs), fields(email = %attrs.email))]
pub async fn create(db: &DatabaseConnection, attrs: NewUser) -> Result<user::Model> {
    validate::new_user(&attrs.name, &attrs.email, &attrs.password)?;

    let email = normalize_email(&attrs.email);
    if find_by_email(db, &email).await?.is_some() {
        return Err(validate::email_taken().into());
    }

    let now = Utc::now();
    let new_user = user::ActiveModel {
        name: Set(attrs.name),
        email: Set(email),
        password_digest: Set(auth::digest(&attrs.password)?),
        remember_digest: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match new_user.insert(db).await {
        Ok(created) => {
            debug!(user_id = created.id, "user created");
            Ok(created)
        }
        // The pre-check above can lose a race; the unique index on the
        // normalized email column decides it, and the loser gets the same
        // validation shape as an ordinary duplicate.
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            warn!("email uniqueness race lost at the storage layer");
            Err(validate::email_taken().into())
        }
        Err(e) => Err(e.into()),
    }
}

/// Apply a partial update. Password rules run only when a new credential
/// is part of the change set.
#[instrument(skip(db, changes))]
pub async fn update(
    db: &DatabaseConnection,
    user_id: i32,
    changes: UserChanges,
) -> Result<user::Model> {
    let existing = user::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound("user"))?;

    let name = changes.name.as_deref().unwrap_or(&existing.name);
    let email_raw = changes.email.as_deref().unwrap_or(&existing.email);
    validate::user_update(name, email_raw, changes.password.as_deref())?;

    let email = normalize_email(email_raw);
    if email != existing.email && find_by_email(db, &email).await?.is_some() {
        return Err(validate::email_taken().into());
    }

    let mut active: user::ActiveModel = existing.into();
    if let Some(name) = changes.name {
        active.name = Set(name);
    }
    if changes.email.is_some() {
        active.email = Set(email);
    }
    if let Some(password) = changes.password {
        active.password_digest = Set(auth::digest(&password)?);
    }
    active.updated_at = Set(Utc::now());

    match active.update(db).await {
        Ok(updated) => Ok(updated),
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            Err(validate::email_taken().into())
        }
        Err(e) => Err(e.into()),
    }
}

/// Remove a user and everything they own in one transaction: their
/// microposts, every follow edge touching them in either direction, then
/// the row itself. Either all of it happens or none of it does.
#[instrument(skip(db))]
pub async fn destroy(db: &DatabaseConnection, user_id: i32) -> Result<()> {
    user::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound("user"))?;

    db.transaction::<_, (), sea_orm::DbErr>(|txn| {
        Box::pin(async move {
            let posts = micropost::Entity::delete_many()
                .filter(micropost::Column::UserId.eq(user_id))
                .exec(txn)
                .await?;
            let edges = relationship::Entity::delete_many()
                .filter(
                    Condition::any()
                        .add(relationship::Column::FollowerId.eq(user_id))
                        .add(relationship::Column::FollowedId.eq(user_id)),
                )
                .exec(txn)
                .await?;
            user::Entity::delete_by_id(user_id).exec(txn).await?;
            debug!(
                microposts = posts.rows_affected,
                follow_edges = edges.rows_affected,
                "user destroyed"
            );
            Ok(())
        })
    })
    .await?;
    Ok(())
}

/// Credential check for the session layer: find by email, verify the
/// password against the stored digest. `None` for an unknown email or a
/// wrong password; the caller cannot tell which.
pub async fn authenticate(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
) -> Result<Option<user::Model>> {
    let Some(found) = find_by_email(db, email).await? else {
        return Ok(None);
    };
    if auth::verify(password, &found.password_digest) {
        Ok(Some(found))
    } else {
        Ok(None)
    }
}

/// Check a token against one of the stored digests. A user who never had
/// that digest set fails the check; this never errors.
pub fn authenticated(user: &user::Model, credential: Credential, token: &str) -> bool {
    let digest = match credential {
        Credential::Password => Some(user.password_digest.as_str()),
        Credential::Remember => user.remember_digest.as_deref(),
    };
    match digest {
        Some(digest) => auth::verify(token, digest),
        None => false,
    }
}

/// Issue a persistent-session token. The caller gets the plaintext to
/// hand to the client; the store keeps only its digest.
pub async fn remember(db: &DatabaseConnection, user: user::Model) -> Result<(user::Model, String)> {
    let token = auth::new_token();
    let mut active: user::ActiveModel = user.into();
    active.remember_digest = Set(Some(auth::digest(&token)?));
    let updated = active.update(db).await?;
    Ok((updated, token))
}

/// Drop the persistent-session digest, invalidating any outstanding token.
pub async fn forget(db: &DatabaseConnection, user: user::Model) -> Result<user::Model> {
    let mut active: user::ActiveModel = user.into();
    active.remember_digest = Set(None);
    Ok(active.update(db).await?)
}

#[cfg(test)]
mod tests {
    use model::entities::prelude::*;
    use sea_orm::PaginatorTrait;

    use super::*;
    use crate::micropost as posts;
    use crate::testing::{seed_user, setup_db};
    use crate::{follow, DomainError};

    fn signup(name: &str, email: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password: "foobar".to_string(),
        }
    }

    #[tokio::test]
    async fn create_persists_a_normalized_email() {
        let db = setup_db().await;
        let created = create(&db, signup("A User", "Foo@ExAMPle.CoM"))
            .await
            .unwrap();
        assert_eq!(created.email, "foo@example.com");
        assert_ne!(created.password_digest, "foobar");
    }

    #[tokio::test]
    async fn create_rejects_invalid_attributes_with_all_violations() {
        let db = setup_db().await;
        let err = create(
            &db,
            NewUser {
                name: " ".to_string(),
                email: "user@example,com".to_string(),
                password: "short".to_string(),
            },
        )
        .await
        .unwrap_err();
        let DomainError::Validation(errors) = err else {
            panic!("expected validation errors");
        };
        assert!(errors.on("name"));
        assert!(errors.on("email"));
        assert!(errors.on("password"));
    }

    #[tokio::test]
    async fn duplicate_emails_differing_in_case_are_rejected() {
        let db = setup_db().await;
        create(&db, signup("A User", "user@test.com")).await.unwrap();

        let err = create(&db, signup("Another", "USER@TEST.COM"))
            .await
            .unwrap_err();
        let DomainError::Validation(errors) = err else {
            panic!("expected validation errors");
        };
        assert!(errors.on("email"));
        assert_eq!(User::find().count(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn update_changes_profile_without_touching_credentials() {
        let db = setup_db().await;
        let created = seed_user(&db, "A User", "user@test.com").await;
        let digest_before = created.password_digest.clone();

        let updated = update(
            &db,
            created.id,
            UserChanges {
                name: Some("Renamed".to_string()),
                email: Some("Renamed@Test.com".to_string()),
                password: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.email, "renamed@test.com");
        assert_eq!(updated.password_digest, digest_before);
    }

    #[tokio::test]
    async fn update_rejects_an_email_taken_by_another_user() {
        let db = setup_db().await;
        seed_user(&db, "First", "first@test.com").await;
        let second = seed_user(&db, "Second", "second@test.com").await;

        let err = update(
            &db,
            second.id,
            UserChanges {
                email: Some("FIRST@test.com".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(ref e) if e.on("email")));
    }

    #[tokio::test]
    async fn destroy_removes_exactly_the_users_microposts() {
        let db = setup_db().await;
        let user = seed_user(&db, "A User", "user@test.com").await;
        let other = seed_user(&db, "Other", "other@test.com").await;
        posts::create(&db, user.id, "Lorem ipsum").await.unwrap();
        posts::create(&db, user.id, "Dolor sit amet").await.unwrap();
        posts::create(&db, other.id, "Survives").await.unwrap();

        let before = Micropost::find().count(&db).await.unwrap();
        destroy(&db, user.id).await.unwrap();
        let after = Micropost::find().count(&db).await.unwrap();

        // The total drops by exactly the user's own post count
        assert_eq!(before - after, 2);
        assert!(User::find_by_id(user.id).one(&db).await.unwrap().is_none());
        assert_eq!(posts::of_user(&db, other.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn destroy_removes_follow_edges_in_both_directions() {
        let db = setup_db().await;
        let doomed = seed_user(&db, "Doomed", "doomed@test.com").await;
        let fan = seed_user(&db, "Fan", "fan@test.com").await;
        let idol = seed_user(&db, "Idol", "idol@test.com").await;
        follow::follow(&db, fan.id, doomed.id).await.unwrap();
        follow::follow(&db, doomed.id, idol.id).await.unwrap();

        destroy(&db, doomed.id).await.unwrap();

        assert_eq!(Relationship::find().count(&db).await.unwrap(), 0);
        // The other users survive
        assert_eq!(User::find().count(&db).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn destroy_of_a_missing_user_is_not_found() {
        let db = setup_db().await;
        let err = destroy(&db, 9999).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn authenticate_checks_the_password_digest() {
        let db = setup_db().await;
        let user = seed_user(&db, "A User", "user@test.com").await;

        let found = authenticate(&db, "USER@test.com", "foobar").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));

        assert!(authenticate(&db, "user@test.com", "wrong")
            .await
            .unwrap()
            .is_none());
        assert!(authenticate(&db, "nobody@test.com", "foobar")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn authenticated_is_false_for_a_missing_remember_digest() {
        let db = setup_db().await;
        let user = seed_user(&db, "A User", "user@test.com").await;
        assert!(user.remember_digest.is_none());
        // Must return false, not panic, when there is nothing to compare to
        assert!(!authenticated(&user, Credential::Remember, ""));
    }

    #[tokio::test]
    async fn remember_and_forget_round_trip() {
        let db = setup_db().await;
        let user = seed_user(&db, "A User", "user@test.com").await;

        let (remembered, token) = remember(&db, user).await.unwrap();
        assert!(authenticated(&remembered, Credential::Remember, &token));
        assert!(!authenticated(&remembered, Credential::Remember, "bogus"));

        let forgotten = forget(&db, remembered).await.unwrap();
        assert!(!authenticated(&forgotten, Credential::Remember, &token));
    }
}
