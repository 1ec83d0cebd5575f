use sea_orm::entity::prelude::*;

/// A registered account holder.
///
/// The email is stored lowercased; the unique index on the column is what
/// rejects case-variant duplicates when two signups race.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    /// One-way digest of the password. The plaintext is never stored.
    pub password_digest: String,
    /// Digest of the persistent-session token, if one has been issued.
    pub remember_digest: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    // A user owns their microposts.
    #[sea_orm(has_many = "super::micropost::Entity")]
    Micropost,
}

impl Related<super::micropost::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Micropost.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
