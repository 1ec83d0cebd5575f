use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Name))
                    // Emails are stored lowercased; the unique index makes
                    // case-insensitive uniqueness hold under concurrent
                    // inserts instead of only in the application pre-check.
                    .col(string(Users::Email).unique_key())
                    .col(string(Users::PasswordDigest))
                    .col(string_null(Users::RememberDigest))
                    .col(timestamp_with_time_zone(Users::CreatedAt))
                    .col(timestamp_with_time_zone(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Create microposts table
        manager
            .create_table(
                Table::create()
                    .table(Microposts::Table)
                    .if_not_exists()
                    .col(pk_auto(Microposts::Id))
                    .col(text(Microposts::Content))
                    .col(integer(Microposts::UserId))
                    .col(timestamp_with_time_zone(Microposts::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_micropost_user")
                            .from(Microposts::Table, Microposts::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Author-scoped newest-first reads
        manager
            .create_index(
                Index::create()
                    .name("idx_microposts_user_id_created_at")
                    .table(Microposts::Table)
                    .col(Microposts::UserId)
                    .col(Microposts::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Create relationships table (directed follow edges)
        manager
            .create_table(
                Table::create()
                    .table(Relationships::Table)
                    .if_not_exists()
                    .col(integer(Relationships::FollowerId))
                    .col(integer(Relationships::FollowedId))
                    // The pair is the primary key: concurrent duplicate
                    // follow calls collapse to a single edge here.
                    .primary_key(
                        Index::create()
                            .name("pk_relationships")
                            .col(Relationships::FollowerId)
                            .col(Relationships::FollowedId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_relationship_follower")
                            .from(Relationships::Table, Relationships::FollowerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_relationship_followed")
                            .from(Relationships::Table, Relationships::FollowedId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Follower enumeration scans by the followed side
        manager
            .create_index(
                Index::create()
                    .name("idx_relationships_followed_id")
                    .table(Relationships::Table)
                    .col(Relationships::FollowedId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order to avoid foreign key constraints
        manager
            .drop_table(Table::drop().table(Relationships::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Microposts::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

// Define identifiers for all tables

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    PasswordDigest,
    RememberDigest,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Microposts {
    Table,
    Id,
    Content,
    UserId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Relationships {
    Table,
    FollowerId,
    FollowedId,
}
