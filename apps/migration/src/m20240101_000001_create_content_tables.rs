//! Users, posts, comments, categories and category membership.
//!
//! Foreign keys carry no `ON DELETE CASCADE`; the repositories delete
//! dependent rows explicitly inside one transaction.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const NAME_LEN: u32 = 100;
const USERNAME_LEN: u32 = 150;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string_len(USERNAME_LEN)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Email).string().not_null().default(""))
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Users::Created)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Posts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Posts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Posts::Created)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Posts::Title)
                            .string_len(NAME_LEN)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Posts::Body).text().not_null().default(""))
                    .col(ColumnDef::new(Posts::OwnerId).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_posts_owner")
                            .from(Posts::Table, Posts::OwnerId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Comments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Comments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Comments::Created)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Comments::Body).text().not_null())
                    .col(ColumnDef::new(Comments::OwnerId).big_integer().not_null())
                    .col(ColumnDef::new(Comments::PostId).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_owner")
                            .from(Comments::Table, Comments::OwnerId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_post")
                            .from(Comments::Table, Comments::PostId)
                            .to(Posts::Table, Posts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Categories::Name)
                            .string_len(NAME_LEN)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Categories::OwnerId).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_categories_owner")
                            .from(Categories::Table, Categories::OwnerId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CategoryPosts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CategoryPosts::CategoryId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CategoryPosts::PostId).big_integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(CategoryPosts::CategoryId)
                            .col(CategoryPosts::PostId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_category_posts_category")
                            .from(CategoryPosts::Table, CategoryPosts::CategoryId)
                            .to(Categories::Table, Categories::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_category_posts_post")
                            .from(CategoryPosts::Table, CategoryPosts::PostId)
                            .to(Posts::Table, Posts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // List endpoints read oldest first
        manager
            .create_index(
                Index::create()
                    .name("idx_posts_created")
                    .table(Posts::Table)
                    .col(Posts::Created)
                    .col(Posts::Id)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_comments_created")
                    .table(Comments::Table)
                    .col(Comments::Created)
                    .col(Comments::Id)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_comments_post")
                    .table(Comments::Table)
                    .col(Comments::PostId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_category_posts_post")
                    .table(CategoryPosts::Table)
                    .col(CategoryPosts::PostId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CategoryPosts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Comments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Posts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Created,
}

#[derive(DeriveIden)]
enum Posts {
    Table,
    Id,
    Created,
    Title,
    Body,
    OwnerId,
}

#[derive(DeriveIden)]
enum Comments {
    Table,
    Id,
    Created,
    Body,
    OwnerId,
    PostId,
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    Name,
    OwnerId,
}

#[derive(DeriveIden)]
enum CategoryPosts {
    Table,
    CategoryId,
    PostId,
}
