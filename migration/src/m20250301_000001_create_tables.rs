use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string_uniq(Users::Username))
                    .col(string(Users::Email))
                    .col(string(Users::PasswordHash))
                    .col(big_integer(Users::DateJoined))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Genres::Table)
                    .if_not_exists()
                    .col(pk_auto(Genres::Id))
                    .col(string_uniq(Genres::Name))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Movies::Table)
                    .if_not_exists()
                    .col(pk_auto(Movies::Id))
                    .col(string(Movies::Title))
                    .col(text_null(Movies::Description))
                    .col(integer_null(Movies::ReleaseYear))
                    .col(integer_null(Movies::GenreId))
                    .col(integer(Movies::AddedBy))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movies_genre")
                            .from(Movies::Table, Movies::GenreId)
                            .to(Genres::Table, Genres::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movies_added_by")
                            .from(Movies::Table, Movies::AddedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tags::Table)
                    .if_not_exists()
                    .col(pk_auto(Tags::Id))
                    .col(string(Tags::Name))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Collections::Table)
                    .if_not_exists()
                    .col(pk_auto(Collections::Id))
                    .col(string(Collections::Name))
                    .col(text_null(Collections::Description))
                    .col(boolean(Collections::IsPublic).default(false))
                    .col(integer(Collections::UserId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_collections_user")
                            .from(Collections::Table, Collections::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CollectionTags::Table)
                    .if_not_exists()
                    .col(integer(CollectionTags::CollectionId))
                    .col(integer(CollectionTags::TagId))
                    .primary_key(
                        Index::create()
                            .col(CollectionTags::CollectionId)
                            .col(CollectionTags::TagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_collection_tags_collection")
                            .from(CollectionTags::Table, CollectionTags::CollectionId)
                            .to(Collections::Table, Collections::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_collection_tags_tag")
                            .from(CollectionTags::Table, CollectionTags::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Watchlists::Table)
                    .if_not_exists()
                    .col(pk_auto(Watchlists::Id))
                    .col(integer(Watchlists::CollectionId))
                    .col(integer(Watchlists::MovieId))
                    .col(big_integer(Watchlists::AddedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_watchlists_collection")
                            .from(Watchlists::Table, Watchlists::CollectionId)
                            .to(Collections::Table, Collections::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_watchlists_movie")
                            .from(Watchlists::Table, Watchlists::MovieId)
                            .to(Movies::Table, Movies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_watchlists_collection_movie_unique")
                    .table(Watchlists::Table)
                    .col(Watchlists::CollectionId)
                    .col(Watchlists::MovieId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MovieReviews::Table)
                    .if_not_exists()
                    .col(pk_auto(MovieReviews::Id))
                    .col(integer(MovieReviews::MovieId))
                    .col(integer(MovieReviews::UserId))
                    .col(integer(MovieReviews::Rating))
                    .col(text_null(MovieReviews::Comment))
                    .col(big_integer(MovieReviews::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_reviews_movie")
                            .from(MovieReviews::Table, MovieReviews::MovieId)
                            .to(Movies::Table, Movies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_reviews_user")
                            .from(MovieReviews::Table, MovieReviews::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_reviews_movie_user_unique")
                    .table(MovieReviews::Table)
                    .col(MovieReviews::MovieId)
                    .col(MovieReviews::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Favorites::Table)
                    .if_not_exists()
                    .col(pk_auto(Favorites::Id))
                    .col(integer(Favorites::UserId))
                    .col(integer(Favorites::CollectionId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favorites_user")
                            .from(Favorites::Table, Favorites::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favorites_collection")
                            .from(Favorites::Table, Favorites::CollectionId)
                            .to(Collections::Table, Collections::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_favorites_user_collection_unique")
                    .table(Favorites::Table)
                    .col(Favorites::UserId)
                    .col(Favorites::CollectionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Favorites::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(MovieReviews::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Watchlists::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(CollectionTags::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Collections::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Tags::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Movies::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Genres::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Users::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    DateJoined,
}

#[derive(DeriveIden)]
enum Genres {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Movies {
    Table,
    Id,
    Title,
    Description,
    ReleaseYear,
    GenreId,
    AddedBy,
}

#[derive(DeriveIden)]
enum Tags {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Collections {
    Table,
    Id,
    Name,
    Description,
    IsPublic,
    UserId,
}

#[derive(DeriveIden)]
enum CollectionTags {
    Table,
    CollectionId,
    TagId,
}

#[derive(DeriveIden)]
enum Watchlists {
    Table,
    Id,
    CollectionId,
    MovieId,
    AddedAt,
}

#[derive(DeriveIden)]
enum MovieReviews {
    Table,
    Id,
    MovieId,
    UserId,
    Rating,
    Comment,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Favorites {
    Table,
    Id,
    UserId,
    CollectionId,
}
