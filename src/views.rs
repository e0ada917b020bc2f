//! Wire representations. Most entities map flat; the movie detail and
//! collection views additionally carry booleans derived against the
//! requesting actor at render time.

use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, JoinType, ModelTrait, PaginatorTrait,
    QueryFilter, QuerySelect, RelationTrait,
};
use serde::Serialize;

use crate::{
    entities::{collection, favorite, genre, movie, movie_review, tag, user, watchlist},
    error::ApiResult,
};

#[derive(Debug, Serialize)]
pub struct TagOut {
    pub id: i32,
    pub name: String,
}

impl From<tag::Model> for TagOut {
    fn from(tag: tag::Model) -> Self {
        Self { id: tag.id, name: tag.name }
    }
}

#[derive(Debug, Serialize)]
pub struct GenreOut {
    pub id: i32,
    pub name: String,
}

impl From<genre::Model> for GenreOut {
    fn from(genre: genre::Model) -> Self {
        Self { id: genre.id, name: genre.name }
    }
}

#[derive(Debug, Serialize)]
pub struct MovieOut {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub release_year: Option<i32>,
    pub genre: Option<i32>,
    pub added_by: i32,
}

impl From<movie::Model> for MovieOut {
    fn from(movie: movie::Model) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            description: movie.description,
            release_year: movie.release_year,
            genre: movie.genre_id,
            added_by: movie.added_by,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MovieDetailOut {
    #[serde(flatten)]
    pub movie: MovieOut,
    pub in_watchlist: bool,
    pub is_favorited: bool,
}

/// Detail view of a movie, annotated with whether the actor has the movie in
/// one of their own collections and whether it appears in a collection the
/// actor favorited.
pub async fn movie_detail(
    db: &DatabaseConnection,
    movie: movie::Model,
    actor: &user::Model,
) -> ApiResult<MovieDetailOut> {
    let in_watchlist = watchlist::Entity::find()
        .filter(watchlist::Column::MovieId.eq(movie.id))
        .join(JoinType::InnerJoin, watchlist::Relation::Collection.def())
        .filter(collection::Column::UserId.eq(actor.id))
        .count(db)
        .await?
        > 0;

    let is_favorited = watchlist::Entity::find()
        .filter(watchlist::Column::MovieId.eq(movie.id))
        .join(JoinType::InnerJoin, watchlist::Relation::Collection.def())
        .join(JoinType::InnerJoin, collection::Relation::Favorite.def())
        .filter(favorite::Column::UserId.eq(actor.id))
        .count(db)
        .await?
        > 0;

    Ok(MovieDetailOut { movie: movie.into(), in_watchlist, is_favorited })
}

#[derive(Debug, Serialize)]
pub struct CollectionOut {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub user: i32,
    pub tags: Vec<TagOut>,
    pub is_favorited: bool,
}

/// Collection view with its tag list; `is_favorited` is relative to the
/// actor and stays false when rendered without one.
pub async fn collection_view(
    db: &DatabaseConnection,
    collection: &collection::Model,
    actor: Option<&user::Model>,
) -> ApiResult<CollectionOut> {
    let tags = collection
        .find_related(tag::Entity)
        .all(db)
        .await?
        .into_iter()
        .map(TagOut::from)
        .collect();

    let is_favorited = match actor {
        Some(actor) => {
            favorite::Entity::find()
                .filter(favorite::Column::UserId.eq(actor.id))
                .filter(favorite::Column::CollectionId.eq(collection.id))
                .count(db)
                .await?
                > 0
        },
        None => false,
    };

    Ok(CollectionOut {
        id: collection.id,
        name: collection.name.clone(),
        description: collection.description.clone(),
        is_public: collection.is_public,
        user: collection.user_id,
        tags,
        is_favorited,
    })
}

#[derive(Debug, Serialize)]
pub struct WatchlistOut {
    pub id: i32,
    pub collection: i32,
    pub movie: MovieOut,
    pub added_at: i64,
}

pub fn watchlist_entry(entry: watchlist::Model, movie: movie::Model) -> WatchlistOut {
    WatchlistOut {
        id: entry.id,
        collection: entry.collection_id,
        movie: movie.into(),
        added_at: entry.added_at,
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewOut {
    pub id: i32,
    pub movie: i32,
    pub user: i32,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: i64,
}

impl From<movie_review::Model> for ReviewOut {
    fn from(review: movie_review::Model) -> Self {
        Self {
            id: review.id,
            movie: review.movie_id,
            user: review.user_id,
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FavoriteOut {
    pub id: i32,
    pub user: i32,
    pub collection: i32,
}

impl From<favorite::Model> for FavoriteOut {
    fn from(favorite: favorite::Model) -> Self {
        Self { id: favorite.id, user: favorite.user_id, collection: favorite.collection_id }
    }
}
