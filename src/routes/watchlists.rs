use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sea_orm::{
    ColumnTrait, DbErr, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
    sea_query::OnConflict,
};
use serde::Deserialize;

use crate::{
    AppState,
    auth::CurrentUser,
    db::now_sec,
    entities::{collection, movie, watchlist},
    error::{ApiError, ApiResult},
    views,
};

pub async fn list(
    State(state): State<Arc<AppState>>,
    CurrentUser(_actor): CurrentUser,
) -> ApiResult<Json<Vec<views::WatchlistOut>>> {
    let entries = watchlist::Entity::find()
        .find_also_related(movie::Entity)
        .order_by_asc(watchlist::Column::Id)
        .all(&state.db)
        .await?;

    let out = entries
        .into_iter()
        .filter_map(|(entry, movie)| movie.map(|m| views::watchlist_entry(entry, m)))
        .collect();
    Ok(Json(out))
}

pub async fn by_collection(
    State(state): State<Arc<AppState>>,
    CurrentUser(_actor): CurrentUser,
    Path(collection_id): Path<i32>,
) -> ApiResult<Json<Vec<views::WatchlistOut>>> {
    let entries = watchlist::Entity::find()
        .filter(watchlist::Column::CollectionId.eq(collection_id))
        .find_also_related(movie::Entity)
        .order_by_asc(watchlist::Column::Id)
        .all(&state.db)
        .await?;

    let out = entries
        .into_iter()
        .filter_map(|(entry, movie)| movie.map(|m| views::watchlist_entry(entry, m)))
        .collect();
    Ok(Json(out))
}

#[derive(Debug, Deserialize)]
pub struct AddRequest {
    movie_id: Option<i32>,
}

pub async fn add(
    State(state): State<Arc<AppState>>,
    CurrentUser(_actor): CurrentUser,
    Path(collection_id): Path<i32>,
    Json(req): Json<AddRequest>,
) -> ApiResult<(StatusCode, Json<views::WatchlistOut>)> {
    let Some(movie_id) = req.movie_id else {
        return Err(ApiError::BadRequest("movie_id is required".to_string()));
    };

    collection::Entity::find_by_id(collection_id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;
    let movie =
        movie::Entity::find_by_id(movie_id).one(&state.db).await?.ok_or(ApiError::NotFound)?;

    let duplicate = watchlist::Entity::find()
        .filter(watchlist::Column::CollectionId.eq(collection_id))
        .filter(watchlist::Column::MovieId.eq(movie_id))
        .one(&state.db)
        .await?
        .is_some();
    if duplicate {
        return Err(ApiError::BadRequest("Movie already in collection".to_string()));
    }

    // The unique index on (collection_id, movie_id) is the real guard; a
    // concurrent insert surfaces as RecordNotInserted.
    let insert = watchlist::Entity::insert(watchlist::ActiveModel {
        collection_id: Set(collection_id),
        movie_id: Set(movie_id),
        added_at: Set(now_sec()),
        ..Default::default()
    })
    .on_conflict(
        OnConflict::columns([watchlist::Column::CollectionId, watchlist::Column::MovieId])
            .do_nothing()
            .to_owned(),
    )
    .exec(&state.db)
    .await;

    let entry_id = match insert {
        Ok(res) => res.last_insert_id,
        Err(DbErr::RecordNotInserted) => {
            return Err(ApiError::BadRequest("Movie already in collection".to_string()));
        },
        Err(err) => return Err(err.into()),
    };

    let entry = watchlist::Entity::find_by_id(entry_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| anyhow::anyhow!("inserted watchlist entry {entry_id} missing"))?;

    Ok((StatusCode::CREATED, Json(views::watchlist_entry(entry, movie))))
}

pub async fn detail(
    State(state): State<Arc<AppState>>,
    CurrentUser(_actor): CurrentUser,
    Path((collection_id, movie_id)): Path<(i32, i32)>,
) -> ApiResult<Json<views::WatchlistOut>> {
    let (entry, movie) = watchlist::Entity::find()
        .filter(watchlist::Column::CollectionId.eq(collection_id))
        .filter(watchlist::Column::MovieId.eq(movie_id))
        .find_also_related(movie::Entity)
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    let movie = movie.ok_or_else(|| anyhow::anyhow!("watchlist entry {} has no movie", entry.id))?;
    Ok(Json(views::watchlist_entry(entry, movie)))
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    CurrentUser(_actor): CurrentUser,
    Path((collection_id, movie_id)): Path<(i32, i32)>,
) -> ApiResult<StatusCode> {
    let entry = watchlist::Entity::find()
        .filter(watchlist::Column::CollectionId.eq(collection_id))
        .filter(watchlist::Column::MovieId.eq(movie_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFoundMessage("Movie not found in collection".to_string()))?;

    entry.delete(&state.db).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Watchlist status of a movie within one of the actor's own collections.
pub async fn movie_status(
    State(state): State<Arc<AppState>>,
    CurrentUser(actor): CurrentUser,
    Path((watchlist_id, movie_id)): Path<(i32, i32)>,
) -> ApiResult<Json<views::WatchlistOut>> {
    let (entry, movie) = watchlist::Entity::find_by_id(watchlist_id)
        .filter(watchlist::Column::MovieId.eq(movie_id))
        .find_also_related(movie::Entity)
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    let owned = collection::Entity::find_by_id(entry.collection_id)
        .filter(collection::Column::UserId.eq(actor.id))
        .one(&state.db)
        .await?
        .is_some();
    if !owned {
        return Err(ApiError::NotFound);
    }

    let movie = movie.ok_or_else(|| anyhow::anyhow!("watchlist entry {} has no movie", entry.id))?;
    Ok(Json(views::watchlist_entry(entry, movie)))
}
