use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;

use crate::{
    AppState,
    auth::CurrentUser,
    entities::{genre, movie},
    error::{ApiError, ApiResult},
    policy, views,
};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    mine: Option<String>,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    CurrentUser(actor): CurrentUser,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<views::MovieOut>>> {
    let mut select = movie::Entity::find().order_by_asc(movie::Column::Id);
    if query.mine.as_deref() == Some("true") {
        select = select.filter(movie::Column::AddedBy.eq(actor.id));
    }
    let movies = select.all(&state.db).await?;
    Ok(Json(movies.into_iter().map(views::MovieOut::from).collect()))
}

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    title: Option<String>,
    description: Option<String>,
    release_year: Option<i32>,
    genre: Option<i32>,
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    CurrentUser(actor): CurrentUser,
    Json(req): Json<CreateRequest>,
) -> ApiResult<(StatusCode, Json<views::MovieOut>)> {
    let Some(title) = req.title.filter(|t| !t.trim().is_empty()) else {
        return Err(ApiError::Fields(vec![("title", "This field is required.")]));
    };

    if let Some(genre_id) = req.genre {
        let exists = genre::Entity::find_by_id(genre_id).one(&state.db).await?.is_some();
        if !exists {
            return Err(ApiError::Fields(vec![("genre", "Object does not exist.")]));
        }
    }

    let created = movie::ActiveModel {
        title: Set(title),
        description: Set(req.description),
        release_year: Set(req.release_year),
        genre_id: Set(req.genre),
        added_by: Set(actor.id),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn detail(
    State(state): State<Arc<AppState>>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<views::MovieDetailOut>> {
    let movie = movie::Entity::find_by_id(id).one(&state.db).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(views::movie_detail(&state.db, movie, &actor).await?))
}

#[derive(Debug, Deserialize)]
pub struct PatchRequest {
    title: Option<String>,
    #[serde(default, deserialize_with = "super::double_option")]
    description: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::double_option")]
    release_year: Option<Option<i32>>,
    #[serde(default, deserialize_with = "super::double_option")]
    genre: Option<Option<i32>>,
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i32>,
    Json(req): Json<PatchRequest>,
) -> ApiResult<Json<views::MovieOut>> {
    let movie = movie::Entity::find_by_id(id).one(&state.db).await?.ok_or(ApiError::NotFound)?;

    if !policy::can_mutate_movie(&movie, &actor) {
        return Err(ApiError::Forbidden(
            "You do not have permission to edit this movie.".to_string(),
        ));
    }

    if let Some(Some(genre_id)) = req.genre {
        let exists = genre::Entity::find_by_id(genre_id).one(&state.db).await?.is_some();
        if !exists {
            return Err(ApiError::Fields(vec![("genre", "Object does not exist.")]));
        }
    }

    let mut model: movie::ActiveModel = movie.into();
    if let Some(title) = req.title {
        if title.trim().is_empty() {
            return Err(ApiError::Fields(vec![("title", "This field may not be blank.")]));
        }
        model.title = Set(title);
    }
    if let Some(description) = req.description {
        model.description = Set(description);
    }
    if let Some(release_year) = req.release_year {
        model.release_year = Set(release_year);
    }
    if let Some(genre) = req.genre {
        model.genre_id = Set(genre);
    }

    let updated = model.update(&state.db).await?;
    Ok(Json(updated.into()))
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    let movie = movie::Entity::find_by_id(id).one(&state.db).await?.ok_or(ApiError::NotFound)?;

    if !policy::can_mutate_movie(&movie, &actor) {
        return Err(ApiError::Forbidden(
            "You do not have permission to delete this movie.".to_string(),
        ));
    }

    movie.delete(&state.db).await?;
    Ok(StatusCode::NO_CONTENT)
}
