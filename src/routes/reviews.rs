use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
    sea_query::OnConflict,
};
use serde::Deserialize;

use crate::{
    AppState,
    auth::CurrentUser,
    db::now_sec,
    entities::{movie, movie_review, user},
    error::{ApiError, ApiResult},
    views,
};

pub async fn list(
    State(state): State<Arc<AppState>>,
    CurrentUser(_actor): CurrentUser,
    Path(movie_id): Path<i32>,
) -> ApiResult<Json<Vec<views::ReviewOut>>> {
    movie::Entity::find_by_id(movie_id).one(&state.db).await?.ok_or(ApiError::NotFound)?;

    let reviews = movie_review::Entity::find()
        .filter(movie_review::Column::MovieId.eq(movie_id))
        .order_by_asc(movie_review::Column::Id)
        .all(&state.db)
        .await?;
    Ok(Json(reviews.into_iter().map(views::ReviewOut::from).collect()))
}

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    user: Option<i32>,
    rating: Option<i32>,
    comment: Option<String>,
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    CurrentUser(_actor): CurrentUser,
    Path(movie_id): Path<i32>,
    Json(req): Json<CreateRequest>,
) -> ApiResult<(StatusCode, Json<views::ReviewOut>)> {
    movie::Entity::find_by_id(movie_id).one(&state.db).await?.ok_or(ApiError::NotFound)?;

    let Some(user_id) = req.user else {
        return Err(ApiError::BadRequest("user is required".to_string()));
    };

    let duplicate = movie_review::Entity::find()
        .filter(movie_review::Column::MovieId.eq(movie_id))
        .filter(movie_review::Column::UserId.eq(user_id))
        .one(&state.db)
        .await?
        .is_some();
    if duplicate {
        return Err(ApiError::BadRequest("You have already reviewed this movie.".to_string()));
    }

    user::Entity::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::Fields(vec![("user", "Object does not exist.")]))?;

    let Some(rating) = req.rating else {
        return Err(ApiError::Fields(vec![("rating", "This field is required.")]));
    };

    // Uniqueness of (movie, user) is enforced by the store; the pre-check
    // above only exists for the friendly path.
    let insert = movie_review::Entity::insert(movie_review::ActiveModel {
        movie_id: Set(movie_id),
        user_id: Set(user_id),
        rating: Set(rating),
        comment: Set(req.comment),
        created_at: Set(now_sec()),
        ..Default::default()
    })
    .on_conflict(
        OnConflict::columns([movie_review::Column::MovieId, movie_review::Column::UserId])
            .do_nothing()
            .to_owned(),
    )
    .exec(&state.db)
    .await;

    let review_id = match insert {
        Ok(res) => res.last_insert_id,
        Err(DbErr::RecordNotInserted) => {
            return Err(ApiError::BadRequest("You have already reviewed this movie.".to_string()));
        },
        Err(err) => return Err(err.into()),
    };

    let review = movie_review::Entity::find_by_id(review_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| anyhow::anyhow!("inserted review {review_id} missing"))?;

    Ok((StatusCode::CREATED, Json(review.into())))
}

async fn load_review(
    state: &AppState,
    movie_id: i32,
    review_id: i32,
) -> ApiResult<movie_review::Model> {
    movie_review::Entity::find_by_id(review_id)
        .filter(movie_review::Column::MovieId.eq(movie_id))
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound)
}

pub async fn detail(
    State(state): State<Arc<AppState>>,
    CurrentUser(_actor): CurrentUser,
    Path((movie_id, review_id)): Path<(i32, i32)>,
) -> ApiResult<Json<views::ReviewOut>> {
    let review = load_review(&state, movie_id, review_id).await?;
    Ok(Json(review.into()))
}

#[derive(Debug, Deserialize)]
pub struct PatchRequest {
    rating: Option<i32>,
    #[serde(default, deserialize_with = "super::double_option")]
    comment: Option<Option<String>>,
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    CurrentUser(_actor): CurrentUser,
    Path((movie_id, review_id)): Path<(i32, i32)>,
    Json(req): Json<PatchRequest>,
) -> ApiResult<Json<views::ReviewOut>> {
    let review = load_review(&state, movie_id, review_id).await?;

    let mut model: movie_review::ActiveModel = review.into();
    if let Some(rating) = req.rating {
        model.rating = Set(rating);
    }
    if let Some(comment) = req.comment {
        model.comment = Set(comment);
    }
    let updated = model.update(&state.db).await?;
    Ok(Json(updated.into()))
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    CurrentUser(_actor): CurrentUser,
    Path((movie_id, review_id)): Path<(i32, i32)>,
) -> ApiResult<StatusCode> {
    let review = load_review(&state, movie_id, review_id).await?;
    review.delete(&state.db).await?;
    Ok(StatusCode::NO_CONTENT)
}
