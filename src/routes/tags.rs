use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Deserialize;

use crate::{
    AppState,
    auth::{CurrentUser, MaybeUser},
    entities::{collection_tag, tag},
    error::{ApiError, ApiResult},
    views,
};

pub async fn list(
    State(state): State<Arc<AppState>>,
    MaybeUser(_actor): MaybeUser,
) -> ApiResult<Json<Vec<views::TagOut>>> {
    let tags = tag::Entity::find().order_by_asc(tag::Column::Id).all(&state.db).await?;
    Ok(Json(tags.into_iter().map(views::TagOut::from).collect()))
}

#[derive(Debug, Deserialize)]
pub struct TagRequest {
    name: Option<String>,
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    MaybeUser(_actor): MaybeUser,
    Json(req): Json<TagRequest>,
) -> ApiResult<(StatusCode, Json<views::TagOut>)> {
    let Some(name) = req.name.filter(|n| !n.trim().is_empty()) else {
        return Err(ApiError::Fields(vec![("name", "This field is required.")]));
    };

    let created =
        tag::ActiveModel { name: Set(name), ..Default::default() }.insert(&state.db).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn detail(
    State(state): State<Arc<AppState>>,
    CurrentUser(_actor): CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<views::TagOut>> {
    let tag = tag::Entity::find_by_id(id).one(&state.db).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(tag.into()))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    CurrentUser(_actor): CurrentUser,
    Path(id): Path<i32>,
    Json(req): Json<TagRequest>,
) -> ApiResult<Json<views::TagOut>> {
    let tag = tag::Entity::find_by_id(id).one(&state.db).await?.ok_or(ApiError::NotFound)?;

    let Some(name) = req.name.filter(|n| !n.trim().is_empty()) else {
        return Err(ApiError::Fields(vec![("name", "This field is required.")]));
    };

    let mut model: tag::ActiveModel = tag.into();
    model.name = Set(name);
    let updated = model.update(&state.db).await?;
    Ok(Json(updated.into()))
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    CurrentUser(_actor): CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    let tag = tag::Entity::find_by_id(id).one(&state.db).await?.ok_or(ApiError::NotFound)?;

    // Detach from all collections and remove the tag in one transaction.
    let txn = state.db.begin().await?;
    collection_tag::Entity::delete_many()
        .filter(collection_tag::Column::TagId.eq(tag.id))
        .exec(&txn)
        .await?;
    tag.delete(&txn).await?;
    txn.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}
