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
use serde_json::{Value, json};

use crate::{
    AppState,
    auth::CurrentUser,
    entities::{collection, favorite},
    error::{ApiError, ApiResult},
    policy, views,
};

pub async fn list(
    State(state): State<Arc<AppState>>,
    CurrentUser(actor): CurrentUser,
) -> ApiResult<Json<Vec<views::FavoriteOut>>> {
    let favorites = favorite::Entity::find()
        .filter(favorite::Column::UserId.eq(actor.id))
        .order_by_asc(favorite::Column::Id)
        .all(&state.db)
        .await?;
    Ok(Json(favorites.into_iter().map(views::FavoriteOut::from).collect()))
}

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    collection: Option<i32>,
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    CurrentUser(actor): CurrentUser,
    Json(req): Json<CreateRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Some(collection_id) = req.collection else {
        return Err(ApiError::BadRequestDetail("Collection ID is required.".to_string()));
    };

    let collection = collection::Entity::find_by_id(collection_id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    if !policy::can_favorite_collection(&collection, &actor) {
        return Err(ApiError::ForbiddenDetail(
            "You cannot favorite this private collection.".to_string(),
        ));
    }

    // Atomic get-or-create: the unique index on (user_id, collection_id)
    // decides, so repeated requests are idempotent and never duplicate.
    let insert = favorite::Entity::insert(favorite::ActiveModel {
        user_id: Set(actor.id),
        collection_id: Set(collection.id),
        ..Default::default()
    })
    .on_conflict(
        OnConflict::columns([favorite::Column::UserId, favorite::Column::CollectionId])
            .do_nothing()
            .to_owned(),
    )
    .exec(&state.db)
    .await;

    match insert {
        Ok(_) => Ok((StatusCode::CREATED, Json(json!({ "message": "Added to favorites" })))),
        Err(DbErr::RecordNotInserted) => {
            Ok((StatusCode::OK, Json(json!({ "message": "Already in favorites" }))))
        },
        Err(err) => Err(err.into()),
    }
}

async fn load_favorite(
    state: &AppState,
    user_id: i32,
    collection_id: i32,
) -> ApiResult<favorite::Model> {
    favorite::Entity::find()
        .filter(favorite::Column::UserId.eq(user_id))
        .filter(favorite::Column::CollectionId.eq(collection_id))
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound)
}

pub async fn detail(
    State(state): State<Arc<AppState>>,
    CurrentUser(actor): CurrentUser,
    Path(collection_id): Path<i32>,
) -> ApiResult<Json<views::FavoriteOut>> {
    let favorite = load_favorite(&state, actor.id, collection_id).await?;
    Ok(Json(favorite.into()))
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    CurrentUser(actor): CurrentUser,
    Path(collection_id): Path<i32>,
) -> ApiResult<StatusCode> {
    let favorite = load_favorite(&state, actor.id, collection_id).await?;
    favorite.delete(&state.db).await?;
    Ok(StatusCode::NO_CONTENT)
}
