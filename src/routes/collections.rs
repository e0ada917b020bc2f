use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;

use crate::{
    AppState,
    auth::CurrentUser,
    entities::{collection, collection_tag, tag},
    error::{ApiError, ApiResult},
    policy, views,
};

pub async fn list(
    State(state): State<Arc<AppState>>,
    CurrentUser(actor): CurrentUser,
) -> ApiResult<Json<Vec<views::CollectionOut>>> {
    let collections = collection::Entity::find()
        .filter(collection::Column::UserId.eq(actor.id))
        .order_by_asc(collection::Column::Id)
        .all(&state.db)
        .await?;

    let mut out = Vec::with_capacity(collections.len());
    for c in &collections {
        out.push(views::collection_view(&state.db, c, Some(&actor)).await?);
    }
    Ok(Json(out))
}

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    name: Option<String>,
    description: Option<String>,
    is_public: Option<bool>,
    tags: Option<Vec<i32>>,
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    CurrentUser(actor): CurrentUser,
    Json(req): Json<CreateRequest>,
) -> ApiResult<(StatusCode, Json<views::CollectionOut>)> {
    let Some(name) = req.name.filter(|n| !n.trim().is_empty()) else {
        return Err(ApiError::Fields(vec![("name", "This field is required.")]));
    };

    // Validate before any write so a bad tag reference persists nothing.
    let tag_ids = match req.tags {
        Some(ids) => Some(checked_tag_ids(&state.db, ids).await?),
        None => None,
    };

    // The collection row and its tag associations land together or not at
    // all.
    let txn = state.db.begin().await?;
    let created = collection::ActiveModel {
        name: Set(name),
        description: Set(req.description),
        is_public: Set(req.is_public.unwrap_or(false)),
        user_id: Set(actor.id),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    if let Some(tag_ids) = tag_ids {
        replace_tags(&txn, created.id, tag_ids).await?;
    }
    txn.commit().await?;

    let view = views::collection_view(&state.db, &created, Some(&actor)).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn public(
    State(state): State<Arc<AppState>>,
    CurrentUser(_actor): CurrentUser,
) -> ApiResult<Json<Vec<views::CollectionOut>>> {
    let collections = collection::Entity::find()
        .filter(collection::Column::IsPublic.eq(true))
        .order_by_asc(collection::Column::Id)
        .all(&state.db)
        .await?;

    let mut out = Vec::with_capacity(collections.len());
    for c in &collections {
        out.push(views::collection_view(&state.db, c, None).await?);
    }
    Ok(Json(out))
}

pub async fn detail(
    State(state): State<Arc<AppState>>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<views::CollectionOut>> {
    let collection =
        collection::Entity::find_by_id(id).one(&state.db).await?.ok_or(ApiError::NotFound)?;

    if !policy::can_view_collection(&collection, &actor) {
        return Err(ApiError::ForbiddenDetail(
            "You do not have permission to view this collection.".to_string(),
        ));
    }

    Ok(Json(views::collection_view(&state.db, &collection, Some(&actor)).await?))
}

#[derive(Debug, Deserialize)]
pub struct PatchRequest {
    name: Option<String>,
    #[serde(default, deserialize_with = "super::double_option")]
    description: Option<Option<String>>,
    is_public: Option<bool>,
    tags: Option<Vec<i32>>,
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i32>,
    Json(req): Json<PatchRequest>,
) -> ApiResult<Json<views::CollectionOut>> {
    let collection =
        collection::Entity::find_by_id(id).one(&state.db).await?.ok_or(ApiError::NotFound)?;

    if !policy::can_mutate_collection(&collection, &actor) {
        return Err(ApiError::Forbidden(
            "You do not have permission to edit this collection.".to_string(),
        ));
    }

    let tag_ids = match req.tags {
        Some(ids) => Some(checked_tag_ids(&state.db, ids).await?),
        None => None,
    };

    let mut model: collection::ActiveModel = collection.into();
    if let Some(name) = req.name {
        if name.trim().is_empty() {
            return Err(ApiError::Fields(vec![("name", "This field may not be blank.")]));
        }
        model.name = Set(name);
    }
    if let Some(description) = req.description {
        model.description = Set(description);
    }
    if let Some(is_public) = req.is_public {
        model.is_public = Set(is_public);
    }

    let txn = state.db.begin().await?;
    let updated = model.update(&txn).await?;
    if let Some(tag_ids) = tag_ids {
        replace_tags(&txn, updated.id, tag_ids).await?;
    }
    txn.commit().await?;

    Ok(Json(views::collection_view(&state.db, &updated, Some(&actor)).await?))
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    let collection =
        collection::Entity::find_by_id(id).one(&state.db).await?.ok_or(ApiError::NotFound)?;

    if !policy::can_mutate_collection(&collection, &actor) {
        return Err(ApiError::Forbidden(
            "You do not have permission to delete this collection.".to_string(),
        ));
    }

    // Watchlist entries and favorites go with it via FK cascade.
    collection.delete(&state.db).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Dedupes the requested tag ids and confirms they all exist.
async fn checked_tag_ids(db: &DatabaseConnection, mut tag_ids: Vec<i32>) -> ApiResult<Vec<i32>> {
    tag_ids.sort_unstable();
    tag_ids.dedup();

    let found = tag::Entity::find()
        .filter(tag::Column::Id.is_in(tag_ids.clone()))
        .count(db)
        .await?;
    if found as usize != tag_ids.len() {
        return Err(ApiError::Fields(vec![("tags", "Object does not exist.")]));
    }
    Ok(tag_ids)
}

/// Replaces the collection's tag associations with the given set.
async fn replace_tags<C: ConnectionTrait>(
    db: &C,
    collection_id: i32,
    tag_ids: Vec<i32>,
) -> ApiResult<()> {
    collection_tag::Entity::delete_many()
        .filter(collection_tag::Column::CollectionId.eq(collection_id))
        .exec(db)
        .await?;

    if !tag_ids.is_empty() {
        let rows = tag_ids.into_iter().map(|tag_id| collection_tag::ActiveModel {
            collection_id: Set(collection_id),
            tag_id: Set(tag_id),
        });
        collection_tag::Entity::insert_many(rows).exec(db).await?;
    }

    Ok(())
}
