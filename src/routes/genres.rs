use std::sync::Arc;

use axum::{Json, extract::State};
use sea_orm::{EntityTrait, QueryOrder};

use crate::{AppState, auth::CurrentUser, entities::genre, error::ApiResult, views};

pub async fn list(
    State(state): State<Arc<AppState>>,
    CurrentUser(_actor): CurrentUser,
) -> ApiResult<Json<Vec<views::GenreOut>>> {
    let genres = genre::Entity::find().order_by_asc(genre::Column::Id).all(&state.db).await?;
    Ok(Json(genres.into_iter().map(views::GenreOut::from).collect()))
}
