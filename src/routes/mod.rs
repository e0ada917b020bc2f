use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use serde::{Deserialize, Deserializer};

use crate::AppState;

pub mod accounts;
pub mod collections;
pub mod favorites;
pub mod genres;
pub mod movies;
pub mod reviews;
pub mod tags;
pub mod watchlists;

/// Distinguishes an omitted PATCH field (`None`) from an explicit JSON
/// `null` (`Some(None)`), which clears a nullable column.
pub(crate) fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/signup", post(accounts::signup))
        .route("/api/token", post(accounts::token))
        .route("/api/token/refresh", post(accounts::token_refresh))
        .route("/api/movies", get(movies::list).post(movies::create))
        .route(
            "/api/movies/{id}",
            get(movies::detail).patch(movies::update).delete(movies::remove),
        )
        .route("/api/movies/{movie_id}/reviews", get(reviews::list).post(reviews::create))
        .route(
            "/api/movies/{movie_id}/reviews/{review_id}",
            get(reviews::detail).patch(reviews::update).delete(reviews::remove),
        )
        .route("/api/tags", get(tags::list).post(tags::create))
        .route("/api/tags/{id}", get(tags::detail).patch(tags::update).delete(tags::remove))
        .route("/api/genres", get(genres::list))
        .route("/api/collections", get(collections::list).post(collections::create))
        .route("/api/collections/public", get(collections::public))
        .route(
            "/api/collections/{id}",
            get(collections::detail).patch(collections::update).delete(collections::remove),
        )
        .route(
            "/api/collections/{collection_id}/watchlist",
            get(watchlists::by_collection).post(watchlists::add),
        )
        .route(
            "/api/collections/{collection_id}/watchlist/{movie_id}",
            get(watchlists::detail).delete(watchlists::remove),
        )
        .route("/api/watchlists", get(watchlists::list))
        .route(
            "/api/watchlists/{watchlist_id}/movies/{movie_id}/status",
            get(watchlists::movie_status),
        )
        .route("/api/favorites", get(favorites::list).post(favorites::create))
        .route(
            "/api/favorites/{collection_id}",
            get(favorites::detail).delete(favorites::remove),
        )
        .with_state(state)
}
