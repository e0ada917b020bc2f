pub mod collection;
pub mod collection_tag;
pub mod favorite;
pub mod genre;
pub mod movie;
pub mod movie_review;
pub mod tag;
pub mod user;
pub mod watchlist;
