//! Ownership and visibility decisions, kept as pure functions so they can be
//! checked without a store. Tags, genres, watchlist entries and reviews carry
//! no ownership gate; that asymmetry is existing product behavior.

use crate::entities::{collection, movie, user};

pub fn can_mutate_movie(movie: &movie::Model, actor: &user::Model) -> bool {
    movie.added_by == actor.id
}

pub fn can_view_collection(collection: &collection::Model, actor: &user::Model) -> bool {
    collection.user_id == actor.id || collection.is_public
}

pub fn can_mutate_collection(collection: &collection::Model, actor: &user::Model) -> bool {
    collection.user_id == actor.id
}

pub fn can_favorite_collection(collection: &collection::Model, actor: &user::Model) -> bool {
    collection.user_id == actor.id || collection.is_public
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i32) -> user::Model {
        user::Model {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@example.com"),
            password_hash: String::new(),
            date_joined: 0,
        }
    }

    fn movie(added_by: i32) -> movie::Model {
        movie::Model {
            id: 1,
            title: "Stalker".to_string(),
            description: None,
            release_year: Some(1979),
            genre_id: None,
            added_by,
        }
    }

    fn collection(user_id: i32, is_public: bool) -> collection::Model {
        collection::Model {
            id: 1,
            name: "slow cinema".to_string(),
            description: None,
            is_public,
            user_id,
        }
    }

    #[test]
    fn only_creator_mutates_movie() {
        let m = movie(7);
        assert!(can_mutate_movie(&m, &user(7)));
        assert!(!can_mutate_movie(&m, &user(8)));
    }

    #[test]
    fn private_collection_visible_to_owner_only() {
        let c = collection(1, false);
        assert!(can_view_collection(&c, &user(1)));
        assert!(!can_view_collection(&c, &user(2)));
    }

    #[test]
    fn public_collection_visible_to_all() {
        let c = collection(1, true);
        assert!(can_view_collection(&c, &user(2)));
    }

    #[test]
    fn public_collection_still_owner_mutable_only() {
        let c = collection(1, true);
        assert!(can_mutate_collection(&c, &user(1)));
        assert!(!can_mutate_collection(&c, &user(2)));
    }

    #[test]
    fn favoriting_follows_visibility() {
        let private = collection(1, false);
        let public = collection(1, true);
        assert!(can_favorite_collection(&private, &user(1)));
        assert!(!can_favorite_collection(&private, &user(2)));
        assert!(can_favorite_collection(&public, &user(2)));
    }
}
