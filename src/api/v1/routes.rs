/*
 * Responsibility
 * - v1 URL structure: /health, /actors, /movies
 * - Authorization is per route, carried by each handler's `Authorized<P>`
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::error::AppError;
use crate::state::AppState;

use crate::api::v1::handlers::{
    actors::{
        add_movie_to_actor, create_actor, delete_actor, get_actor, list_actor_movies, list_actors,
        update_actor,
    },
    health::health,
    movies::{
        add_actor_to_movie, create_movie, delete_movie, get_movie, list_movie_actors, list_movies,
        update_movie,
    },
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/actors", get(list_actors).post(create_actor))
        .route(
            "/actors/{actor_id}",
            get(get_actor).patch(update_actor).delete(delete_actor),
        )
        .route("/actors/{actor_id}/movies", get(list_actor_movies))
        .route(
            "/actors/{actor_id}/movies/{movie_id}",
            post(add_movie_to_actor),
        )
        .route("/movies", get(list_movies).post(create_movie))
        .route(
            "/movies/{movie_id}",
            get(get_movie).patch(update_movie).delete(delete_movie),
        )
        .route("/movies/{movie_id}/actors", get(list_movie_actors))
        .route(
            "/movies/{movie_id}/actors/{actor_id}",
            post(add_actor_to_movie),
        )
        .method_not_allowed_fallback(|| async { AppError::MethodNotAllowed })
}
