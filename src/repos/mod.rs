/*
 * Responsibility
 * - SQLx access to the casting tables ("Actor", "Movie", actor_movie)
 */
pub mod actor_repo;
pub mod error;
pub mod movie_repo;
