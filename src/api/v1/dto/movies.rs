/*
 * Responsibility
 * - Movies request/response DTOs
 * - release_date travels as an ISO-8601 date ("2003-10-10")
 */
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::repos::{actor_repo::ActorRow, movie_repo::MovieRow};

#[derive(Debug, Deserialize)]
pub struct CreateMovieRequest {
    #[serde(default)]
    pub title: String,
    pub release_date: Option<NaiveDate>,
}

impl CreateMovieRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("title of the movie isn't specified");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateMovieRequest {
    pub title: Option<String>,
    pub release_date: Option<NaiveDate>,
}

impl UpdateMovieRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(title) = &self.title
            && title.trim().is_empty()
        {
            return Err("title cannot be empty");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct MoviesResponse {
    pub success: bool,
    pub movies: Vec<MovieRow>,
}

#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub success: bool,
    pub movie: MovieRow,
}

#[derive(Debug, Serialize)]
pub struct MovieActorsResponse {
    pub success: bool,
    /// Id of the movie, mirroring `actor_id` in the actor's listing.
    pub movie: i32,
    #[serde(rename = "totalActors")]
    pub total_actors: usize,
    pub actors: Vec<ActorRow>,
}
