/*
 * Responsibility
 * - Actors request/response DTOs
 * - validate() for shape checks the database cannot express
 */
use serde::{Deserialize, Serialize};

use crate::repos::{actor_repo::ActorRow, movie_repo::MovieRow};

#[derive(Debug, Deserialize)]
pub struct CreateActorRequest {
    #[serde(default)]
    pub name: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
}

impl CreateActorRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("name of the actor isn't specified");
        }
        if let Some(gender) = &self.gender
            && gender.chars().count() > 50
        {
            return Err("gender must be <= 50 chars");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateActorRequest {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
}

impl UpdateActorRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(name) = &self.name
            && name.trim().is_empty()
        {
            return Err("name cannot be empty");
        }
        if let Some(gender) = &self.gender
            && gender.chars().count() > 50
        {
            return Err("gender must be <= 50 chars");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct ActorsResponse {
    pub success: bool,
    pub actors: Vec<ActorRow>,
}

#[derive(Debug, Serialize)]
pub struct ActorResponse {
    pub success: bool,
    pub actor: ActorRow,
}

#[derive(Debug, Serialize)]
pub struct ActorMoviesResponse {
    pub success: bool,
    pub actor_id: i32,
    #[serde(rename = "totalMovies")]
    pub total_movies: usize,
    pub movies: Vec<MovieRow>,
}
