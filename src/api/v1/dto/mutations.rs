/*
 * Responsibility
 * - Response bodies shared by actor and movie mutations
 */
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AddedResponse {
    pub success: bool,
    pub added: i32,
}

#[derive(Debug, Serialize)]
pub struct UpdatedResponse {
    pub success: bool,
    pub updated: i32,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub success: bool,
    pub deleted: i32,
}

/// Body of both `POST /actors/{id}/movies/{movie_id}` and `POST /movies/{id}/actors/{actor_id}`.
#[derive(Debug, Serialize)]
pub struct LinkedResponse {
    pub success: bool,
    pub actor_id: i32,
    pub movie_id: i32,
}

impl AddedResponse {
    pub fn new(added: i32) -> Self {
        Self {
            success: true,
            added,
        }
    }
}

impl UpdatedResponse {
    pub fn new(updated: i32) -> Self {
        Self {
            success: true,
            updated,
        }
    }
}

impl DeletedResponse {
    pub fn new(deleted: i32) -> Self {
        Self {
            success: true,
            deleted,
        }
    }
}

impl LinkedResponse {
    pub fn new(actor_id: i32, movie_id: i32) -> Self {
        Self {
            success: true,
            actor_id,
            movie_id,
        }
    }
}
