/*
 * Responsibility
 * - /actors handlers
 * - Each names its permission through `Authorized<P>`; the extractor runs first,
 *   so a rejected request never reaches the repos
 */
use axum::{Json, extract::State};

use crate::{
    api::v1::{
        dto::{
            actors::{
                ActorMoviesResponse, ActorResponse, ActorsResponse, CreateActorRequest,
                UpdateActorRequest,
            },
            mutations::{AddedResponse, DeletedResponse, LinkedResponse, UpdatedResponse},
        },
        extractors::{auth_ctx::Authorized, json::ApiJson, path::ApiPath},
    },
    error::AppError,
    repos::{actor_repo, movie_repo},
    services::auth::permissions::{
        DeleteActors, GetActors, GetActorsDetail, GetActorsMovies, PatchActors, PostActors,
        PostActorsMovie,
    },
    state::AppState,
};

pub async fn list_actors(
    _auth: Authorized<GetActors>,
    State(state): State<AppState>,
) -> Result<Json<ActorsResponse>, AppError> {
    let actors = actor_repo::list(&state.db).await?;
    if actors.is_empty() {
        return Err(AppError::not_found("actors"));
    }

    Ok(Json(ActorsResponse {
        success: true,
        actors,
    }))
}

pub async fn get_actor(
    _auth: Authorized<GetActorsDetail>,
    State(state): State<AppState>,
    ApiPath(actor_id): ApiPath<i32>,
) -> Result<Json<ActorResponse>, AppError> {
    let actor = actor_repo::get(&state.db, actor_id)
        .await?
        .ok_or(AppError::not_found("actor"))?;

    Ok(Json(ActorResponse {
        success: true,
        actor,
    }))
}

pub async fn list_actor_movies(
    _auth: Authorized<GetActorsMovies>,
    State(state): State<AppState>,
    ApiPath(actor_id): ApiPath<i32>,
) -> Result<Json<ActorMoviesResponse>, AppError> {
    actor_repo::get(&state.db, actor_id)
        .await?
        .ok_or(AppError::not_found("actor"))?;

    let movies = actor_repo::list_movies_for_actor(&state.db, actor_id).await?;

    Ok(Json(ActorMoviesResponse {
        success: true,
        actor_id,
        total_movies: movies.len(),
        movies,
    }))
}

pub async fn add_movie_to_actor(
    _auth: Authorized<PostActorsMovie>,
    State(state): State<AppState>,
    ApiPath((actor_id, movie_id)): ApiPath<(i32, i32)>,
) -> Result<Json<LinkedResponse>, AppError> {
    let actor = actor_repo::get(&state.db, actor_id).await?;
    let movie = movie_repo::get(&state.db, movie_id).await?;
    if actor.is_none() || movie.is_none() {
        return Err(AppError::not_found("actor or movie"));
    }

    actor_repo::link(&state.db, actor_id, movie_id).await?;

    Ok(Json(LinkedResponse::new(actor_id, movie_id)))
}

pub async fn create_actor(
    Authorized(claims, _): Authorized<PostActors>,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateActorRequest>,
) -> Result<Json<AddedResponse>, AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("invalid_request", msg))?;

    let row = actor_repo::create(&state.db, &req.name, req.age, req.gender.as_deref()).await?;
    tracing::info!(actor_id = row.id, sub = ?claims.sub, "actor created");

    Ok(Json(AddedResponse::new(row.id)))
}

pub async fn update_actor(
    _auth: Authorized<PatchActors>,
    State(state): State<AppState>,
    ApiPath(actor_id): ApiPath<i32>,
    ApiJson(req): ApiJson<UpdateActorRequest>,
) -> Result<Json<UpdatedResponse>, AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("invalid_request", msg))?;

    let row = actor_repo::update(
        &state.db,
        actor_id,
        req.name.as_deref(),
        req.age,
        req.gender.as_deref(),
    )
    .await?
    .ok_or(AppError::not_found("actor"))?;

    Ok(Json(UpdatedResponse::new(row.id)))
}

pub async fn delete_actor(
    Authorized(claims, _): Authorized<DeleteActors>,
    State(state): State<AppState>,
    ApiPath(actor_id): ApiPath<i32>,
) -> Result<Json<DeletedResponse>, AppError> {
    if !actor_repo::delete(&state.db, actor_id).await? {
        return Err(AppError::not_found("actor"));
    }
    tracing::info!(actor_id, sub = ?claims.sub, "actor deleted");

    Ok(Json(DeletedResponse::new(actor_id)))
}
