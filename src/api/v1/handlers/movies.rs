/*
 * Responsibility
 * - /movies handlers (mirror of /actors)
 */
use axum::{Json, extract::State};

use crate::{
    api::v1::{
        dto::{
            movies::{
                CreateMovieRequest, MovieActorsResponse, MovieResponse, MoviesResponse,
                UpdateMovieRequest,
            },
            mutations::{AddedResponse, DeletedResponse, LinkedResponse, UpdatedResponse},
        },
        extractors::{auth_ctx::Authorized, json::ApiJson, path::ApiPath},
    },
    error::AppError,
    repos::{actor_repo, movie_repo},
    services::auth::permissions::{
        DeleteMovies, GetMovies, GetMoviesActors, GetMoviesDetail, PatchMovies, PostMovies,
        PostMoviesActor,
    },
    state::AppState,
};

pub async fn list_movies(
    _auth: Authorized<GetMovies>,
    State(state): State<AppState>,
) -> Result<Json<MoviesResponse>, AppError> {
    let movies = movie_repo::list(&state.db).await?;

    Ok(Json(MoviesResponse {
        success: true,
        movies,
    }))
}

pub async fn get_movie(
    _auth: Authorized<GetMoviesDetail>,
    State(state): State<AppState>,
    ApiPath(movie_id): ApiPath<i32>,
) -> Result<Json<MovieResponse>, AppError> {
    let movie = movie_repo::get(&state.db, movie_id)
        .await?
        .ok_or(AppError::not_found("movie"))?;

    Ok(Json(MovieResponse {
        success: true,
        movie,
    }))
}

pub async fn list_movie_actors(
    _auth: Authorized<GetMoviesActors>,
    State(state): State<AppState>,
    ApiPath(movie_id): ApiPath<i32>,
) -> Result<Json<MovieActorsResponse>, AppError> {
    movie_repo::get(&state.db, movie_id)
        .await?
        .ok_or(AppError::not_found("movie"))?;

    let actors = movie_repo::list_actors_for_movie(&state.db, movie_id).await?;

    Ok(Json(MovieActorsResponse {
        success: true,
        movie: movie_id,
        total_actors: actors.len(),
        actors,
    }))
}

pub async fn add_actor_to_movie(
    _auth: Authorized<PostMoviesActor>,
    State(state): State<AppState>,
    ApiPath((movie_id, actor_id)): ApiPath<(i32, i32)>,
) -> Result<Json<LinkedResponse>, AppError> {
    let movie = movie_repo::get(&state.db, movie_id).await?;
    let actor = actor_repo::get(&state.db, actor_id).await?;
    if movie.is_none() || actor.is_none() {
        return Err(AppError::not_found("movie or actor"));
    }

    actor_repo::link(&state.db, actor_id, movie_id).await?;

    Ok(Json(LinkedResponse::new(actor_id, movie_id)))
}

pub async fn create_movie(
    Authorized(claims, _): Authorized<PostMovies>,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateMovieRequest>,
) -> Result<Json<AddedResponse>, AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("invalid_request", msg))?;

    let row = movie_repo::create(&state.db, &req.title, req.release_date).await?;
    tracing::info!(movie_id = row.id, sub = ?claims.sub, "movie created");

    Ok(Json(AddedResponse::new(row.id)))
}

pub async fn update_movie(
    _auth: Authorized<PatchMovies>,
    State(state): State<AppState>,
    ApiPath(movie_id): ApiPath<i32>,
    ApiJson(req): ApiJson<UpdateMovieRequest>,
) -> Result<Json<UpdatedResponse>, AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("invalid_request", msg))?;

    let row = movie_repo::update(&state.db, movie_id, req.title.as_deref(), req.release_date)
        .await?
        .ok_or(AppError::not_found("movie"))?;

    Ok(Json(UpdatedResponse::new(row.id)))
}

pub async fn delete_movie(
    Authorized(claims, _): Authorized<DeleteMovies>,
    State(state): State<AppState>,
    ApiPath(movie_id): ApiPath<i32>,
) -> Result<Json<DeletedResponse>, AppError> {
    if !movie_repo::delete(&state.db, movie_id).await? {
        return Err(AppError::not_found("movie"));
    }
    tracing::info!(movie_id, sub = ?claims.sub, "movie deleted");

    Ok(Json(DeletedResponse::new(movie_id)))
}
