/*
 * Responsibility
 * - "Movie" table CRUD
 * - movie → actors join
 */
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::repos::actor_repo::ActorRow;
use crate::repos::error::RepoError;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MovieRow {
    pub id: i32,
    pub title: String,
    pub release_date: Option<NaiveDate>,
}

pub async fn list(db: &PgPool) -> Result<Vec<MovieRow>, RepoError> {
    let rows = sqlx::query_as::<_, MovieRow>(
        r#"
        SELECT id, title, release_date
        FROM "Movie"
        ORDER BY id
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn get(db: &PgPool, movie_id: i32) -> Result<Option<MovieRow>, RepoError> {
    let row = sqlx::query_as::<_, MovieRow>(
        r#"
        SELECT id, title, release_date
        FROM "Movie"
        WHERE id = $1
        "#,
    )
    .bind(movie_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn create(
    db: &PgPool,
    title: &str,
    release_date: Option<NaiveDate>,
) -> Result<MovieRow, RepoError> {
    let row = sqlx::query_as::<_, MovieRow>(
        r#"
        INSERT INTO "Movie" (title, release_date)
        VALUES ($1, $2)
        RETURNING id, title, release_date
        "#,
    )
    .bind(title)
    .bind(release_date)
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub async fn update(
    db: &PgPool,
    movie_id: i32,
    title: Option<&str>,
    release_date: Option<NaiveDate>,
) -> Result<Option<MovieRow>, RepoError> {
    let row = sqlx::query_as::<_, MovieRow>(
        r#"
        UPDATE "Movie"
        SET
            title = COALESCE($2, title),
            release_date = COALESCE($3, release_date)
        WHERE id = $1
        RETURNING id, title, release_date
        "#,
    )
    .bind(movie_id)
    .bind(title)
    .bind(release_date)
    .fetch_optional(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub async fn delete(db: &PgPool, movie_id: i32) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        DELETE FROM "Movie"
        WHERE id = $1
        "#,
    )
    .bind(movie_id)
    .execute(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(result.rows_affected() > 0)
}

pub async fn list_actors_for_movie(db: &PgPool, movie_id: i32) -> Result<Vec<ActorRow>, RepoError> {
    let rows = sqlx::query_as::<_, ActorRow>(
        r#"
        SELECT a.id, a.name, a.age, a.gender
        FROM "Actor" a
        JOIN actor_movie am ON am.actor_id = a.id
        WHERE am.movie_id = $1
        ORDER BY a.id
        "#,
    )
    .bind(movie_id)
    .fetch_all(db)
    .await?;

    Ok(rows)
}
