/*
 * Responsibility
 * - "Actor" table CRUD
 * - actor → movies join and the actor_movie link insert
 * - actor_movie rows go away with the actor (ON DELETE CASCADE)
 */
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoError;
use crate::repos::movie_repo::MovieRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActorRow {
    pub id: i32,
    pub name: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
}

pub async fn list(db: &PgPool) -> Result<Vec<ActorRow>, RepoError> {
    let rows = sqlx::query_as::<_, ActorRow>(
        r#"
        SELECT id, name, age, gender
        FROM "Actor"
        ORDER BY id
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn get(db: &PgPool, actor_id: i32) -> Result<Option<ActorRow>, RepoError> {
    let row = sqlx::query_as::<_, ActorRow>(
        r#"
        SELECT id, name, age, gender
        FROM "Actor"
        WHERE id = $1
        "#,
    )
    .bind(actor_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn create(
    db: &PgPool,
    name: &str,
    age: Option<i32>,
    gender: Option<&str>,
) -> Result<ActorRow, RepoError> {
    let row = sqlx::query_as::<_, ActorRow>(
        r#"
        INSERT INTO "Actor" (name, age, gender)
        VALUES ($1, $2, $3)
        RETURNING id, name, age, gender
        "#,
    )
    .bind(name)
    .bind(age)
    .bind(gender)
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

/// Partial update: `None` leaves the column unchanged.
pub async fn update(
    db: &PgPool,
    actor_id: i32,
    name: Option<&str>,
    age: Option<i32>,
    gender: Option<&str>,
) -> Result<Option<ActorRow>, RepoError> {
    let row = sqlx::query_as::<_, ActorRow>(
        r#"
        UPDATE "Actor"
        SET
            name = COALESCE($2, name),
            age = COALESCE($3, age),
            gender = COALESCE($4, gender)
        WHERE id = $1
        RETURNING id, name, age, gender
        "#,
    )
    .bind(actor_id)
    .bind(name)
    .bind(age)
    .bind(gender)
    .fetch_optional(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub async fn delete(db: &PgPool, actor_id: i32) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        DELETE FROM "Actor"
        WHERE id = $1
        "#,
    )
    .bind(actor_id)
    .execute(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(result.rows_affected() > 0)
}

pub async fn list_movies_for_actor(db: &PgPool, actor_id: i32) -> Result<Vec<MovieRow>, RepoError> {
    let rows = sqlx::query_as::<_, MovieRow>(
        r#"
        SELECT m.id, m.title, m.release_date
        FROM "Movie" m
        JOIN actor_movie am ON am.movie_id = m.id
        WHERE am.actor_id = $1
        ORDER BY m.id
        "#,
    )
    .bind(actor_id)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

/// Cast `actor_id` in `movie_id`. Linking an existing pair is a no-op.
pub async fn link(db: &PgPool, actor_id: i32, movie_id: i32) -> Result<(), RepoError> {
    sqlx::query(
        r#"
        INSERT INTO actor_movie (actor_id, movie_id)
        VALUES ($1, $2)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(actor_id)
    .bind(movie_id)
    .execute(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(())
}
