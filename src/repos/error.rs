/*
 * Responsibility
 * - What the storage layer reports upward
 * - Input-caused integrity violations are told apart from database failures
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[from] sqlx::Error),
    /// Integrity violation (not-null, check, foreign key) caused by the input.
    #[error("constraint violation: {0}")]
    Constraint(String),
}

impl RepoError {
    pub fn from_sqlx(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(dbe) = &e
            && dbe.code().is_some_and(|code| code.starts_with("23"))
        {
            return RepoError::Constraint(dbe.message().to_string());
        }
        RepoError::Db(e)
    }
}
