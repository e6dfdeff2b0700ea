use crate::auth::repo_types::User;
use crate::error::ApiError;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

/// Outcome of an account insert. Uniqueness is enforced by the database
/// constraints, so a losing concurrent registration surfaces here as
/// `Duplicate` rather than being pre-checked in application code.
#[derive(Debug, Error)]
pub enum InsertUserError {
    #[error("email or username already exists")]
    Duplicate,
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

impl From<InsertUserError> for ApiError {
    fn from(err: InsertUserError) -> Self {
        match err {
            InsertUserError::Duplicate => ApiError::IdentityConflict,
            InsertUserError::Db(e) => ApiError::Storage(e),
        }
    }
}

impl User {
    /// Find a user by username.
    pub async fn find_by_username(db: &PgPool, username: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await
    }

    /// Insert a new account. A single statement, so a failed insert leaves no
    /// partial row behind.
    pub async fn create(
        db: &PgPool,
        id: Uuid,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<User, InsertUserError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, username, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, username, password_hash, created_at
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(username)
        .bind(password_hash)
        .fetch_one(db)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                InsertUserError::Duplicate
            }
            _ => InsertUserError::Db(e),
        })?;
        Ok(user)
    }
}
