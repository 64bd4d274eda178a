//! User persistence.

use async_trait::async_trait;

use ecommerce_core::UserId;

use super::{PgStore, RepositoryError, is_foreign_key_violation, unique_violation};
use crate::models::{NewUser, User};

/// Storage operations on users.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// All users, ordered by id.
    async fn list_users(&self) -> Result<Vec<User>, RepositoryError>;

    /// A user by id, `None` if absent.
    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Insert a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already taken.
    async fn create_user(&self, user: &NewUser) -> Result<User, RepositoryError>;

    /// Replace every field of an existing user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist and
    /// `RepositoryError::Conflict` if the email belongs to another user.
    async fn update_user(&self, id: UserId, user: &NewUser) -> Result<User, RepositoryError>;

    /// Delete a user. Returns `false` if the user didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the user still owns orders.
    async fn delete_user(&self, id: UserId) -> Result<bool, RepositoryError>;
}

#[async_trait]
impl UserStore for PgStore {
    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        let users = sqlx::query_as::<_, User>(
            r"
            SELECT id, name, address, email
            FROM users
            ORDER BY id
            ",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(users)
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r"
            SELECT id, name, address, email
            FROM users
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(user)
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(
            r"
            INSERT INTO users (name, address, email)
            VALUES ($1, $2, $3)
            RETURNING id, name, address, email
            ",
        )
        .bind(&user.name)
        .bind(&user.address)
        .bind(&user.email)
        .fetch_one(self.pool())
        .await
        .map_err(|e| unique_violation(e, "email already exists"))
    }

    async fn update_user(&self, id: UserId, user: &NewUser) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(
            r"
            UPDATE users
            SET name = $2, address = $3, email = $4
            WHERE id = $1
            RETURNING id, name, address, email
            ",
        )
        .bind(id)
        .bind(&user.name)
        .bind(&user.address)
        .bind(&user.email)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| unique_violation(e, "email already exists"))?
        .ok_or(RepositoryError::NotFound)
    }

    async fn delete_user(&self, id: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    return RepositoryError::Conflict("user still has orders".to_owned());
                }
                RepositoryError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}
