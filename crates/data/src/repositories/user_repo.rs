//! User repository.

use anyhow::Result;
use sqlx::PgPool;

use crate::models::{NewUser, User, UserUpdate};

const USER_COLUMNS: &str = "id, username, email, password, password_hash, first_name, last_name, \
                            address, is_verified, is_admin, created_at";

/// Repository for user operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new repository instance.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new user and returns the created row.
    ///
    /// # Errors
    /// Returns an error if the database operation fails, including unique
    /// violations on username or email.
    pub async fn insert(&self, new: &NewUser) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r"
            INSERT INTO users (username, email, password, first_name, last_name, address)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(&new.username)
        .bind(&new.email)
        .bind(&new.password)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.address)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user by id.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn get(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user by username.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user by email.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Lists all users ordered by id.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Applies a partial update; returns the updated row or `None` if the
    /// id does not exist.
    ///
    /// # Errors
    /// Returns an error if the database operation fails.
    pub async fn update(&self, id: i64, update: &UserUpdate) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r"
            UPDATE users
            SET username = COALESCE($2, username),
                email = COALESCE($3, email),
                password = COALESCE($4, password),
                first_name = COALESCE($5, first_name),
                last_name = COALESCE($6, last_name),
                address = COALESCE($7, address),
                is_verified = COALESCE($8, is_verified),
                is_admin = COALESCE($9, is_admin)
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&update.username)
        .bind(&update.email)
        .bind(&update.password)
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(&update.address)
        .bind(update.is_verified)
        .bind(update.is_admin)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Deletes a user; returns true if a row was removed.
    ///
    /// # Errors
    /// Returns an error if the database operation fails.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
