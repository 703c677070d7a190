//! Queries against the `users` table.

use super::Store;
use crate::store::models::User;
use sqlx::Row;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, name, email, avatar, password, created_at";

fn map_user(row: &sqlx::postgres::PgRow) -> User {
    User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        avatar: row.get("avatar"),
        password: row.get("password"),
        date: row.get("created_at"),
    }
}

impl Store {
    pub async fn user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let row = sqlx::query(&query)
            .bind(email)
            .fetch_optional(self.pool())
            .await?;

        Ok(row.as_ref().map(map_user))
    }

    pub async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        Ok(row.as_ref().map(map_user))
    }

    pub async fn insert_user(
        &self,
        name: &str,
        email: &str,
        avatar: &str,
        password: &str,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email, avatar, password)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query(&query)
            .bind(name)
            .bind(email)
            .bind(avatar)
            .bind(password)
            .fetch_one(self.pool())
            .await?;

        Ok(map_user(&row))
    }
}
