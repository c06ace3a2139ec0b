use anyhow::Result;

use super::Database;
use crate::models::AuthUser;

impl Database {
    pub async fn create_auth_user(&self, email: &str, password_hash: &str) -> Result<AuthUser> {
        let user = sqlx::query_as::<_, AuthUser>(
            r#"
            INSERT INTO auth_users (email, password_hash)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn get_auth_user_by_email(&self, email: &str) -> Result<Option<AuthUser>> {
        let user = sqlx::query_as::<_, AuthUser>("SELECT * FROM auth_users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }
}
