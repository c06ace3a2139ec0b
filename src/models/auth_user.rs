use chrono::{DateTime, Utc};

/// Credential record for the auth layer. Never exposed past `auth`.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct AuthUser {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}
