use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ParseEnumError;

/// A CRM user. `user_id` links the row to the auth account; rows created
/// before the account exists are matched by email instead.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Advisor {
    pub id: i32,
    pub user_id: Option<i32>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub company_name: String,
    #[sqlx(try_from = "String")]
    pub role: AdvisorRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Advisor {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisorRole {
    Admin,
    Advisor,
}

impl AdvisorRole {
    pub fn as_str(self) -> &'static str {
        match self {
            AdvisorRole::Admin => "admin",
            AdvisorRole::Advisor => "advisor",
        }
    }
}

impl fmt::Display for AdvisorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for AdvisorRole {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "admin" => Ok(AdvisorRole::Admin),
            "advisor" => Ok(AdvisorRole::Advisor),
            _ => Err(ParseEnumError {
                field: "advisor role",
                value,
            }),
        }
    }
}
