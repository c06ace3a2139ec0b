use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::ParseEnumError;

/// A scheduling request submitted by an unauthenticated visitor. Lives as
/// `pending` until an admin reviews it.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct ConsultationRequest {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub preferred_date: NaiveDate,
    pub preferred_time: NaiveTime,
    pub message: Option<String>,
    #[sqlx(try_from = "String")]
    pub request_type: RequestType,
    #[sqlx(try_from = "String")]
    pub status: RequestStatus,
    pub advisor_id: Option<i32>,
    pub appointment_id: Option<i32>,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConsultationRequest {
    pub fn requester_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Intake-form payload. Required-field presence is checked at the form
/// layer; nothing else is validated.
#[derive(Debug, Clone)]
pub struct NewConsultationRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub preferred_date: NaiveDate,
    pub preferred_time: NaiveTime,
    pub message: Option<String>,
    pub request_type: RequestType,
}

impl NewConsultationRequest {
    pub fn requester_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestType {
    #[serde(rename = "initial")]
    Initial,
    #[serde(rename = "follow-up")]
    FollowUp,
    #[serde(rename = "pension")]
    Pension,
    #[serde(rename = "business")]
    Business,
}

impl RequestType {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestType::Initial => "initial",
            RequestType::FollowUp => "follow-up",
            RequestType::Pension => "pension",
            RequestType::Business => "business",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RequestType::Initial => "Initial Consultation",
            RequestType::FollowUp => "Follow-up Consultation",
            RequestType::Pension => "Pension Review",
            RequestType::Business => "Business Planning",
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for RequestType {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "initial" => Ok(RequestType::Initial),
            "follow-up" => Ok(RequestType::FollowUp),
            "pension" => Ok(RequestType::Pension),
            "business" => Ok(RequestType::Business),
            _ => Err(ParseEnumError {
                field: "request type",
                value,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Declined,
    Completed,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Declined => "declined",
            RequestStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for RequestStatus {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(RequestStatus::Pending),
            "approved" => Ok(RequestStatus::Approved),
            "declined" => Ok(RequestStatus::Declined),
            "completed" => Ok(RequestStatus::Completed),
            _ => Err(ParseEnumError {
                field: "request status",
                value,
            }),
        }
    }
}
