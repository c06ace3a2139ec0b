use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use super::ParseEnumError;

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Client {
    pub id: i32,
    pub advisor_id: i32,
    pub personal_details: Json<PersonalDetails>,
    pub financial_details: Json<FinancialDetails>,
    pub tags: Vec<String>,
    #[sqlx(try_from = "String")]
    pub status: ClientStatus,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.personal_details.first_name, self.personal_details.last_name
        )
        .trim()
        .to_string()
    }

    /// Assets minus liabilities.
    pub fn net_worth(&self) -> f64 {
        self.financial_details.assets - self.financial_details.liabilities
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonalDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: Address,
    pub date_of_birth: String,
    pub occupation: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinancialDetails {
    pub income: f64,
    pub expenses: f64,
    pub assets: f64,
    pub liabilities: f64,
    pub insurance_policies: Vec<InsurancePolicy>,
    pub investments: Vec<Investment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsurancePolicy {
    #[serde(rename = "type")]
    pub kind: String,
    pub provider: String,
    pub policy_number: String,
    pub coverage_amount: f64,
    pub premium: f64,
    pub beneficiary: String,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Investment {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub symbol: Option<String>,
    pub quantity: f64,
    pub current_value: f64,
    pub purchase_price: f64,
    pub purchase_date: String,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    Active,
    Inactive,
    Prospect,
}

impl ClientStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ClientStatus::Active => "active",
            ClientStatus::Inactive => "inactive",
            ClientStatus::Prospect => "prospect",
        }
    }
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for ClientStatus {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "active" => Ok(ClientStatus::Active),
            "inactive" => Ok(ClientStatus::Inactive),
            "prospect" => Ok(ClientStatus::Prospect),
            _ => Err(ParseEnumError {
                field: "client status",
                value,
            }),
        }
    }
}
