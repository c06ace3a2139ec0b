mod advisor;
mod appointment;
mod auth_user;
mod client;
mod consultation_request;
mod task;

pub use advisor::{Advisor, AdvisorRole};
pub use appointment::{Appointment, AppointmentStatus};
pub use auth_user::AuthUser;
pub use client::{
    Address, Client, ClientStatus, FinancialDetails, InsurancePolicy, Investment, PersonalDetails,
};
pub use consultation_request::{
    ConsultationRequest, NewConsultationRequest, RequestStatus, RequestType,
};
pub use task::{Task, TaskPriority, TaskStatus};

/// Returned when a stored text value does not belong to the column's
/// expected enum domain.
#[derive(Debug, thiserror::Error)]
#[error("unrecognized {field} value: {value:?}")]
pub struct ParseEnumError {
    pub field: &'static str,
    pub value: String,
}
