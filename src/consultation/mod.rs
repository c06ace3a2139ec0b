use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};

use crate::models::{
    Appointment, AppointmentStatus, ConsultationRequest, NewConsultationRequest, RequestStatus,
};
use crate::notify::Notifier;

/// Storage operations the consultation workflow needs. Implemented by
/// `db::Database`; tests run against an in-memory store.
pub trait ConsultationStore {
    async fn insert_request(&self, request: &NewConsultationRequest) -> Result<ConsultationRequest>;
    async fn all_requests(&self) -> Result<Vec<ConsultationRequest>>;
    async fn requests_for_advisor(&self, advisor_id: i32) -> Result<Vec<ConsultationRequest>>;
    async fn request(&self, id: i32) -> Result<Option<ConsultationRequest>>;
    async fn update_review(
        &self,
        id: i32,
        status: RequestStatus,
        admin_notes: Option<&str>,
        advisor_id: Option<i32>,
    ) -> Result<ConsultationRequest>;
    /// `approved -> completed`, refusing every other starting state.
    async fn complete_approved(&self, id: i32) -> Result<Option<ConsultationRequest>>;
    /// Insert the derived appointment and link it to the request as one
    /// atomic step.
    async fn promote(
        &self,
        id: i32,
        advisor_id: i32,
        client_id: Option<i32>,
    ) -> Result<(Appointment, ConsultationRequest)>;
}

/// The only statuses an admin review can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Approved,
    Declined,
}

impl ReviewDecision {
    pub fn status(self) -> RequestStatus {
        match self {
            ReviewDecision::Approved => RequestStatus::Approved,
            ReviewDecision::Declined => RequestStatus::Declined,
        }
    }
}

/// Intake and review workflow for consultation requests.
pub struct ConsultationService<S> {
    store: S,
    notifier: Notifier,
}

impl<S: ConsultationStore> ConsultationService<S> {
    pub fn new(store: S, notifier: Notifier) -> Self {
        Self { store, notifier }
    }

    /// Store a visitor's request as `pending` and ping the admin inbox.
    pub async fn submit(&self, request: NewConsultationRequest) -> Result<ConsultationRequest> {
        let record = self.store.insert_request(&request).await?;
        self.notifier.notify_admin_of_request(&record);
        Ok(record)
    }

    /// All requests, newest first.
    pub async fn list_all(&self) -> Result<Vec<ConsultationRequest>> {
        self.store.all_requests().await
    }

    /// Requests assigned to one advisor, newest first.
    pub async fn list_for_advisor(&self, advisor_id: i32) -> Result<Vec<ConsultationRequest>> {
        self.store.requests_for_advisor(advisor_id).await
    }

    /// Apply an admin review. Single-row update, last writer wins; the
    /// requester is notified of the outcome.
    pub async fn set_status(
        &self,
        id: i32,
        decision: ReviewDecision,
        admin_notes: Option<&str>,
        advisor_id: Option<i32>,
    ) -> Result<ConsultationRequest> {
        let record = self
            .store
            .update_review(id, decision.status(), admin_notes, advisor_id)
            .await?;
        self.notifier.notify_requester_of_status(&record);
        Ok(record)
    }

    /// Close out an approved request. Refused for any other status, which
    /// keeps a pending request from jumping straight to completed.
    pub async fn mark_completed(&self, id: i32) -> Result<ConsultationRequest> {
        self.store
            .complete_approved(id)
            .await?
            .context("only an approved request can be completed")
    }

    /// Turn a request into a scheduled appointment: a one-hour slot at the
    /// requested date and time, linked back to the request.
    pub async fn promote_to_appointment(
        &self,
        id: i32,
        advisor_id: i32,
        client_id: Option<i32>,
    ) -> Result<Appointment> {
        let (appointment, _) = self.store.promote(id, advisor_id, client_id).await?;
        Ok(appointment)
    }
}

/// Derive the appointment a request asks for: one hour starting at the
/// preferred date and time.
pub fn appointment_from_request(
    request: &ConsultationRequest,
    advisor_id: i32,
    client_id: Option<i32>,
) -> Appointment {
    let start = Utc.from_utc_datetime(&request.preferred_date.and_time(request.preferred_time));
    let end = start + chrono::Duration::hours(1);

    Appointment {
        id: 0,
        advisor_id,
        client_id,
        title: format!("{} - {}", request.request_type.label(), request.requester_name()),
        description: request
            .message
            .clone()
            .unwrap_or_else(|| format!("Consultation request from {}", request.requester_name())),
        start_time: start,
        end_time: end,
        location: String::new(),
        meeting_link: None,
        status: AppointmentStatus::Scheduled,
        created_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::{NaiveDate, NaiveTime};

    use super::*;
    use crate::models::RequestType;

    #[derive(Default)]
    struct MemoryStore {
        inner: Mutex<MemoryInner>,
    }

    #[derive(Default)]
    struct MemoryInner {
        requests: Vec<ConsultationRequest>,
        appointments: Vec<Appointment>,
    }

    impl ConsultationStore for MemoryStore {
        async fn insert_request(
            &self,
            request: &NewConsultationRequest,
        ) -> Result<ConsultationRequest> {
            let mut inner = self.inner.lock().unwrap();
            let now = Utc::now();
            let record = ConsultationRequest {
                id: inner.requests.len() as i32 + 1,
                first_name: request.first_name.clone(),
                last_name: request.last_name.clone(),
                email: request.email.clone(),
                phone: request.phone.clone(),
                preferred_date: request.preferred_date,
                preferred_time: request.preferred_time,
                message: request.message.clone(),
                request_type: request.request_type,
                status: RequestStatus::Pending,
                advisor_id: None,
                appointment_id: None,
                admin_notes: None,
                created_at: now,
                updated_at: now,
            };
            inner.requests.push(record.clone());
            Ok(record)
        }

        async fn all_requests(&self) -> Result<Vec<ConsultationRequest>> {
            let inner = self.inner.lock().unwrap();
            let mut requests = inner.requests.clone();
            requests.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
            Ok(requests)
        }

        async fn requests_for_advisor(&self, advisor_id: i32) -> Result<Vec<ConsultationRequest>> {
            let all = self.all_requests().await?;
            Ok(all
                .into_iter()
                .filter(|r| r.advisor_id == Some(advisor_id))
                .collect())
        }

        async fn request(&self, id: i32) -> Result<Option<ConsultationRequest>> {
            let inner = self.inner.lock().unwrap();
            Ok(inner.requests.iter().find(|r| r.id == id).cloned())
        }

        async fn update_review(
            &self,
            id: i32,
            status: RequestStatus,
            admin_notes: Option<&str>,
            advisor_id: Option<i32>,
        ) -> Result<ConsultationRequest> {
            let mut inner = self.inner.lock().unwrap();
            let record = inner
                .requests
                .iter_mut()
                .find(|r| r.id == id)
                .context("consultation request not found")?;
            record.status = status;
            record.admin_notes = admin_notes.map(str::to_string);
            if advisor_id.is_some() {
                record.advisor_id = advisor_id;
            }
            record.updated_at = Utc::now();
            Ok(record.clone())
        }

        async fn complete_approved(&self, id: i32) -> Result<Option<ConsultationRequest>> {
            let mut inner = self.inner.lock().unwrap();
            let Some(record) = inner.requests.iter_mut().find(|r| r.id == id) else {
                return Ok(None);
            };
            if record.status != RequestStatus::Approved {
                return Ok(None);
            }
            record.status = RequestStatus::Completed;
            record.updated_at = Utc::now();
            Ok(Some(record.clone()))
        }

        async fn promote(
            &self,
            id: i32,
            advisor_id: i32,
            client_id: Option<i32>,
        ) -> Result<(Appointment, ConsultationRequest)> {
            let mut inner = self.inner.lock().unwrap();
            let request = inner
                .requests
                .iter()
                .find(|r| r.id == id)
                .cloned()
                .context("consultation request not found")?;

            let mut appointment = appointment_from_request(&request, advisor_id, client_id);
            appointment.id = inner.appointments.len() as i32 + 1;
            inner.appointments.push(appointment.clone());

            let record = inner
                .requests
                .iter_mut()
                .find(|r| r.id == id)
                .expect("request disappeared");
            record.appointment_id = Some(appointment.id);
            record.status = RequestStatus::Approved;
            record.advisor_id = Some(advisor_id);
            record.updated_at = Utc::now();

            Ok((appointment, record.clone()))
        }
    }

    fn service() -> ConsultationService<MemoryStore> {
        ConsultationService::new(MemoryStore::default(), Notifier::disabled())
    }

    fn jane_doe() -> NewConsultationRequest {
        NewConsultationRequest {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@x.com".to_string(),
            phone: None,
            preferred_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            preferred_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            message: None,
            request_type: RequestType::Initial,
        }
    }

    #[tokio::test]
    async fn submit_yields_pending_with_generated_id() {
        let service = service();
        let record = service.submit(jane_doe()).await.unwrap();

        assert!(record.id > 0);
        assert_eq!(record.status, RequestStatus::Pending);
    }

    #[tokio::test]
    async fn approve_stores_notes() {
        let service = service();
        let record = service.submit(jane_doe()).await.unwrap();

        let reviewed = service
            .set_status(
                record.id,
                ReviewDecision::Approved,
                Some("confirmed by phone"),
                None,
            )
            .await
            .unwrap();

        assert_eq!(reviewed.status, RequestStatus::Approved);
        assert_eq!(reviewed.admin_notes.as_deref(), Some("confirmed by phone"));
    }

    #[tokio::test]
    async fn set_status_is_idempotent_and_last_write_wins() {
        let service = service();
        let record = service.submit(jane_doe()).await.unwrap();

        service
            .set_status(record.id, ReviewDecision::Approved, Some("first"), None)
            .await
            .unwrap();
        let second = service
            .set_status(record.id, ReviewDecision::Approved, Some("second"), None)
            .await
            .unwrap();

        assert_eq!(second.status, RequestStatus::Approved);
        assert_eq!(second.admin_notes.as_deref(), Some("second"));

        // Conflicting reviews are not excluded; the later one simply wins.
        let declined = service
            .set_status(record.id, ReviewDecision::Declined, Some("changed my mind"), None)
            .await
            .unwrap();
        assert_eq!(declined.status, RequestStatus::Declined);
    }

    #[tokio::test]
    async fn pending_request_cannot_jump_to_completed() {
        let service = service();
        let record = service.submit(jane_doe()).await.unwrap();

        assert!(service.mark_completed(record.id).await.is_err());

        service
            .set_status(record.id, ReviewDecision::Approved, None, None)
            .await
            .unwrap();
        let completed = service.mark_completed(record.id).await.unwrap();
        assert_eq!(completed.status, RequestStatus::Completed);
    }

    #[tokio::test]
    async fn promote_schedules_one_hour_and_links_request() {
        let service = service();
        let record = service.submit(jane_doe()).await.unwrap();

        let appointment = service
            .promote_to_appointment(record.id, 9, None)
            .await
            .unwrap();

        assert_eq!(
            appointment.start_time,
            Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap()
        );
        assert_eq!(
            appointment.end_time - appointment.start_time,
            chrono::Duration::hours(1)
        );
        assert_eq!(appointment.status, AppointmentStatus::Scheduled);
        assert_eq!(appointment.title, "Initial Consultation - Jane Doe");

        let request = service.store.request(record.id).await.unwrap().unwrap();
        assert_eq!(request.status, RequestStatus::Approved);
        assert_eq!(request.appointment_id, Some(appointment.id));
        assert_eq!(request.advisor_id, Some(9));
    }

    #[tokio::test]
    async fn list_for_advisor_filters_by_assignment() {
        let service = service();
        let assigned = service.submit(jane_doe()).await.unwrap();
        service.submit(jane_doe()).await.unwrap();

        service
            .set_status(assigned.id, ReviewDecision::Approved, None, Some(4))
            .await
            .unwrap();

        let mine = service.list_for_advisor(4).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, assigned.id);
        assert!(service.list_for_advisor(5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_all_returns_newest_first() {
        let service = service();
        let first = service.submit(jane_doe()).await.unwrap();
        let mut other = jane_doe();
        other.first_name = "John".to_string();
        let second = service.submit(other).await.unwrap();

        let all = service.list_all().await.unwrap();
        assert_eq!(all.first().map(|r| r.id), Some(second.id));
        assert_eq!(all.last().map(|r| r.id), Some(first.id));
    }

    #[test]
    fn stored_status_text_outside_the_domain_is_rejected() {
        assert!(RequestStatus::try_from("pending".to_string()).is_ok());
        assert!(RequestStatus::try_from("archived".to_string()).is_err());
    }
}
