use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use super::Database;
use crate::consultation::{ConsultationStore, appointment_from_request};
use crate::models::{Appointment, ConsultationRequest, NewConsultationRequest, RequestStatus};

impl ConsultationStore for Database {
    async fn insert_request(&self, request: &NewConsultationRequest) -> Result<ConsultationRequest> {
        let record = sqlx::query_as::<_, ConsultationRequest>(
            r#"
            INSERT INTO consultation_requests
                (first_name, last_name, email, phone, preferred_date, preferred_time, message, request_type, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'pending')
            RETURNING *
            "#,
        )
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(request.preferred_date)
        .bind(request.preferred_time)
        .bind(&request.message)
        .bind(request.request_type.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn all_requests(&self) -> Result<Vec<ConsultationRequest>> {
        let requests = sqlx::query_as::<_, ConsultationRequest>(
            "SELECT * FROM consultation_requests ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    async fn requests_for_advisor(&self, advisor_id: i32) -> Result<Vec<ConsultationRequest>> {
        let requests = sqlx::query_as::<_, ConsultationRequest>(
            "SELECT * FROM consultation_requests WHERE advisor_id = $1 ORDER BY created_at DESC",
        )
        .bind(advisor_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    async fn request(&self, id: i32) -> Result<Option<ConsultationRequest>> {
        let request = sqlx::query_as::<_, ConsultationRequest>(
            "SELECT * FROM consultation_requests WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    async fn update_review(
        &self,
        id: i32,
        status: RequestStatus,
        admin_notes: Option<&str>,
        advisor_id: Option<i32>,
    ) -> Result<ConsultationRequest> {
        // Plain single-row update: the last writer wins, matching the rest
        // of the system.
        let record = sqlx::query_as::<_, ConsultationRequest>(
            r#"
            UPDATE consultation_requests
            SET status = $2, admin_notes = $3,
                advisor_id = COALESCE($4, advisor_id),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(admin_notes)
        .bind(advisor_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn complete_approved(&self, id: i32) -> Result<Option<ConsultationRequest>> {
        // The status predicate keeps a pending or declined request from
        // being closed out.
        let record = sqlx::query_as::<_, ConsultationRequest>(
            r#"
            UPDATE consultation_requests
            SET status = 'completed', updated_at = now()
            WHERE id = $1 AND status = 'approved'
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn promote(
        &self,
        id: i32,
        advisor_id: i32,
        client_id: Option<i32>,
    ) -> Result<(Appointment, ConsultationRequest)> {
        // Appointment insert and request link commit or roll back together.
        let mut tx = self.pool.begin().await?;

        let request = sqlx::query_as::<_, ConsultationRequest>(
            "SELECT * FROM consultation_requests WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .context("consultation request not found")?;

        let draft = appointment_from_request(&request, advisor_id, client_id);

        let appointment = sqlx::query_as::<_, Appointment>(
            r#"
            INSERT INTO appointments
                (advisor_id, client_id, title, description, start_time, end_time, location, meeting_link, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(draft.advisor_id)
        .bind(draft.client_id)
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(draft.start_time)
        .bind(draft.end_time)
        .bind(&draft.location)
        .bind(&draft.meeting_link)
        .bind(draft.status.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let updated = sqlx::query_as::<_, ConsultationRequest>(
            r#"
            UPDATE consultation_requests
            SET appointment_id = $2, status = 'approved', advisor_id = $3, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(appointment.id)
        .bind(advisor_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((appointment, updated))
    }
}

impl Database {
    /// Requests created on or after the cutoff, newest first. Feeds the
    /// header notification list.
    pub async fn recent_requests_since(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<ConsultationRequest>> {
        let requests = sqlx::query_as::<_, ConsultationRequest>(
            r#"
            SELECT * FROM consultation_requests
            WHERE created_at >= $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(cutoff)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }
}
