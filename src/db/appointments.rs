use anyhow::Result;
use chrono::{DateTime, Utc};

use super::Database;
use crate::models::{Appointment, AppointmentStatus};

impl Database {
    // Appointment operations
    pub async fn get_appointments_by_advisor(&self, advisor_id: i32) -> Result<Vec<Appointment>> {
        let appointments = sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE advisor_id = $1 ORDER BY start_time ASC",
        )
        .bind(advisor_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(appointments)
    }

    pub async fn get_appointment(&self, id: i32) -> Result<Appointment> {
        let appointment = sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(appointment)
    }

    pub async fn create_appointment(&self, appointment: &Appointment) -> Result<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO appointments
                (advisor_id, client_id, title, description, start_time, end_time, location, meeting_link, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(appointment.advisor_id)
        .bind(appointment.client_id)
        .bind(&appointment.title)
        .bind(&appointment.description)
        .bind(appointment.start_time)
        .bind(appointment.end_time)
        .bind(&appointment.location)
        .bind(&appointment.meeting_link)
        .bind(appointment.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    pub async fn update_appointment(&self, appointment: &Appointment) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE appointments
            SET client_id = $1, title = $2, description = $3, start_time = $4,
                end_time = $5, location = $6, meeting_link = $7, status = $8
            WHERE id = $9
            "#,
        )
        .bind(appointment.client_id)
        .bind(&appointment.title)
        .bind(&appointment.description)
        .bind(appointment.start_time)
        .bind(appointment.end_time)
        .bind(&appointment.location)
        .bind(&appointment.meeting_link)
        .bind(appointment.status.as_str())
        .bind(appointment.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn update_appointment_status(&self, id: i32, status: AppointmentStatus) -> Result<()> {
        sqlx::query("UPDATE appointments SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn delete_appointment(&self, id: i32) -> Result<()> {
        // The request row keeps its appointment_id otherwise and the FK
        // would reject the delete.
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE consultation_requests SET appointment_id = NULL WHERE appointment_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Appointments starting inside the window, soonest first. Feeds the
    /// header notification list.
    pub async fn appointments_between(
        &self,
        advisor_id: i32,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Appointment>> {
        let appointments = sqlx::query_as::<_, Appointment>(
            r#"
            SELECT * FROM appointments
            WHERE advisor_id = $1 AND start_time >= $2 AND start_time <= $3
            ORDER BY start_time ASC
            LIMIT $4
            "#,
        )
        .bind(advisor_id)
        .bind(from)
        .bind(to)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(appointments)
    }
}
