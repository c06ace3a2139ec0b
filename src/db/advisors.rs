use anyhow::Result;

use super::Database;
use crate::models::{Advisor, AdvisorRole};

impl Database {
    // Advisor operations
    pub async fn get_advisors(&self) -> Result<Vec<Advisor>> {
        let advisors =
            sqlx::query_as::<_, Advisor>("SELECT * FROM advisors ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(advisors)
    }

    pub async fn get_advisor(&self, id: i32) -> Result<Advisor> {
        let advisor = sqlx::query_as::<_, Advisor>("SELECT * FROM advisors WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(advisor)
    }

    pub async fn get_advisor_by_user_id(&self, user_id: i32) -> Result<Option<Advisor>> {
        let advisor = sqlx::query_as::<_, Advisor>("SELECT * FROM advisors WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(advisor)
    }

    pub async fn get_advisor_by_email(&self, email: &str) -> Result<Option<Advisor>> {
        let advisor = sqlx::query_as::<_, Advisor>("SELECT * FROM advisors WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(advisor)
    }

    pub async fn create_advisor(&self, advisor: &Advisor) -> Result<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO advisors (user_id, email, first_name, last_name, phone, company_name, role, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(advisor.user_id)
        .bind(&advisor.email)
        .bind(&advisor.first_name)
        .bind(&advisor.last_name)
        .bind(&advisor.phone)
        .bind(&advisor.company_name)
        .bind(advisor.role.as_str())
        .bind(advisor.is_active)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    pub async fn update_advisor(&self, advisor: &Advisor) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE advisors
            SET first_name = $1, last_name = $2, phone = $3, company_name = $4,
                role = $5, updated_at = now()
            WHERE id = $6
            "#,
        )
        .bind(&advisor.first_name)
        .bind(&advisor.last_name)
        .bind(&advisor.phone)
        .bind(&advisor.company_name)
        .bind(advisor.role.as_str())
        .bind(advisor.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Attach an auth account to an advisor row that predates it (rows
    /// provisioned by an admin are matched by email on first login).
    pub async fn link_advisor_user(&self, id: i32, user_id: i32) -> Result<()> {
        sqlx::query("UPDATE advisors SET user_id = $1, updated_at = now() WHERE id = $2")
            .bind(user_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn set_advisor_role(&self, id: i32, role: AdvisorRole) -> Result<()> {
        sqlx::query("UPDATE advisors SET role = $1, updated_at = now() WHERE id = $2")
            .bind(role.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn set_advisor_active(&self, id: i32, is_active: bool) -> Result<()> {
        sqlx::query("UPDATE advisors SET is_active = $1, updated_at = now() WHERE id = $2")
            .bind(is_active)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
