use anyhow::Result;

use super::Database;
use crate::models::Client;

impl Database {
    // Client operations
    pub async fn get_clients_by_advisor(&self, advisor_id: i32) -> Result<Vec<Client>> {
        let clients = sqlx::query_as::<_, Client>(
            "SELECT * FROM clients WHERE advisor_id = $1 ORDER BY created_at DESC",
        )
        .bind(advisor_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }

    pub async fn get_client(&self, id: i32) -> Result<Client> {
        let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(client)
    }

    pub async fn create_client(&self, client: &Client) -> Result<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO clients (advisor_id, personal_details, financial_details, tags, status, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(client.advisor_id)
        .bind(&client.personal_details)
        .bind(&client.financial_details)
        .bind(&client.tags)
        .bind(client.status.as_str())
        .bind(&client.notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    pub async fn update_client(&self, client: &Client) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE clients
            SET personal_details = $1, financial_details = $2, tags = $3,
                status = $4, notes = $5, updated_at = now()
            WHERE id = $6
            "#,
        )
        .bind(&client.personal_details)
        .bind(&client.financial_details)
        .bind(&client.tags)
        .bind(client.status.as_str())
        .bind(&client.notes)
        .bind(client.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete_client(&self, id: i32) -> Result<()> {
        // Detach dependents before the row goes away; the schema does not
        // cascade.
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE tasks SET client_id = NULL WHERE client_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE appointments SET client_id = NULL WHERE client_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}
