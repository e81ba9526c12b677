//! Postgres 联系表单存储实现

use crate::error::StorageError;
use crate::models::ContactSubmissionRecord;
use crate::traits::ContactStore;
use sqlx::{PgPool, Row};

pub struct PgContactStore {
    pub pool: PgPool,
}

impl PgContactStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ContactStore for PgContactStore {
    async fn insert_submission(
        &self,
        record: ContactSubmissionRecord,
    ) -> Result<ContactSubmissionRecord, StorageError> {
        sqlx::query(
            "insert into contact_submissions (id, name, email, message, submitted_at_ms) \
             values ($1, $2, $3, $4, $5)",
        )
        .bind(&record.id)
        .bind(&record.name)
        .bind(&record.email)
        .bind(&record.message)
        .bind(record.submitted_at_ms as i64)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn list_submissions(&self) -> Result<Vec<ContactSubmissionRecord>, StorageError> {
        let rows = sqlx::query(
            "select id, name, email, message, submitted_at_ms \
             from contact_submissions order by submitted_at_ms desc",
        )
        .fetch_all(&self.pool)
        .await?;
        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            let submitted_at_ms: i64 = row.try_get("submitted_at_ms")?;
            items.push(ContactSubmissionRecord {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                email: row.try_get("email")?,
                message: row.try_get("message")?,
                submitted_at_ms: submitted_at_ms.max(0) as u64,
            });
        }
        Ok(items)
    }
}
