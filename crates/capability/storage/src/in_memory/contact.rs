//! 联系表单内存存储实现

use super::poisoned;
use crate::error::StorageError;
use crate::models::ContactSubmissionRecord;
use crate::traits::ContactStore;
use std::sync::RwLock;

#[derive(Default)]
pub struct InMemoryContactStore {
    submissions: RwLock<Vec<ContactSubmissionRecord>>,
}

impl InMemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ContactStore for InMemoryContactStore {
    async fn insert_submission(
        &self,
        record: ContactSubmissionRecord,
    ) -> Result<ContactSubmissionRecord, StorageError> {
        let mut submissions = self.submissions.write().map_err(poisoned)?;
        submissions.push(record.clone());
        Ok(record)
    }

    async fn list_submissions(&self) -> Result<Vec<ContactSubmissionRecord>, StorageError> {
        let mut items = self.submissions.read().map_err(poisoned)?.clone();
        // 同一毫秒内的提交保持后写在前
        items.reverse();
        items.sort_by(|a, b| b.submitted_at_ms.cmp(&a.submitted_at_ms));
        Ok(items)
    }
}
