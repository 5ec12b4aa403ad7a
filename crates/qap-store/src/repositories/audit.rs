//! Audit log repository.
//!
//! Events are kept as one newest-first list, truncated to the configured
//! retention after every append.

use std::sync::Arc;

use tokio::sync::Mutex;

use qap_core::result::AppResult;
use qap_core::types::pagination::{PageRequest, PageResponse};
use qap_entity::audit::{AuditEvent, AuditFilter};

use crate::keys;
use crate::provider::StoreManager;

/// Repository for audit log entries (append-only).
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    store: Arc<StoreManager>,
    max_events: usize,
    write_lock: Arc<Mutex<()>>,
}

impl AuditLogRepository {
    /// Create a new audit log repository retaining at most `max_events`.
    pub fn new(store: Arc<StoreManager>, max_events: usize) -> Self {
        Self {
            store,
            max_events,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Append an event. Existing events are never modified.
    pub async fn append(&self, event: &AuditEvent) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut events = self.load().await?;
        events.insert(0, event.clone());
        events.truncate(self.max_events);
        self.store.set_json(&keys::audit_log(), &events).await
    }

    /// List events matching `filter`, newest first, one page at a time.
    pub async fn find_all(
        &self,
        filter: &AuditFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AuditEvent>> {
        let events = self.find_matching(filter).await?;
        Ok(page.paginate(events))
    }

    /// Every event matching `filter`, newest first.
    pub async fn find_matching(&self, filter: &AuditFilter) -> AppResult<Vec<AuditEvent>> {
        Ok(self
            .load()
            .await?
            .into_iter()
            .filter(|event| filter.matches(event))
            .collect())
    }

    /// Number of retained events.
    pub async fn count(&self) -> AppResult<usize> {
        Ok(self.load().await?.len())
    }

    async fn load(&self) -> AppResult<Vec<AuditEvent>> {
        Ok(self
            .store
            .get_json(&keys::audit_log())
            .await?
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use qap_entity::audit::AuditEventKind;

    #[tokio::test]
    async fn test_append_is_newest_first_and_capped() {
        let repo = AuditLogRepository::new(Arc::new(StoreManager::in_memory()), 3);
        let start = Utc::now();
        for i in 0..5 {
            let event = AuditEvent::by_email(
                AuditEventKind::LoginFailed,
                "x@y.com",
                format!("attempt {i}"),
                start + Duration::seconds(i),
            );
            repo.append(&event).await.unwrap();
        }

        let all = repo.find_matching(&AuditFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].detail, "attempt 4");
        assert_eq!(all[2].detail, "attempt 2");
    }

    #[tokio::test]
    async fn test_find_all_filters_and_paginates() {
        let repo = AuditLogRepository::new(Arc::new(StoreManager::in_memory()), 100);
        let now = Utc::now();
        for _ in 0..3 {
            repo.append(&AuditEvent::by_email(AuditEventKind::Logout, "a@b.c", "", now))
                .await
                .unwrap();
        }
        repo.append(&AuditEvent::by_email(AuditEventKind::Login, "a@b.c", "", now))
            .await
            .unwrap();

        let filter = AuditFilter {
            kind: Some(AuditEventKind::Logout),
            ..Default::default()
        };
        let page = repo.find_all(&filter, &PageRequest::new(1, 2)).await.unwrap();
        assert_eq!(page.total_items, 3);
        assert_eq!(page.items.len(), 2);
        assert!(page.has_next);
    }
}
