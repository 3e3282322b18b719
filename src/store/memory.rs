use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use super::PasteStore;
use crate::models::Paste;
use crate::types::api::CreatePaste;
use crate::ApiResult;

/// In-memory paste backend.
///
/// Backed by a sharded concurrent map; a read holds the entry's exclusive
/// guard across the accessibility checks and the increment, which serializes
/// racing consuming reads on the same id. A record found expired during a
/// read is removed on the spot; the sweeper collects the rest.
#[derive(Clone, Default)]
pub struct MemoryStore {
    pastes: Arc<DashMap<String, Paste>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasteStore for MemoryStore {
    async fn create(&self, request: CreatePaste, now: DateTime<Utc>) -> ApiResult<Paste> {
        let new = request.validate()?;

        let paste = Paste {
            id: Uuid::new_v4().to_string(),
            content: new.content,
            ttl_seconds: new.ttl_seconds,
            max_views: new.max_views,
            created_at: now,
            views: 0,
        };

        self.pastes.insert(paste.id.clone(), paste.clone());

        Ok(paste)
    }

    async fn get(
        &self,
        id: &str,
        consume_view: bool,
        now: DateTime<Utc>,
    ) -> ApiResult<Option<Paste>> {
        // Take the write half even for plain reads, so the expiry check, the
        // view check, and the increment all sit under one guard.
        let Some(mut entry) = self.pastes.get_mut(id) else {
            return Ok(None);
        };

        if entry.is_expired(now) {
            drop(entry);
            // The id may have been replaced since the guard was released;
            // only remove it if it is still expired.
            self.pastes.remove_if(id, |_, paste| paste.is_expired(now));
            return Ok(None);
        }

        if entry.is_exhausted() {
            return Ok(None);
        }

        if consume_view {
            entry.views += 1;
        }

        Ok(Some(entry.value().clone()))
    }

    async fn delete(&self, id: &str) -> ApiResult<bool> {
        Ok(self.pastes.remove(id).is_some())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> ApiResult<usize> {
        let mut removed = 0;
        self.pastes.retain(|_, paste| {
            if paste.is_expired(now) || paste.is_exhausted() {
                removed += 1;
                false
            } else {
                true
            }
        });

        Ok(removed)
    }
}
