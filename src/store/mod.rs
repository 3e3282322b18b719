use chrono::{DateTime, Utc};

use crate::models::Paste;
use crate::types::api::CreatePaste;
use crate::ApiResult;

pub mod memory;

/// Contract shared by every paste backend.
///
/// A consuming `get` runs its view check and increment as one critical
/// section per id: with a view limit of N, exactly N consuming reads
/// succeed no matter how callers race.
pub trait PasteStore {
    /// Validate a creation request and insert the new paste, recording
    /// `now` as its creation instant.
    async fn create(&self, request: CreatePaste, now: DateTime<Utc>) -> ApiResult<Paste>;

    /// Look up a live paste by id, optionally consuming one view.
    ///
    /// Absent, expired, and out-of-views records all come back as `None`.
    async fn get(
        &self,
        id: &str,
        consume_view: bool,
        now: DateTime<Utc>,
    ) -> ApiResult<Option<Paste>>;

    /// Remove a paste outright. Reports whether it existed.
    async fn delete(&self, id: &str) -> ApiResult<bool>;

    /// Drop every paste that can no longer be read at `now`, returning how
    /// many were removed.
    async fn purge_expired(&self, now: DateTime<Utc>) -> ApiResult<usize>;
}

#[derive(Clone)]
pub enum AnyStore {
    Memory(memory::MemoryStore),
}

impl PasteStore for AnyStore {
    async fn create(&self, request: CreatePaste, now: DateTime<Utc>) -> ApiResult<Paste> {
        match self {
            AnyStore::Memory(memory) => memory.create(request, now).await,
        }
    }

    async fn get(
        &self,
        id: &str,
        consume_view: bool,
        now: DateTime<Utc>,
    ) -> ApiResult<Option<Paste>> {
        match self {
            AnyStore::Memory(memory) => memory.get(id, consume_view, now).await,
        }
    }

    async fn delete(&self, id: &str) -> ApiResult<bool> {
        match self {
            AnyStore::Memory(memory) => memory.delete(id).await,
        }
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> ApiResult<usize> {
        match self {
            AnyStore::Memory(memory) => memory.purge_expired(now).await,
        }
    }
}

impl From<memory::MemoryStore> for AnyStore {
    fn from(value: memory::MemoryStore) -> Self {
        AnyStore::Memory(value)
    }
}
