use chrono::{DateTime, Duration, Utc};

/// Upper bound applied to `ttl_seconds` when computing the expiry instant,
/// keeping timestamp arithmetic in range. Roughly one hundred years.
const MAX_TTL_SECONDS: u64 = 100 * 365 * 24 * 60 * 60;

/// A stored snippet plus its expiry metadata and view counter.
///
/// Everything except `views` is fixed at creation. `views` moves only
/// forward, and only through a consuming read.
#[derive(Debug, Clone)]
pub struct Paste {
    pub id: String,
    pub content: String,
    pub ttl_seconds: Option<u64>,
    pub max_views: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub views: u64,
}

impl Paste {
    /// The instant at which this paste stops being readable, if it has one.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.ttl_seconds
            .map(|ttl| self.created_at + Duration::seconds(ttl.min(MAX_TTL_SECONDS) as i64))
    }

    /// Whether the time window has closed at `now`. The boundary instant
    /// itself counts as expired.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().map_or(false, |at| now >= at)
    }

    /// Whether the view budget is already spent.
    pub fn is_exhausted(&self) -> bool {
        self.max_views.map_or(false, |max| self.views >= max)
    }
}
