use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::models::Paste;
use crate::{ApiError, ApiResult};

/// Body of a paste-creation request.
///
/// `ttl_seconds` and `max_views` stay raw JSON numbers here so that a
/// fractional or negative value reaches validation and gets the message the
/// API promises instead of dying inside deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePaste {
    pub content: Option<String>,
    pub ttl_seconds: Option<Number>,
    pub max_views: Option<Number>,
}

/// Validated form of [`CreatePaste`], ready to be stored.
#[derive(Debug, Clone)]
pub struct NewPaste {
    pub content: String,
    pub ttl_seconds: Option<u64>,
    pub max_views: Option<u64>,
}

impl CreatePaste {
    /// Check the request against the creation rules, in order: content first,
    /// then the two limits.
    ///
    /// Only emptiness is judged on the trimmed content; the stored value is
    /// the original.
    pub fn validate(self) -> ApiResult<NewPaste> {
        let content = match self.content {
            Some(content) if !content.trim().is_empty() => content,
            _ => return Err(ApiError::MissingContent),
        };

        let ttl_seconds = positive_integer(self.ttl_seconds.as_ref())
            .map_err(|()| ApiError::InvalidTtlSeconds)?;
        let max_views =
            positive_integer(self.max_views.as_ref()).map_err(|()| ApiError::InvalidMaxViews)?;

        Ok(NewPaste {
            content,
            ttl_seconds,
            max_views,
        })
    }
}

/// Absent is fine; anything present must be an integer >= 1.
fn positive_integer(value: Option<&Number>) -> Result<Option<u64>, ()> {
    let Some(number) = value else { return Ok(None) };

    match number.as_u64() {
        Some(n) if n >= 1 => Ok(Some(n)),
        _ => Err(()),
    }
}

/// Body returned by the creation endpoint.
#[derive(Debug, Serialize)]
pub struct CreatedPaste {
    pub id: String,
    pub url: String,
}

/// Externally visible shape of a live paste.
#[derive(Debug, PartialEq, Serialize)]
pub struct PasteView {
    pub content: String,
    pub remaining_views: Option<u64>,
    pub expires_at: Option<String>,
}

impl PasteView {
    /// Project a stored record into its response shape. Pure; the reference
    /// time is unused by the current field set.
    pub fn project(paste: &Paste, _now: DateTime<Utc>) -> Self {
        PasteView {
            content: paste.content.clone(),
            remaining_views: paste.max_views.map(|max| max.saturating_sub(paste.views)),
            expires_at: paste
                .expires_at()
                .map(|at| at.to_rfc3339_opts(SecondsFormat::Millis, true)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub ok: bool,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn record(ttl_seconds: Option<u64>, max_views: Option<u64>, views: u64) -> Paste {
        Paste {
            id: "test".to_owned(),
            content: "content".to_owned(),
            ttl_seconds,
            max_views,
            created_at: Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
            views,
        }
    }

    #[test]
    fn missing_limits_project_to_null() {
        let paste = record(None, None, 0);
        let view = PasteView::project(&paste, paste.created_at);

        assert_eq!(view.content, "content");
        assert_eq!(view.remaining_views, None);
        assert_eq!(view.expires_at, None);
    }

    #[test]
    fn expiry_renders_as_utc_with_milliseconds() {
        let paste = record(Some(10), None, 0);
        let view = PasteView::project(&paste, paste.created_at);

        assert_eq!(view.expires_at.as_deref(), Some("2023-11-14T22:13:30.000Z"));
    }

    #[test]
    fn remaining_views_counts_down_and_stops_at_zero() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();

        assert_eq!(
            PasteView::project(&record(None, Some(3), 1), now).remaining_views,
            Some(2)
        );
        assert_eq!(
            PasteView::project(&record(None, Some(2), 2), now).remaining_views,
            Some(0)
        );
        assert_eq!(
            PasteView::project(&record(None, Some(2), 3), now).remaining_views,
            Some(0)
        );
    }
}
