use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use tower_http::normalize_path::NormalizePathLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::ApiError;
use crate::models::Paste;
use crate::store::{AnyStore, PasteStore};
use crate::types::api::{CreatePaste, CreatedPaste, Health, PasteView};
use crate::App;

/// The manual for the program in man page form.
const MAN_PAGE: &str = include_str!("../../assets/man.txt");

/// Header carrying a reference-time override, honored only in test mode.
const TEST_NOW_HEADER: &str = "x-test-now-ms";

pub async fn run(app: App) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], app.config.port));

    spawn_sweeper(
        app.store.clone(),
        Duration::from_secs(app.config.sweep_interval_secs),
    );

    let app = Router::new()
        .route("/", get(index))
        .route("/api/healthz", get(healthz))
        .route("/api/pastes", post(create_paste))
        .route("/api/pastes/:id", get(fetch_paste))
        .route("/p/:id", get(view_paste))
        .layer(TraceLayer::new_for_http())
        .route_layer(NormalizePathLayer::trim_trailing_slash())
        .with_state(app);

    info!("listening on {addr}");

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

/// Periodically drop pastes that can never be read again.
fn spawn_sweeper(store: AnyStore, interval: Duration) {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;
            match store.purge_expired(Utc::now()).await {
                Ok(0) => {}
                Ok(removed) => info!("swept {removed} dead pastes"),
                Err(error) => warn!("sweep failed: {error}"),
            }
        }
    });
}

async fn index() -> &'static str {
    MAN_PAGE
}

async fn healthz() -> Json<Health> {
    Json(Health {
        ok: true,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

async fn create_paste(
    State(config): State<Config>,
    State(store): State<AnyStore>,
    headers: HeaderMap,
    request: Result<Json<CreatePaste>, JsonRejection>,
) -> crate::ApiResult<impl IntoResponse> {
    let Json(request) = request?;
    let now = request_time(&config, &headers);

    let paste = store.create(request, now).await?;

    info!(
        "new paste: id='{id}', ttl={ttl:?}, max_views={max_views:?}, size={size}",
        id = paste.id,
        ttl = paste.ttl_seconds,
        max_views = paste.max_views,
        size = paste.content.len()
    );

    let path = format!("/p/{id}", id = paste.id);
    let url = format!("{base_url}{path}", base_url = config.base_url);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, path)],
        Json(CreatedPaste { id: paste.id, url }),
    ))
}

async fn fetch_paste(
    State(config): State<Config>,
    State(store): State<AnyStore>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> crate::ApiResult<Json<PasteView>> {
    let now = request_time(&config, &headers);

    let paste = store.get(&id, true, now).await?.ok_or(ApiError::NotFound)?;

    Ok(Json(PasteView::project(&paste, now)))
}

async fn view_paste(
    State(config): State<Config>,
    State(store): State<AnyStore>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> crate::ApiResult<Html<String>> {
    let now = request_time(&config, &headers);

    // The HTML page is a preview and does not spend a view.
    let paste = store
        .get(&id, false, now)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Html(render_paste_page(&paste)))
}

/// Resolve the reference time for a request: the wall clock, unless test
/// mode is on and the caller supplied a parseable override header.
fn request_time(config: &Config, headers: &HeaderMap) -> DateTime<Utc> {
    if config.test_mode {
        let requested = headers
            .get(TEST_NOW_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<i64>().ok())
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single());

        if let Some(now) = requested {
            return now;
        }
    }

    Utc::now()
}

fn render_paste_page(paste: &Paste) -> String {
    let content = html_escape::encode_text(&paste.content);

    let mut limits = String::new();
    if let Some(max_views) = paste.max_views {
        limits.push_str(&format!("<p>view limit: {max_views} views</p>\n"));
    }
    if let Some(ttl_seconds) = paste.ttl_seconds {
        limits.push_str(&format!("<p>expires in: {ttl_seconds}s</p>\n"));
    }

    format!(
        r#"<!doctype html>
<html><head><meta charset="utf-8"><title>paste {id}</title></head>
<body>
<h1>paste</h1>
<p>id: {id}</p>
<pre style="white-space:pre-wrap">{content}</pre>
{limits}</body></html>"#,
        id = paste.id,
    )
}
