use crate::{
    biogate::session::{self, PingOutcome, SessionStore},
    cli::globals::GlobalArgs,
};
use axum::{
    extract::Extension,
    http::{
        header::{InvalidHeaderValue, COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Json},
};
use serde_json::json;
use std::sync::Arc;
use tracing::error;

pub(crate) const SESSION_COOKIE_NAME: &str = "biogate_session";

/// Non-standard "login timeout" status used when the absolute cap fires.
const LOGIN_TIMEOUT: u16 = 440;

#[utoipa::path(
    get,
    path = "/api/session/ping",
    responses (
        (status = 200, description = "Session extended, body carries the remaining budget in milliseconds"),
        (status = 440, description = "Session expired after 1 hour and was destroyed"),
    ),
    tag = "session"
)]
pub async fn ping(
    headers: HeaderMap,
    store: Extension<Arc<dyn SessionStore>>,
    globals: Extension<GlobalArgs>,
) -> impl IntoResponse {
    let presented = extract_session_cookie(&headers);

    let result = match session::ping(
        store.0.as_ref(),
        presented.as_deref(),
        session::now_unix_millis(),
    )
    .await
    {
        Ok(result) => result,
        Err(err) => {
            error!("Session store failure: {err}");

            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                HeaderMap::new(),
                Json(json!({"message": "Session store failure"})),
            );
        }
    };

    match result.outcome {
        PingOutcome::Extended { remaining_ms } => {
            // Rolling cookie: every successful ping restarts the idle window
            let mut response_headers = HeaderMap::new();
            if let Ok(cookie) =
                session_cookie(&result.session_id, globals.session_idle.as_secs())
            {
                response_headers.insert(SET_COOKIE, cookie);
            }

            (
                StatusCode::OK,
                response_headers,
                Json(json!({"message": "Session extended", "remainingTime": remaining_ms})),
            )
        }

        PingOutcome::Expired => {
            // The store entry is already gone; only the stale cookie is left to clear
            let mut response_headers = HeaderMap::new();
            if let Ok(cookie) = clear_session_cookie() {
                response_headers.insert(SET_COOKIE, cookie);
            }

            (
                StatusCode::from_u16(LOGIN_TIMEOUT).unwrap_or(StatusCode::UNAUTHORIZED),
                response_headers,
                Json(json!({"message": "Session expired after 1 hour"})),
            )
        }
    }
}

/// Build the `HttpOnly` rolling cookie for the session identifier.
fn session_cookie(id: &str, idle_seconds: u64) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE_NAME}={id}; Path=/; HttpOnly; SameSite=Lax; Max-Age={idle_seconds}"
    ))
}

fn clear_session_cookie() -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"
    ))
}

pub(crate) fn extract_session_cookie(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == SESSION_COOKIE_NAME {
            return Some(val.to_string());
        }
    }
    None
}
