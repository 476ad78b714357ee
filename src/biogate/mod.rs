use crate::cli::globals::GlobalArgs;
use anyhow::{anyhow, Context, Result};
use axum::{
    body::Body,
    extract::{DefaultBodyLimit, MatchedPath},
    http::{header::CONTENT_TYPE, HeaderName, HeaderValue, Method, Request},
    routing::{get, post},
    Extension, Router,
};
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;
use url::Url;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub(crate) mod handlers;
pub mod session;
pub mod validate;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

// Biometric payloads are large; the default 2 MB body cap is not enough
const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::session_ping::ping,
        handlers::user_register::register,
        handlers::user_login::login,
    ),
    components(schemas(
        handlers::health::Health,
        validate::RegisterInput,
        validate::LoginInput
    )),
    tags(
        (name = "biogate", description = "Registration, login and session API")
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, dsn: String, globals: &GlobalArgs) -> Result<()> {
    // Connect to database
    let pool = PgPoolOptions::new()
        .min_connections(1)
        .max_connections(5)
        .max_lifetime(Duration::from_secs(60 * 2))
        .test_before_acquire(true)
        .connect(&dsn)
        .await
        .context("Failed to connect to database")?;

    let store: Arc<dyn session::SessionStore> =
        Arc::new(session::MemorySessionStore::new(globals.session_idle));

    // Credentialed CORS only for the configured origins
    let cors = CorsLayer::new()
        .allow_headers([CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(AllowOrigin::list(allowed_origins(&globals.origins)?))
        .allow_credentials(true);

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi()))
        .route("/api/test", get(|| async { "Backend is reachable" }))
        .route("/api/session/ping", get(handlers::ping))
        .route("/api/user/register", post(handlers::register))
        .route("/api/user/login", post(handlers::login))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors)
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
                .layer(Extension(globals.clone()))
                .layer(Extension(store))
                .layer(Extension(pool.clone())),
        )
        .route("/health", get(handlers::health).options(handlers::health))
        .layer(Extension(pool));

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

fn allowed_origins(origins: &[String]) -> Result<Vec<HeaderValue>> {
    origins.iter().map(|origin| origin_header(origin)).collect()
}

// Normalize a configured origin (scheme://host[:port]) into a header value
fn origin_header(origin: &str) -> Result<HeaderValue> {
    let parsed = Url::parse(origin).with_context(|| format!("Invalid origin: {origin}"))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| anyhow!("Origin must include a valid host: {origin}"))?;
    let port = parsed
        .port()
        .map_or_else(String::new, |port| format!(":{port}"));
    let value = format!("{}://{}{}", parsed.scheme(), host, port);
    HeaderValue::from_str(&value).context("Failed to build origin header")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_header_drops_paths_and_keeps_ports() {
        let value = origin_header("http://192.168.1.22:19006/some/path").unwrap();
        assert_eq!(value, "http://192.168.1.22:19006");

        let value = origin_header("http://localhost:3000").unwrap();
        assert_eq!(value, "http://localhost:3000");
    }

    #[test]
    fn origin_header_rejects_garbage() {
        assert!(origin_header("not a url").is_err());
    }

    #[test]
    fn allowed_origins_maps_the_full_list() {
        let origins = vec![
            "http://localhost:3000".to_string(),
            "http://localhost:8081".to_string(),
        ];

        let values = allowed_origins(&origins).unwrap();

        assert_eq!(values.len(), 2);
        assert_eq!(values[0], "http://localhost:3000");
    }
}
