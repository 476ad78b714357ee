use crate::biogate::validate::{validate_login_input, LoginInput};
use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use sqlx::{PgPool, Row};
use tracing::{debug, error, instrument};

#[utoipa::path(
    post,
    path= "/api/user/login",
    request_body = LoginInput,
    responses (
        (status = 200, description = "Login successful"),
        (status = 400, description = "Payload failed validation"),
        (status = 401, description = "Unauthorized"),
    ),
    tag= "login"
)]
#[instrument(skip_all)]
pub async fn login(pool: Extension<PgPool>, payload: Option<Json<LoginInput>>) -> impl IntoResponse {
    let input: LoginInput = match payload {
        Some(Json(payload)) => payload,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"message": "Missing payload"})),
            )
        }
    };

    debug!("login request for {:?}", input.email);

    if let Err(message) = validate_login_input(&input) {
        return (StatusCode::BAD_REQUEST, Json(json!({"message": message})));
    }

    let email = input.email.as_deref().unwrap_or_default();
    let password = input.password.as_deref().unwrap_or_default();

    // The stored credential comes back verbatim; hashing happened upstream
    let stored_password = match get_password(&pool, email).await {
        Ok(stored) => stored,

        Err(sqlx::Error::RowNotFound) => {
            debug!("User not found");

            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"message": "Unauthorized"})),
            );
        }

        Err(e) => {
            error!("Error getting password from database: {:?}", e);

            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"message": "Error getting password"})),
            );
        }
    };

    if stored_password == password {
        debug!("Login successful");

        (StatusCode::OK, Json(json!({"message": "Login successful"})))
    } else {
        debug!("Unauthorized");

        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Unauthorized"})),
        )
    }
}

async fn get_password(pool: &PgPool, email: &str) -> Result<String, sqlx::Error> {
    match sqlx::query("SELECT password FROM users WHERE email = $1")
        .bind(email)
        .fetch_one(pool)
        .await
    {
        Ok(row) => Ok(row.get(0)),
        Err(e) => Err(e),
    }
}
