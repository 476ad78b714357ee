use crate::biogate::validate::{validate_register_input, RegisterInput};
use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use sqlx::{PgPool, Row};
use tracing::{debug, error, instrument};
use uuid::Uuid;

#[utoipa::path(
    post,
    path= "/api/user/register",
    request_body = RegisterInput,
    responses (
        (status = 201, description = "Registration successful"),
        (status = 400, description = "Payload failed validation"),
        (status = 409, description = "User with the specified email already exists"),
    ),
    tag= "register"
)]
#[instrument(skip_all)]
pub async fn register(
    pool: Extension<PgPool>,
    payload: Option<Json<RegisterInput>>,
) -> impl IntoResponse {
    let input: RegisterInput = match payload {
        Some(Json(payload)) => payload,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"message": "Missing payload"})),
            )
        }
    };

    debug!("register request for {:?}", input.email);

    // Validation runs before any persistence call
    if let Err(message) = validate_register_input(&input) {
        return (StatusCode::BAD_REQUEST, Json(json!({"message": message})));
    }

    let email = input.email.as_deref().unwrap_or_default();

    // check if user exists
    match user_exists(&pool, email).await {
        Ok(true) => {
            error!("User already exists");
            return (
                StatusCode::CONFLICT,
                Json(json!({"message": "User already exists"})),
            );
        }
        Ok(false) => (),
        Err(e) => {
            error!("Error checking if user exists: {:?}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"message": "Error checking if user exists"})),
            );
        }
    }

    // insert user into database; hashing and biometric template handling are
    // the user store's concern
    match sqlx::query(
        "INSERT INTO users (name, email, phone, dob, password, face_data, fingerprint_data) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
    )
    .bind(input.name.as_deref().unwrap_or_default())
    .bind(email)
    .bind(input.phone.as_deref().unwrap_or_default())
    .bind(dob_text(&input.dob))
    .bind(input.password.as_deref().unwrap_or_default())
    .bind(input.face_data.as_deref().unwrap_or_default())
    .bind(input.fingerprint_data.as_deref().unwrap_or_default())
    .fetch_one(&*pool)
    .await
    {
        Ok(row) => {
            let id: Uuid = row.get("id");

            (
                StatusCode::CREATED,
                Json(json!({"message": "User registered", "id": id.to_string()})),
            )
        }
        Err(e) => {
            error!("Error inserting user: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"message": "Error inserting user"})),
            )
        }
    }
}

// dob arrives as a string or a number; the column is text
fn dob_text(dob: &Option<Value>) -> String {
    match dob {
        Some(Value::String(value)) => value.clone(),
        Some(value) => value.to_string(),
        None => String::new(),
    }
}

async fn user_exists(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
    match sqlx::query("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1) AS exists")
        .bind(email)
        .fetch_one(pool)
        .await
    {
        Ok(row) => Ok(row.get("exists")),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dob_text_keeps_strings_verbatim() {
        assert_eq!(dob_text(&Some(json!("2000-01-01"))), "2000-01-01");
    }

    #[test]
    fn dob_text_renders_numbers() {
        assert_eq!(dob_text(&Some(json!(19991231))), "19991231");
    }
}
