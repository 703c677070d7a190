//! Registration endpoint.

use crate::api::auth::password::{hash_password, MIN_PASSWORD_LENGTH};
use crate::api::error::{ApiError, FieldError};
use crate::api::handlers::valid_email;
use crate::store::{models::User, Store};
use axum::{extract::Extension, Json};
use md5::{Digest, Md5};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Register a new user.
///
/// Checks for an existing account before inserting and stops immediately on
/// a duplicate; a second account is never created.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered", body = User),
        (status = 400, description = "Validation failure or account already exists"),
        (status = 500, description = "Store failure"),
    ),
    tag = "users"
)]
pub async fn register(
    Extension(store): Extension<Store>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<User>, ApiError> {
    let errors = validate(&payload);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    if store.user_by_email(&payload.email).await?.is_some() {
        return Err(ApiError::Validation(vec![FieldError::message(
            "User already exists",
        )]));
    }

    let avatar = gravatar_url(&payload.email);
    let hashed = hash_password(&payload.password).await?;

    let user = store
        .insert_user(&payload.name, &payload.email, &avatar, &hashed)
        .await?;

    Ok(Json(user))
}

fn validate(payload: &RegisterRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if payload.name.trim().is_empty() {
        errors.push(FieldError::new("Name is required", "name"));
    }
    if !valid_email(&payload.email) {
        errors.push(FieldError::new("Please enter a valid email", "email"));
    }
    if payload.password.len() < MIN_PASSWORD_LENGTH {
        errors.push(FieldError::new(
            "Please enter a password with 6 or more characters",
            "password",
        ));
    }

    errors
}

/// Gravatar URL derived from the email: 200px, PG-rated, identicon fallback.
fn gravatar_url(email: &str) -> String {
    let digest = Md5::digest(email.trim().to_lowercase().as_bytes());

    format!("https://www.gravatar.com/avatar/{digest:x}?s=200&r=pg&d=mm")
}
