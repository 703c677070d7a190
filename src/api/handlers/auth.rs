//! Login and identity-echo endpoints.

use crate::api::auth::password::verify_password;
use crate::api::auth::{AuthUser, TokenKeys};
use crate::api::error::{ApiError, FieldError};
use crate::api::handlers::valid_email;
use crate::store::{models::User, Store};
use anyhow::{anyhow, Context};
use axum::{extract::Extension, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Authenticate and issue a token.
///
/// Unknown email and wrong password produce the same response, so callers
/// cannot probe which addresses have accounts.
#[utoipa::path(
    post,
    path = "/api/auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed token", body = TokenResponse),
        (status = 400, description = "Validation failure or invalid credentials"),
        (status = 500, description = "Store or signing failure"),
    ),
    tag = "auth"
)]
pub async fn login(
    Extension(store): Extension<Store>,
    Extension(keys): Extension<TokenKeys>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let errors = validate(&payload);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let Some(user) = store.user_by_email(&payload.email).await? else {
        return Err(ApiError::InvalidCredentials);
    };

    if !verify_password(&payload.password, &user.password).await? {
        return Err(ApiError::InvalidCredentials);
    }

    let token = keys.issue(user.id).context("Failed to sign token")?;

    Ok(Json(TokenResponse { token }))
}

/// Return the authenticated user, password hash excluded.
#[utoipa::path(
    get,
    path = "/api/auth",
    responses(
        (status = 200, description = "Authenticated user", body = User),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Store failure"),
    ),
    tag = "auth"
)]
pub async fn me(
    user: AuthUser,
    Extension(store): Extension<Store>,
) -> Result<Json<User>, ApiError> {
    // A validly authenticated identity is expected to resolve
    let record = store
        .user_by_id(user.id)
        .await?
        .ok_or_else(|| anyhow!("Authenticated user {} not found", user.id))?;

    Ok(Json(record))
}

fn validate(payload: &LoginRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if !valid_email(&payload.email) {
        errors.push(FieldError::new("Please enter a valid email", "email"));
    }
    if payload.password.is_empty() {
        errors.push(FieldError::new("Password is required", "password"));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_credentials() {
        let payload = LoginRequest {
            email: "a@x.com".to_string(),
            password: "secret1".to_string(),
        };

        assert!(validate(&payload).is_empty());
    }

    #[test]
    fn test_validate_requires_both_fields() {
        let errors = validate(&LoginRequest::default());

        let params: Vec<_> = errors.iter().filter_map(|e| e.param).collect();
        assert_eq!(params, vec!["email", "password"]);
    }

    #[test]
    fn test_validate_rejects_malformed_email() {
        let payload = LoginRequest {
            email: "not-an-email".to_string(),
            password: "secret1".to_string(),
        };
        let errors = validate(&payload);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].param, Some("email"));
    }
}
