//! Authentication: token issue/verify, password hashing, and the
//! authenticated-identity extractor used by private routes.

pub(crate) mod password;
pub(crate) mod token;

pub use token::TokenKeys;

use crate::api::error::ApiError;
use anyhow::anyhow;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::debug;
use uuid::Uuid;

/// Request header carrying the signed token.
pub const AUTH_HEADER: &str = "x-auth-token";

/// Identity decoded from the request credential.
///
/// Extracting this from a request is what makes a route private: a missing
/// header rejects with 401, and so does a token that fails verification or
/// has expired.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: Uuid,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let keys = parts
            .extensions
            .get::<TokenKeys>()
            .cloned()
            .ok_or_else(|| ApiError::Internal(anyhow!("Token keys extension not configured")))?;

        let header = parts.headers.get(AUTH_HEADER).ok_or(ApiError::MissingToken)?;
        let token = header.to_str().map_err(|_| ApiError::InvalidToken)?;

        let claims = keys.verify(token).map_err(|err| {
            debug!("Rejected token: {err}");
            ApiError::InvalidToken
        })?;

        Ok(Self {
            id: claims.user.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use secrecy::SecretString;

    fn keys() -> TokenKeys {
        TokenKeys::new(&SecretString::from("sekrit".to_string()))
    }

    async fn extract(request: Request<Body>) -> Result<AuthUser, ApiError> {
        let (mut parts, _) = request.into_parts();
        AuthUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_valid_token_attaches_identity() {
        let keys = keys();
        let user_id = Uuid::new_v4();
        let token = keys.issue(user_id).unwrap();

        let mut request = Request::builder()
            .header(AUTH_HEADER, token)
            .body(Body::empty())
            .unwrap();
        request.extensions_mut().insert(keys);

        let user = extract(request).await.unwrap();
        assert_eq!(user.id, user_id);
    }

    #[tokio::test]
    async fn test_missing_header_is_rejected() {
        let mut request = Request::builder().body(Body::empty()).unwrap();
        request.extensions_mut().insert(keys());

        assert!(matches!(
            extract(request).await,
            Err(ApiError::MissingToken)
        ));
    }

    #[tokio::test]
    async fn test_invalid_token_is_rejected() {
        let mut request = Request::builder()
            .header(AUTH_HEADER, "bogus")
            .body(Body::empty())
            .unwrap();
        request.extensions_mut().insert(keys());

        assert!(matches!(
            extract(request).await,
            Err(ApiError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret_is_rejected() {
        let other = TokenKeys::new(&SecretString::from("other".to_string()));
        let token = other.issue(Uuid::new_v4()).unwrap();

        let mut request = Request::builder()
            .header(AUTH_HEADER, token)
            .body(Body::empty())
            .unwrap();
        request.extensions_mut().insert(keys());

        assert!(matches!(
            extract(request).await,
            Err(ApiError::InvalidToken)
        ));
    }
}
