//! Bearer-token authentication for protected routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::{AppState, error::error_response};
use phortune_core::policy::Viewer;
use phortune_shared::types::UserId;
use phortune_shared::{AppError, Claims, JwtError};

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Validates the bearer token and stores its claims in request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return error_response(&AppError::Unauthorized(
            "Authorization header with Bearer token is required".to_string(),
        ));
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            debug!(error = %e, "Rejected bearer token");
            let message = match e {
                JwtError::Expired => "Token has expired",
                _ => "Invalid or malformed token",
            };
            error_response(&AppError::Unauthorized(message.to_string()))
        }
    }
}

/// Extractor for the authenticated user's claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the user ID from the claims.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        UserId::from_uuid(self.0.user_id())
    }

    /// Returns the IANA timezone name carried by the token, if any.
    #[must_use]
    pub fn timezone(&self) -> Option<&str> {
        self.0.timezone()
    }

    /// Returns the viewer the policy and display layers act for.
    #[must_use]
    pub fn viewer(&self) -> Viewer {
        Viewer::new(self.user_id()).with_timezone_name(self.timezone())
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                error_response(&AppError::Unauthorized(
                    "Authentication required".to_string(),
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use rstest::rstest;
    use uuid::Uuid;

    #[rstest]
    #[case("Bearer abc", Some("abc"))]
    #[case("bearer abc", Some("abc"))]
    #[case("Basic abc", None)]
    #[case("Bearerabc", None)]
    fn test_extract_bearer_token(#[case] header: &str, #[case] expected: Option<&str>) {
        assert_eq!(extract_bearer_token(header), expected);
    }

    #[test]
    fn test_viewer_uses_token_timezone() {
        let id = Uuid::now_v7();
        let auth = AuthUser(Claims::new(
            id,
            Some("Asia/Jakarta"),
            Utc::now() + Duration::minutes(5),
        ));

        let viewer = auth.viewer();
        assert_eq!(viewer.user_id, UserId::from_uuid(id));
        assert_eq!(viewer.timezone, chrono_tz::Asia::Jakarta);
    }

    #[test]
    fn test_viewer_defaults_to_utc() {
        let auth = AuthUser(Claims::new(
            Uuid::now_v7(),
            None,
            Utc::now() + Duration::minutes(5),
        ));
        assert_eq!(auth.viewer().timezone, chrono_tz::UTC);
    }

    #[tokio::test]
    async fn test_extractor_without_claims_is_unauthorized() {
        use http_body_util::BodyExt;

        let (mut parts, ()) = axum::http::Request::builder()
            .body(())
            .unwrap()
            .into_parts();

        let rejection = AuthUser::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();

        assert_eq!(rejection.status(), axum::http::StatusCode::UNAUTHORIZED);
        let body = rejection.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "unauthorized");
        assert_eq!(json["message"], "Authentication required");
    }
}
