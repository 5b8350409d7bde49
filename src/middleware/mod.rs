use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
};
use base64::{Engine as _, engine::general_purpose};
use std::sync::Arc;

use crate::models::Role;
use crate::store::ReservationStore;
use crate::AppState;

/// Authenticated caller, resolved from HTTP Basic credentials.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub username: String,
    pub role: Role,
}

impl AuthUser {
    pub fn require_role(&self, role: Role) -> Result<(), StatusCode> {
        if self.role == role {
            Ok(())
        } else {
            tracing::debug!("{} with role {} denied, {} required", self.username, self.role, role);
            Err(StatusCode::FORBIDDEN)
        }
    }
}

/// Splits an `Authorization: Basic ...` header value into username and password.
pub fn parse_basic_credentials(header_value: &str) -> Option<(String, String)> {
    let encoded = header_value.strip_prefix("Basic ")?;
    let decoded = general_purpose::STANDARD.decode(encoded.trim()).ok()?;
    let credentials = String::from_utf8(decoded).ok()?;
    let (username, password) = credentials.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

impl<S: ReservationStore + 'static> FromRequestParts<Arc<AppState<S>>> for AuthUser {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState<S>>,
    ) -> Result<Self, Self::Rejection> {
        let (username, password) = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_basic_credentials)
            .ok_or(StatusCode::UNAUTHORIZED)?;

        let user = state
            .engine
            .find_user(&username)
            .await
            .map_err(|e| {
                tracing::error!("auth lookup for {} failed: {:?}", username, e);
                StatusCode::INTERNAL_SERVER_ERROR
            })?
            .ok_or(StatusCode::UNAUTHORIZED)?;

        if !user.verify_password(&password) {
            return Err(StatusCode::UNAUTHORIZED);
        }

        Ok(AuthUser {
            username: user.username,
            role: user.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic(raw: &str) -> String {
        format!("Basic {}", general_purpose::STANDARD.encode(raw))
    }

    #[test]
    fn reads_username_and_password() {
        assert_eq!(
            parse_basic_credentials(&basic("filip@kino.pl:pop:corn")),
            Some(("filip@kino.pl".to_string(), "pop:corn".to_string()))
        );
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        assert_eq!(parse_basic_credentials("Bearer abc"), None);
        assert_eq!(parse_basic_credentials("Basic !!!"), None);
        assert_eq!(parse_basic_credentials(&basic("no-colon")), None);
    }

    #[test]
    fn role_gate() {
        let client = AuthUser { username: "a".into(), role: Role::Client };
        assert_eq!(client.require_role(Role::Client), Ok(()));
        assert_eq!(client.require_role(Role::Employee), Err(StatusCode::FORBIDDEN));
    }
}
