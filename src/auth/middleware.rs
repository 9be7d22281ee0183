//! Authentication middleware and extractors

use crate::api::SharedState;
use crate::auth::{AuthUser, TokenService};
use crate::error::{Error, Result};
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

/// Pull the bearer token out of the Authorization header
pub fn bearer_token(headers: &HeaderMap) -> Result<&str> {
    let value = headers.get(AUTHORIZATION).ok_or(Error::MissingToken)?;
    let value = value
        .to_str()
        .map_err(|_| Error::InvalidToken("Authorization header is not valid text".to_string()))?;

    let (scheme, token) = value
        .split_once(' ')
        .ok_or_else(|| Error::InvalidToken("expected 'Bearer <token>'".to_string()))?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(Error::InvalidToken("expected 'Bearer <token>'".to_string()));
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(Error::MissingToken);
    }
    Ok(token)
}

/// Resolve the caller's identity from request headers
pub fn authenticate(tokens: &TokenService, headers: &HeaderMap) -> Result<AuthUser> {
    let token = bearer_token(headers)?;
    let user_id = tokens.verify(token)?;
    Ok(AuthUser { user_id })
}

/// Middleware for requiring authentication.
///
/// On success the request carries an [`AuthUser`] extension for the handler.
pub async fn require_auth(
    State(state): State<SharedState>,
    mut req: Request,
    next: Next,
) -> std::result::Result<Response, Error> {
    let user = match authenticate(&state.tokens, req.headers()) {
        Ok(user) => user,
        Err(e) => {
            tracing::debug!("Rejected {} {}: {}", req.method(), req.uri().path(), e);
            return Err(e);
        }
    };
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use std::time::Duration;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_user_no_token() {
        let headers = HeaderMap::new();
        let result = bearer_token(&headers);
        assert!(matches!(result, Err(Error::MissingToken)));
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
        assert_eq!(bearer_token(&headers("bearer abc")).unwrap(), "abc");
        assert!(matches!(bearer_token(&headers("Basic dXNlcjpwdw==")), Err(Error::InvalidToken(_))));
        assert!(matches!(bearer_token(&headers("Bearer")), Err(Error::InvalidToken(_))));
        assert!(matches!(bearer_token(&headers("Bearer   ")), Err(Error::MissingToken)));
    }

    #[test]
    fn test_authenticate_round_trip() {
        let tokens = TokenService::new(Some("secret"), Some(Duration::from_secs(60)));
        let token = tokens.issue(9).unwrap();
        let user = authenticate(&tokens, &headers(&format!("Bearer {}", token))).unwrap();
        assert_eq!(user, AuthUser { user_id: 9 });
    }

    #[test]
    fn test_authenticate_rejects_garbage() {
        let tokens = TokenService::new(Some("secret"), None);
        let result = authenticate(&tokens, &headers("Bearer not-a-jwt"));
        assert!(matches!(result, Err(Error::InvalidToken(_))));
    }
}
