use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use newsportal_auth::{AccessClaims, AuthError};
use newsportal_core::AppError;
use newsportal_models::Role;

use crate::state::AppState;

/// Extractor that validates the bearer token and provides the caller's claims.
///
/// When [`require_auth`] or a role middleware already ran for this request the
/// claims are taken from the request extensions instead of validating twice.
#[derive(Debug, Clone)]
pub struct AuthUser(pub AccessClaims);

impl AuthUser {
    pub fn user_id(&self) -> i64 {
        self.0.user_id
    }

    pub fn username(&self) -> &str {
        &self.0.username
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }

    pub fn role(&self) -> Role {
        self.0.role
    }

    pub fn is_admin(&self) -> bool {
        self.0.role.is_admin()
    }
}

/// The raw token from an `Authorization: Bearer <token>` header.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

/// Pulls the token out of the `Authorization` header.
///
/// A missing or non-ASCII header is [`AuthError::MissingToken`]; any scheme
/// other than `Bearer` is [`AuthError::MalformedHeader`].
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MalformedHeader)
}

pub(crate) async fn authenticate_parts(
    parts: &Parts,
    state: &AppState,
) -> Result<(BearerToken, AuthUser), AppError> {
    let token = bearer_token(&parts.headers)?;
    let claims = state.sessions.authenticate(token).await?;
    Ok((BearerToken(token.to_string()), AuthUser(claims)))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(auth_user) = parts.extensions.get::<AuthUser>() {
            return Ok(auth_user.clone());
        }

        let (token, auth_user) = authenticate_parts(parts, state).await?;
        parts.extensions.insert(token);
        parts.extensions.insert(auth_user.clone());
        Ok(auth_user)
    }
}

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(token) = parts.extensions.get::<BearerToken>() {
            return Ok(token.clone());
        }

        let token = bearer_token(&parts.headers)?;
        Ok(BearerToken(token.to_string()))
    }
}

/// Middleware that rejects requests without a valid access token.
///
/// ```rust,ignore
/// let protected = Router::new()
///     .route("/profile", get(get_profile))
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));
/// ```
pub async fn require_auth(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let (token, auth_user) = authenticate_parts(&parts, &state).await?;
    parts.extensions.insert(token);
    parts.extensions.insert(auth_user);

    Ok(next.run(Request::from_parts(parts, body)).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extracts_token() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_bearer_token_missing_header() {
        assert!(matches!(
            bearer_token(&HeaderMap::new()),
            Err(AuthError::MissingToken)
        ));
    }

    #[test]
    fn test_bearer_token_wrong_scheme() {
        for value in ["Basic dXNlcjpwYXNz", "bearer abc", "Token abc"] {
            assert!(matches!(
                bearer_token(&headers_with(value)),
                Err(AuthError::MalformedHeader)
            ));
        }
    }
}
