use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use base64::{Engine, engine::general_purpose::STANDARD};
use tracing::{info, warn};

use crate::datalayer::CRUD::helper::password::check_password;
use crate::errors::{ServiceError, ServiceResult};
use crate::state::AppState;

/// Credentials carried by an `Authorization: Basic` header.
///
/// `Ok(None)` means the request carries no Basic credentials at all, which is
/// reported differently from a header that is present but unusable.
pub fn parse_basic_credentials(headers: &HeaderMap) -> ServiceResult<Option<(String, String)>> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| ServiceError::InvalidCredentials)?;

    let mut parts = value.splitn(2, ' ');
    let scheme = parts.next().unwrap_or_default();
    if !scheme.eq_ignore_ascii_case("basic") {
        return Ok(None);
    }

    let encoded = parts.next().map(str::trim).unwrap_or_default();
    if encoded.is_empty() {
        return Err(ServiceError::InvalidCredentials);
    }

    let decoded = STANDARD
        .decode(encoded)
        .map_err(|_| ServiceError::InvalidCredentials)?;
    let decoded = String::from_utf8(decoded).map_err(|_| ServiceError::InvalidCredentials)?;

    match decoded.split_once(':') {
        Some((username, password)) => Ok(Some((username.to_string(), password.to_string()))),
        None => Err(ServiceError::InvalidCredentials),
    }
}

/// HTTP Basic authentication middleware
/// Verifies the credentials against the user store and rejects the request
/// with 401 unless they belong to an active user
pub async fn basic_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    let (username, password) = match parse_basic_credentials(request.headers()) {
        Ok(Some(credentials)) => credentials,
        Ok(None) => {
            warn!(path = %request.uri().path(), "Missing Basic credentials");
            return Err(ServiceError::MissingCredentials);
        }
        Err(e) => {
            warn!(path = %request.uri().path(), "Malformed Basic authorization header");
            return Err(e);
        }
    };

    let user = match state.users.find_by_username(&username).await? {
        // Argon2 verification is CPU bound
        Some(user) => {
            let encoded = user.password.clone();
            let verified = tokio::task::spawn_blocking(move || check_password(&password, &encoded))
                .await
                .map_err(|e| ServiceError::InternalServerError(e.to_string()))?;
            verified.then_some(user)
        }
        None => None,
    }
    .ok_or_else(|| {
        warn!(username = %username, "Basic authentication failed");
        ServiceError::InvalidCredentials
    })?;

    if !user.is_active {
        warn!(username = %username, "Inactive user attempted to authenticate");
        return Err(ServiceError::InactiveUser);
    }

    info!(user_id = user.id, username = %user.username, "User authenticated");

    Ok(next.run(request).await)
}
