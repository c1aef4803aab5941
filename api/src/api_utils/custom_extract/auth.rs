use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::{async_trait, http::StatusCode};
use jsonwebtoken::{decode, DecodingKey, Validation};
use tracing::debug;

use abi::errors::Error;

use crate::handlers::users::Claims;
use crate::AppState;

const BEARER: &str = "Bearer ";

/// the caller, as identified by the bearer token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

fn unauthorized() -> (StatusCode, Error) {
    (
        StatusCode::UNAUTHORIZED,
        Error::unauthorized_with_details("Authentication failed"),
    )
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = (StatusCode, Error);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|header| header.to_str().ok())
            .and_then(|header| header.strip_prefix(BEARER))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(unauthorized)?;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(app_state.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|err| {
            debug!("reject bearer token: {}", err);
            unauthorized()
        })?;

        Ok(Self {
            user_id: data.claims.sub,
        })
    }
}
