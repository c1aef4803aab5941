use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Redirect, Response};
use serde::Serialize;
use tracing::debug;
use url::Url;

use abi::errors::Error;
use abi::model::{ChangePassword, ResetEmail, ResetRequest, TokenCheck, ValidateReset};

use crate::api_utils::custom_extract::{JsonExtractor, PathExtractor, QueryExtractor};
use crate::AppState;

#[derive(Serialize, Debug)]
pub struct ResetPending {
    pub success: bool,
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Serialize, Debug)]
pub struct ResetValidity {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

#[derive(Serialize, Debug)]
pub struct PasswordChanged {
    pub success: bool,
    pub ok: bool,
    pub message: &'static str,
}

/// `{client_url}/{page}?key=value&...`
fn client_redirect(
    app_state: &AppState,
    page: &str,
    params: &[(&str, &str)],
) -> Result<Redirect, Error> {
    let url = Url::parse_with_params(&format!("{}/{}", app_state.client_url, page), params)
        .map_err(|e| Error::internal_with_details(e.to_string()))?;
    Ok(Redirect::to(url.as_str()))
}

/// target of the link in the verification mail
pub async fn verify_email(
    State(app_state): State<AppState>,
    PathExtractor((user_id, token)): PathExtractor<(String, String)>,
) -> Result<Redirect, Error> {
    let outcome = app_state.db.verify_email(&user_id, &token).await?;
    debug!("verify email for {}: {:?}", user_id, outcome);
    let status = if outcome.is_success() { "success" } else { "error" };
    client_redirect(
        &app_state,
        "verify-email",
        &[("status", status), ("message", outcome.message())],
    )
}

pub async fn request_password_reset(
    State(app_state): State<AppState>,
    JsonExtractor(req): JsonExtractor<ResetEmail>,
) -> Result<(StatusCode, Json<ResetPending>), Error> {
    let email = req.email.trim().to_lowercase();
    let message = match app_state.db.request_password_reset(&email).await? {
        ResetRequest::AlreadySent => "Reset password link has already been sent to your email.",
        ResetRequest::Issued { user_id, token } => {
            let link = format!(
                "{}/users/reset-password/{}/{}",
                app_state.public_url, user_id, token
            );
            app_state.mailer.send_password_reset(&email, &link).await?;
            "Reset Password Link has been sent to your account."
        }
    };
    Ok((
        StatusCode::CREATED,
        Json(ResetPending {
            success: true,
            status: "PENDING",
            message,
        }),
    ))
}

/// target of the link in the reset mail; hands a valid token on to the client's form
pub async fn reset_password(
    State(app_state): State<AppState>,
    PathExtractor((user_id, token)): PathExtractor<(String, String)>,
) -> Result<Redirect, Error> {
    let message = match app_state.db.check_reset_link(&user_id, &token).await? {
        TokenCheck::Valid(_) => {
            return client_redirect(
                &app_state,
                "new-password",
                &[("uid", user_id.as_str()), ("token", token.as_str())],
            );
        }
        TokenCheck::Missing => "Invalid password reset link. Try again",
        TokenCheck::Expired => "Reset Password link has expired. Please try again",
        TokenCheck::Mismatch => "Invalid reset password link. Please try again",
    };
    client_redirect(
        &app_state,
        "new-password",
        &[("status", "error"), ("message", message)],
    )
}

pub async fn validate_reset(
    State(app_state): State<AppState>,
    QueryExtractor(query): QueryExtractor<ValidateReset>,
) -> Result<Response, Error> {
    let invalid = |message| {
        (
            StatusCode::BAD_REQUEST,
            Json(ResetValidity {
                valid: false,
                message: Some(message),
            }),
        )
            .into_response()
    };

    let (Some(uid), Some(token)) = (
        query.uid.filter(|v| !v.is_empty()),
        query.token.filter(|v| !v.is_empty()),
    ) else {
        return Ok(invalid("missing_params"));
    };

    Ok(match app_state.db.check_reset_token(&uid, &token).await? {
        TokenCheck::Valid(_) => Json(ResetValidity {
            valid: true,
            message: None,
        })
        .into_response(),
        TokenCheck::Expired => invalid("expired"),
        TokenCheck::Missing | TokenCheck::Mismatch => invalid("invalid_token"),
    })
}

pub async fn change_password(
    State(app_state): State<AppState>,
    JsonExtractor(req): JsonExtractor<ChangePassword>,
) -> Result<Json<PasswordChanged>, Error> {
    let (Some(uid), Some(token), Some(password)) = (
        req.uid.filter(|v| !v.is_empty()),
        req.token.filter(|v| !v.is_empty()),
        req.password.filter(|v| !v.is_empty()),
    ) else {
        return Err(Error::bad_request("uid, token and password are required"));
    };

    match app_state.db.change_password(&uid, &token, &password).await? {
        TokenCheck::Valid(_) => Ok(Json(PasswordChanged {
            success: true,
            ok: true,
            message: "Password updated successfully",
        })),
        TokenCheck::Expired => Err(Error::bad_request("Token expired")),
        TokenCheck::Missing | TokenCheck::Mismatch => {
            Err(Error::bad_request("Invalid or expired token"))
        }
    }
}

