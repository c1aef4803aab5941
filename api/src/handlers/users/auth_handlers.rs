use axum::extract::State;
use axum::http::StatusCode;
use tracing::debug;

use abi::errors::Error;
use abi::model::{UserInfo, UserRegister};
use abi::Reply;

use crate::api_utils::custom_extract::JsonExtractor;
use crate::handlers::users::{gen_token, LoginRequest, UserWithToken};
use crate::AppState;

/// register new user and mail the verification link
pub async fn register(
    State(app_state): State<AppState>,
    JsonExtractor(new_user): JsonExtractor<UserRegister>,
) -> Result<(StatusCode, Reply<UserInfo>), Error> {
    let (user, token) = app_state.db.register(new_user).await?;

    let link = format!("{}/users/verify/{}/{}", app_state.public_url, user.id, token);
    app_state
        .mailer
        .send_verification(&user.email, &user.first_name, &link)
        .await?;
    debug!("verification link sent to {}", user.email);

    Ok((
        StatusCode::CREATED,
        Reply::with(
            "Verification email has been sent to your account. Check your email for further instructions.",
            UserInfo::new(user, Vec::new()),
        ),
    ))
}

pub async fn login(
    State(app_state): State<AppState>,
    JsonExtractor(login): JsonExtractor<LoginRequest>,
) -> Result<Reply<UserWithToken>, Error> {
    let user = app_state.db.login(&login.email, &login.password).await?;
    let token = gen_token(&app_state.jwt_secret, &user.id)?;
    let user = app_state.db.get_user(&user.id).await?;
    Ok(Reply::with("Login successfully", UserWithToken { user, token }))
}
