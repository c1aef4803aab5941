use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use abi::errors::Error;
use abi::model::{UserBrief, UserInfo, UserUpdate};
use abi::Reply;

use crate::api_utils::custom_extract::{AuthUser, JsonExtractor, PathExtractor};
use crate::handlers::users::{gen_token, UserWithToken};
use crate::AppState;

#[derive(Deserialize, Debug)]
pub struct ProfileView {
    pub id: String,
}

/// the caller's own profile
pub async fn get_me(
    State(app_state): State<AppState>,
    auth: AuthUser,
) -> Result<Reply<UserInfo>, Error> {
    Ok(Reply::ok(app_state.db.get_user(&auth.user_id).await?))
}

pub async fn get_user_by_id(
    State(app_state): State<AppState>,
    _auth: AuthUser,
    PathExtractor(id): PathExtractor<String>,
) -> Result<Reply<UserInfo>, Error> {
    Ok(Reply::ok(app_state.db.get_user(&id).await?))
}

pub async fn update_user(
    State(app_state): State<AppState>,
    auth: AuthUser,
    JsonExtractor(update): JsonExtractor<UserUpdate>,
) -> Result<Reply<UserWithToken>, Error> {
    let user = app_state.db.update_user(&auth.user_id, update).await?;
    let token = gen_token(&app_state.jwt_secret, &user.id)?;
    Ok(Reply::with(
        "User updated successfully",
        UserWithToken { user, token },
    ))
}

pub async fn profile_view(
    State(app_state): State<AppState>,
    auth: AuthUser,
    JsonExtractor(view): JsonExtractor<ProfileView>,
) -> Result<(StatusCode, Reply), Error> {
    app_state.db.profile_view(&auth.user_id, &view.id).await?;
    Ok((StatusCode::CREATED, Reply::message("Successfully")))
}

pub async fn suggested_friends(
    State(app_state): State<AppState>,
    auth: AuthUser,
) -> Result<Reply<Vec<UserBrief>>, Error> {
    Ok(Reply::ok(
        app_state.db.suggested_friends(&auth.user_id).await?,
    ))
}
