use axum::extract::State;
use axum::http::StatusCode;

use abi::errors::Error;
use abi::model::{
    FriendRequest, FriendRequestWithUser, ResolveFriendRequest, SendFriendRequest, Unfriend,
};
use abi::Reply;

use crate::api_utils::custom_extract::{AuthUser, JsonExtractor};
use crate::AppState;

pub async fn send_friend_request(
    State(app_state): State<AppState>,
    auth: AuthUser,
    JsonExtractor(req): JsonExtractor<SendFriendRequest>,
) -> Result<(StatusCode, Reply<FriendRequest>), Error> {
    let fr = app_state
        .db
        .send_friend_request(&auth.user_id, &req.request_to)
        .await?;
    Ok((
        StatusCode::CREATED,
        Reply::with("Friend Request sent successfully", fr),
    ))
}

pub async fn get_friend_requests(
    State(app_state): State<AppState>,
    auth: AuthUser,
) -> Result<Reply<Vec<FriendRequestWithUser>>, Error> {
    Ok(Reply::ok(
        app_state.db.pending_requests(&auth.user_id).await?,
    ))
}

/// accept or deny, `status` is `Accepted` or `Denied`
pub async fn accept_request(
    State(app_state): State<AppState>,
    auth: AuthUser,
    JsonExtractor(req): JsonExtractor<ResolveFriendRequest>,
) -> Result<Reply, Error> {
    let fr = app_state
        .db
        .resolve_friend_request(&auth.user_id, &req.rid, &req.status)
        .await?;
    Ok(Reply::message(format!(
        "Friend Request {}",
        fr.request_status
    )))
}

pub async fn unfriend(
    State(app_state): State<AppState>,
    auth: AuthUser,
    JsonExtractor(req): JsonExtractor<Unfriend>,
) -> Result<Reply, Error> {
    app_state.db.unfriend(&auth.user_id, &req.friend_id).await?;
    Ok(Reply::message("Unfriended successfully"))
}
