use axum::extract::State;
use axum::http::StatusCode;

use abi::errors::Error;
use abi::model::{Comment, FeedQuery, NewComment, NewPost, NewReply, Post};
use abi::Reply;

use crate::api_utils::custom_extract::{AuthUser, JsonExtractor, PathExtractor};
use crate::AppState;

pub async fn create_post(
    State(app_state): State<AppState>,
    auth: AuthUser,
    JsonExtractor(new_post): JsonExtractor<NewPost>,
) -> Result<(StatusCode, Reply<Post>), Error> {
    let post = app_state.db.create_post(&auth.user_id, new_post).await?;
    Ok((
        StatusCode::CREATED,
        Reply::with("Post created successfully", post),
    ))
}

/// the body is optional; without one the whole feed is returned
pub async fn get_posts(
    State(app_state): State<AppState>,
    auth: AuthUser,
    query: Option<JsonExtractor<FeedQuery>>,
) -> Result<Reply<Vec<Post>>, Error> {
    let query = query.map(|JsonExtractor(q)| q).unwrap_or_default();
    let posts = app_state
        .db
        .feed(&auth.user_id, query.search.as_deref())
        .await?;
    Ok(Reply::ok(posts))
}

pub async fn get_post(
    State(app_state): State<AppState>,
    _auth: AuthUser,
    PathExtractor(id): PathExtractor<String>,
) -> Result<Reply<Post>, Error> {
    Ok(Reply::ok(app_state.db.get_post(&id).await?))
}

pub async fn get_user_posts(
    State(app_state): State<AppState>,
    _auth: AuthUser,
    PathExtractor(user_id): PathExtractor<String>,
) -> Result<Reply<Vec<Post>>, Error> {
    Ok(Reply::ok(app_state.db.user_posts(&user_id).await?))
}

pub async fn get_comments(
    State(app_state): State<AppState>,
    PathExtractor(post_id): PathExtractor<String>,
) -> Result<Reply<Vec<Comment>>, Error> {
    Ok(Reply::ok(app_state.db.comments(&post_id).await?))
}

pub async fn like_post(
    State(app_state): State<AppState>,
    auth: AuthUser,
    PathExtractor(id): PathExtractor<String>,
) -> Result<Reply<Post>, Error> {
    let post = app_state.db.like_post(&auth.user_id, &id).await?;
    Ok(Reply::ok(post))
}

pub async fn like_comment(
    State(app_state): State<AppState>,
    auth: AuthUser,
    PathExtractor(id): PathExtractor<String>,
) -> Result<Reply<Comment>, Error> {
    let comment = app_state.db.like_comment(&auth.user_id, &id, None).await?;
    Ok(Reply::ok(comment))
}

pub async fn like_reply(
    State(app_state): State<AppState>,
    auth: AuthUser,
    PathExtractor((id, rid)): PathExtractor<(String, String)>,
) -> Result<Reply<Comment>, Error> {
    let comment = app_state
        .db
        .like_comment(&auth.user_id, &id, Some(&rid))
        .await?;
    Ok(Reply::ok(comment))
}

pub async fn comment_post(
    State(app_state): State<AppState>,
    auth: AuthUser,
    PathExtractor(post_id): PathExtractor<String>,
    JsonExtractor(comment): JsonExtractor<NewComment>,
) -> Result<(StatusCode, Reply<Comment>), Error> {
    let comment = app_state
        .db
        .comment_post(&auth.user_id, &post_id, comment)
        .await?;
    Ok((StatusCode::CREATED, Reply::ok(comment)))
}

pub async fn reply_comment(
    State(app_state): State<AppState>,
    auth: AuthUser,
    PathExtractor(comment_id): PathExtractor<String>,
    JsonExtractor(reply): JsonExtractor<NewReply>,
) -> Result<Reply<Comment>, Error> {
    let comment = app_state
        .db
        .reply_comment(&auth.user_id, &comment_id, reply)
        .await?;
    Ok(Reply::ok(comment))
}

pub async fn delete_post(
    State(app_state): State<AppState>,
    auth: AuthUser,
    PathExtractor(id): PathExtractor<String>,
) -> Result<Reply, Error> {
    app_state.db.delete_post(&auth.user_id, &id).await?;
    Ok(Reply::message("Deleted successfully"))
}
