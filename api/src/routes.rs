use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::handlers::friends::{accept_request, get_friend_requests, send_friend_request, unfriend};
use crate::handlers::posts::{
    comment_post, create_post, delete_post, get_comments, get_post, get_posts, get_user_posts,
    like_comment, like_post, like_reply, reply_comment,
};
use crate::handlers::users::{
    change_password, get_me, get_user_by_id, login, profile_view, register,
    request_password_reset, reset_password, suggested_friends, update_user, validate_reset,
    verify_email,
};
use crate::AppState;

pub fn app_routes(state: AppState) -> Router {
    let cors = cors(&state.client_url);
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/users", user_routes())
        .merge(post_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors(client_url: &str) -> CorsLayer {
    let origin = match HeaderValue::from_str(client_url) {
        Ok(origin) => AllowOrigin::exact(origin),
        Err(e) => {
            warn!("invalid client url {}: {}, allowing any origin", client_url, e);
            AllowOrigin::any()
        }
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        // mail links and the reset form
        .route("/verify/:user_id/:token", get(verify_email))
        .route("/request-passwordreset", post(request_password_reset))
        .route("/reset-password/:user_id/:token", get(reset_password))
        .route("/validate-reset", get(validate_reset))
        .route("/reset-password", post(change_password))
        // profile
        .route("/get-user", post(get_me))
        .route("/get-user/:id", post(get_user_by_id))
        .route("/update-user", put(update_user))
        .route("/profile-view", post(profile_view))
        // friendship
        .route("/friend-request", post(send_friend_request))
        .route("/get-friend-request", post(get_friend_requests))
        .route("/accept-request", post(accept_request))
        .route("/unfriend", post(unfriend))
        .route("/suggested-friends", post(suggested_friends))
}

fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", post(get_posts))
        .route("/posts/create-post", post(create_post))
        .route("/posts/get-user-post/:id", post(get_user_posts))
        .route("/posts/comments/:post_id", get(get_comments))
        .route("/posts/like/:id", post(like_post))
        .route("/posts/like-comment/:id", post(like_comment))
        .route("/posts/like-comment/:id/:rid", post(like_reply))
        .route("/posts/comment/:id", post(comment_post))
        .route("/posts/reply-comment/:id", post(reply_comment))
        .route("/posts/:id", post(get_post).delete(delete_post))
}
