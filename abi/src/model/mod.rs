pub mod friend_request;
pub mod post;
pub mod token;
pub mod user;

pub use friend_request::*;
pub use post::*;
pub use token::*;
pub use user::*;

/// milliseconds since the unix epoch
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
