mod auth;
mod json_extractor;
mod path_extractor;
mod query_extractor;

pub use auth::AuthUser;
pub use json_extractor::JsonExtractor;
pub use path_extractor::PathExtractor;
pub use query_extractor::QueryExtractor;
