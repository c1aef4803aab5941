use std::fmt::Debug;

use async_trait::async_trait;

use abi::errors::Result;
use abi::model::{Comment, CommentReply, Post};

#[async_trait]
pub trait PostRepo: Sync + Send + Debug {
    async fn create_post(&self, post: Post) -> Result<Post>;

    async fn get_post(&self, id: &str) -> Result<Option<Post>>;

    /// all posts, newest first; `search` is a case-insensitive substring of the description
    async fn get_posts(&self, search: Option<&str>) -> Result<Vec<Post>>;

    /// posts by one author, newest first
    async fn get_posts_by_user(&self, user_id: &str) -> Result<Vec<Post>>;

    /// add or remove `user_id` from the likes, returns the updated post
    async fn set_post_like(&self, id: &str, user_id: &str, liked: bool) -> Result<Option<Post>>;

    async fn push_comment(&self, post_id: &str, comment_id: &str) -> Result<()>;

    async fn delete_post(&self, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait CommentRepo: Sync + Send + Debug {
    async fn create_comment(&self, comment: Comment) -> Result<Comment>;

    async fn get_comment(&self, id: &str) -> Result<Option<Comment>>;

    /// comments of a post, newest first
    async fn get_comments(&self, post_id: &str) -> Result<Vec<Comment>>;

    async fn set_comment_like(
        &self,
        id: &str,
        user_id: &str,
        liked: bool,
    ) -> Result<Option<Comment>>;

    async fn set_reply_like(
        &self,
        comment_id: &str,
        reply_id: &str,
        user_id: &str,
        liked: bool,
    ) -> Result<Option<Comment>>;

    async fn push_reply(&self, comment_id: &str, reply: CommentReply) -> Result<Option<Comment>>;

    /// remove every comment of the post, returns how many went
    async fn delete_comments(&self, post_id: &str) -> Result<u64>;
}
