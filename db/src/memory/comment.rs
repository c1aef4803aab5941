use async_trait::async_trait;

use abi::errors::Result;
use abi::model::{Comment, CommentReply};

use crate::memory::{toggle, Table};
use crate::post::CommentRepo;

#[derive(Debug, Default)]
pub struct MemoryComment {
    comments: Table<Comment>,
}

impl MemoryComment {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommentRepo for MemoryComment {
    async fn create_comment(&self, comment: Comment) -> Result<Comment> {
        self.comments.insert(comment.id.clone(), comment.clone());
        Ok(comment)
    }

    async fn get_comment(&self, id: &str) -> Result<Option<Comment>> {
        Ok(self.comments.get(id))
    }

    async fn get_comments(&self, post_id: &str) -> Result<Vec<Comment>> {
        Ok(self.comments.find_newest(|c| c.post_id == post_id))
    }

    async fn set_comment_like(
        &self,
        id: &str,
        user_id: &str,
        liked: bool,
    ) -> Result<Option<Comment>> {
        Ok(self
            .comments
            .update(id, |c| toggle(&mut c.likes, user_id, liked)))
    }

    async fn set_reply_like(
        &self,
        comment_id: &str,
        reply_id: &str,
        user_id: &str,
        liked: bool,
    ) -> Result<Option<Comment>> {
        Ok(self.comments.update(comment_id, |c| {
            if let Some(reply) = c.replies.iter_mut().find(|r| r.id == reply_id) {
                toggle(&mut reply.likes, user_id, liked);
            }
        }))
    }

    async fn push_reply(&self, comment_id: &str, reply: CommentReply) -> Result<Option<Comment>> {
        Ok(self.comments.update(comment_id, |c| c.replies.push(reply)))
    }

    async fn delete_comments(&self, post_id: &str) -> Result<u64> {
        Ok(self.comments.remove_where(|c| c.post_id == post_id))
    }
}
