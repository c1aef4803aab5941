use async_trait::async_trait;

use abi::errors::Result;
use abi::model::Post;

use crate::memory::{toggle, Table};
use crate::post::PostRepo;

#[derive(Debug, Default)]
pub struct MemoryPost {
    posts: Table<Post>,
}

impl MemoryPost {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepo for MemoryPost {
    async fn create_post(&self, post: Post) -> Result<Post> {
        self.posts.insert(post.id.clone(), post.clone());
        Ok(post)
    }

    async fn get_post(&self, id: &str) -> Result<Option<Post>> {
        Ok(self.posts.get(id))
    }

    async fn get_posts(&self, search: Option<&str>) -> Result<Vec<Post>> {
        let pattern = search.map(str::to_lowercase).unwrap_or_default();
        Ok(self
            .posts
            .find_newest(|post| post.description.to_lowercase().contains(&pattern)))
    }

    async fn get_posts_by_user(&self, user_id: &str) -> Result<Vec<Post>> {
        Ok(self.posts.find_newest(|post| post.user_id == user_id))
    }

    async fn set_post_like(&self, id: &str, user_id: &str, liked: bool) -> Result<Option<Post>> {
        Ok(self
            .posts
            .update(id, |post| toggle(&mut post.likes, user_id, liked)))
    }

    async fn push_comment(&self, post_id: &str, comment_id: &str) -> Result<()> {
        self.posts
            .update(post_id, |post| post.comments.push(comment_id.to_string()));
        Ok(())
    }

    async fn delete_post(&self, id: &str) -> Result<bool> {
        Ok(self.posts.remove(id).is_some())
    }
}
