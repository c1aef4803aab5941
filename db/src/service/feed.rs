use nanoid::nanoid;
use tracing::debug;

use abi::errors::{Error, Result};
use abi::model::{now_millis, Comment, CommentReply, NewComment, NewPost, NewReply, Post};

use crate::DbRepo;

impl DbRepo {
    pub async fn create_post(&self, user_id: &str, new_post: NewPost) -> Result<Post> {
        if new_post.description.trim().is_empty() {
            return Err(Error::bad_request("You must provide a description"));
        }
        let post = Post {
            id: nanoid!(),
            user_id: user_id.to_string(),
            description: new_post.description,
            image: new_post.image.filter(|url| !url.is_empty()),
            likes: Vec::new(),
            comments: Vec::new(),
            create_time: now_millis(),
        };
        self.post.create_post(post).await
    }

    /// newest first, with the user's own and their friends' posts ahead of everyone else's
    pub async fn feed(&self, user_id: &str, search: Option<&str>) -> Result<Vec<Post>> {
        let user = self
            .user
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| Error::not_found_with_details("User Not Found"))?;
        let posts = self
            .post
            .get_posts(search.map(str::trim).filter(|s| !s.is_empty()))
            .await?;

        let (mut close, others): (Vec<Post>, Vec<Post>) = posts
            .into_iter()
            .partition(|post| post.user_id == user.id || user.is_friend(&post.user_id));
        close.extend(others);
        Ok(close)
    }

    pub async fn get_post(&self, id: &str) -> Result<Post> {
        self.post
            .get_post(id)
            .await?
            .ok_or_else(|| Error::not_found_with_details("Post Not Found"))
    }

    pub async fn user_posts(&self, user_id: &str) -> Result<Vec<Post>> {
        self.post.get_posts_by_user(user_id).await
    }

    pub async fn comments(&self, post_id: &str) -> Result<Vec<Comment>> {
        self.comment.get_comments(post_id).await
    }

    /// like, or take the like back if it is already there
    pub async fn like_post(&self, user_id: &str, id: &str) -> Result<Post> {
        let post = self.get_post(id).await?;
        let liked = !post.likes.iter().any(|u| u == user_id);
        debug!("post {} liked by {}: {}", id, user_id, liked);
        self.post
            .set_post_like(id, user_id, liked)
            .await?
            .ok_or_else(|| Error::not_found_with_details("Post Not Found"))
    }

    /// toggle the like on a comment, or on one of its replies when `reply_id` is given
    pub async fn like_comment(
        &self,
        user_id: &str,
        comment_id: &str,
        reply_id: Option<&str>,
    ) -> Result<Comment> {
        let comment = self
            .comment
            .get_comment(comment_id)
            .await?
            .ok_or_else(|| Error::not_found_with_details("Comment Not Found"))?;

        let updated = match reply_id {
            None => {
                let liked = !comment.likes.iter().any(|u| u == user_id);
                self.comment
                    .set_comment_like(comment_id, user_id, liked)
                    .await?
            }
            Some(reply_id) => {
                let reply = comment
                    .replies
                    .iter()
                    .find(|r| r.id == reply_id)
                    .ok_or_else(|| Error::not_found_with_details("Reply Not Found"))?;
                let liked = !reply.likes.iter().any(|u| u == user_id);
                self.comment
                    .set_reply_like(comment_id, reply_id, user_id, liked)
                    .await?
            }
        };
        updated.ok_or_else(|| Error::not_found_with_details("Comment Not Found"))
    }

    pub async fn comment_post(
        &self,
        user_id: &str,
        post_id: &str,
        new_comment: NewComment,
    ) -> Result<Comment> {
        if new_comment.comment.trim().is_empty() {
            return Err(Error::bad_request("Comment is required."));
        }
        self.get_post(post_id).await?;

        let comment = Comment {
            id: nanoid!(),
            user_id: user_id.to_string(),
            post_id: post_id.to_string(),
            comment: new_comment.comment,
            from: new_comment.from,
            likes: Vec::new(),
            replies: Vec::new(),
            create_time: now_millis(),
        };
        let comment = self.comment.create_comment(comment).await?;
        self.post.push_comment(post_id, &comment.id).await?;
        Ok(comment)
    }

    pub async fn reply_comment(
        &self,
        user_id: &str,
        comment_id: &str,
        new_reply: NewReply,
    ) -> Result<Comment> {
        if new_reply.comment.trim().is_empty() {
            return Err(Error::bad_request("Comment is required."));
        }
        let reply = CommentReply {
            id: nanoid!(),
            user_id: user_id.to_string(),
            from: new_reply.from,
            reply_at: new_reply.reply_at,
            comment: new_reply.comment,
            likes: Vec::new(),
            create_time: now_millis(),
        };
        self.comment
            .push_reply(comment_id, reply)
            .await?
            .ok_or_else(|| Error::not_found_with_details("Comment Not Found"))
    }

    /// authors only; the post's comments go with it
    pub async fn delete_post(&self, user_id: &str, id: &str) -> Result<()> {
        let post = self.get_post(id).await?;
        if post.user_id != user_id {
            return Err(Error::forbidden("You can only delete your own posts."));
        }
        self.post.delete_post(id).await?;
        let removed = self.comment.delete_comments(id).await?;
        debug!("deleted post {} with {} comments", id, removed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use abi::errors::ErrorKind;

    use super::*;
    use crate::service::tests::{repo, user};

    fn new_post(description: &str) -> NewPost {
        NewPost {
            description: description.to_string(),
            image: None,
        }
    }

    fn new_comment(text: &str) -> NewComment {
        NewComment {
            comment: text.to_string(),
            from: "Alice Test".to_string(),
        }
    }

    #[tokio::test]
    async fn liking_twice_leaves_the_post_unliked() {
        let repo = repo();
        let a = user(&repo, "Alice").await;
        let b = user(&repo, "Bob").await;
        let post = repo.create_post(&a.id, new_post("hello")).await.unwrap();

        let post = repo.like_post(&b.id, &post.id).await.unwrap();
        assert_eq!(post.likes, vec![b.id.clone()]);
        let post = repo.like_post(&b.id, &post.id).await.unwrap();
        assert!(post.likes.is_empty());
    }

    #[tokio::test]
    async fn feed_puts_friends_first_then_newest() {
        let repo = repo();
        let me = user(&repo, "Me").await;
        let friend = user(&repo, "Friend").await;
        let stranger = user(&repo, "Stranger").await;
        let fr = repo.send_friend_request(&me.id, &friend.id).await.unwrap();
        repo.resolve_friend_request(&friend.id, &fr.id, "Accepted")
            .await
            .unwrap();

        let mine = repo.create_post(&me.id, new_post("mine")).await.unwrap();
        let theirs = repo
            .create_post(&friend.id, new_post("Friend news"))
            .await
            .unwrap();
        let other = repo
            .create_post(&stranger.id, new_post("stranger NEWS"))
            .await
            .unwrap();

        let ids: Vec<String> = repo
            .feed(&me.id, None)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![theirs.id.clone(), mine.id.clone(), other.id.clone()]);

        let ids: Vec<String> = repo
            .feed(&me.id, Some("news"))
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![theirs.id, other.id]);
    }

    #[tokio::test]
    async fn description_is_required() {
        let repo = repo();
        let a = user(&repo, "Alice").await;
        let err = repo.create_post(&a.id, new_post("  ")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }

    #[tokio::test]
    async fn comments_replies_and_their_likes() {
        let repo = repo();
        let a = user(&repo, "Alice").await;
        let b = user(&repo, "Bob").await;
        let post = repo.create_post(&a.id, new_post("hello")).await.unwrap();

        let first = repo
            .comment_post(&b.id, &post.id, new_comment("first"))
            .await
            .unwrap();
        let second = repo
            .comment_post(&a.id, &post.id, new_comment("second"))
            .await
            .unwrap();
        assert_eq!(
            repo.get_post(&post.id).await.unwrap().comments,
            vec![first.id.clone(), second.id.clone()]
        );
        let listed: Vec<String> = repo
            .comments(&post.id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(listed, vec![second.id.clone(), first.id.clone()]);

        let comment = repo
            .reply_comment(
                &a.id,
                &first.id,
                NewReply {
                    comment: "thanks".to_string(),
                    from: "Alice Test".to_string(),
                    reply_at: Some("Bob Test".to_string()),
                },
            )
            .await
            .unwrap();
        let reply_id = comment.replies[0].id.clone();

        let comment = repo.like_comment(&a.id, &first.id, None).await.unwrap();
        assert_eq!(comment.likes, vec![a.id.clone()]);
        let comment = repo
            .like_comment(&b.id, &first.id, Some(&reply_id))
            .await
            .unwrap();
        assert_eq!(comment.replies[0].likes, vec![b.id.clone()]);
        let comment = repo
            .like_comment(&b.id, &first.id, Some(&reply_id))
            .await
            .unwrap();
        assert!(comment.replies[0].likes.is_empty());
        assert_eq!(comment.likes, vec![a.id.clone()]);

        let err = repo
            .comment_post(&b.id, &post.id, new_comment(""))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Comment is required.");
        let err = repo
            .comment_post(&b.id, "missing", new_comment("hi"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn only_author_deletes_and_comments_go_too() {
        let repo = repo();
        let a = user(&repo, "Alice").await;
        let b = user(&repo, "Bob").await;
        let post = repo.create_post(&a.id, new_post("hello")).await.unwrap();
        repo.comment_post(&b.id, &post.id, new_comment("hi"))
            .await
            .unwrap();

        let err = repo.delete_post(&b.id, &post.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        repo.delete_post(&a.id, &post.id).await.unwrap();
        assert!(repo.get_post(&post.id).await.is_err());
        assert!(repo.comments(&post.id).await.unwrap().is_empty());
        assert!(repo.user_posts(&a.id).await.unwrap().is_empty());
    }
}
