use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, to_bson};
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use mongodb::{Collection, Database};

use abi::errors::Result;
use abi::model::{Comment, CommentReply};

use crate::mongodb::create_index;
use crate::mongodb::post::like_update;
use crate::post::CommentRepo;

const COLL_COMMENTS: &str = "comments";

#[derive(Debug)]
pub struct MongoComment {
    coll: Collection<Comment>,
}

impl MongoComment {
    pub async fn new(db: &Database) -> Result<Self> {
        let coll: Collection<Comment> = db.collection(COLL_COMMENTS);
        create_index(&coll, doc! {"postId": 1, "createTime": -1}, false).await?;
        Ok(Self { coll })
    }

    fn after() -> FindOneAndUpdateOptions {
        FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build()
    }
}

#[async_trait]
impl CommentRepo for MongoComment {
    async fn create_comment(&self, comment: Comment) -> Result<Comment> {
        self.coll.insert_one(&comment, None).await?;
        Ok(comment)
    }

    async fn get_comment(&self, id: &str) -> Result<Option<Comment>> {
        Ok(self.coll.find_one(doc! {"_id": id}, None).await?)
    }

    async fn get_comments(&self, post_id: &str) -> Result<Vec<Comment>> {
        let option = FindOptions::builder()
            .sort(doc! {"createTime": -1})
            .build();
        let cursor = self.coll.find(doc! {"postId": post_id}, Some(option)).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn set_comment_like(
        &self,
        id: &str,
        user_id: &str,
        liked: bool,
    ) -> Result<Option<Comment>> {
        Ok(self
            .coll
            .find_one_and_update(doc! {"_id": id}, like_update(user_id, liked), Self::after())
            .await?)
    }

    async fn set_reply_like(
        &self,
        comment_id: &str,
        reply_id: &str,
        user_id: &str,
        liked: bool,
    ) -> Result<Option<Comment>> {
        let update = if liked {
            doc! {"$addToSet": {"replies.$.likes": user_id}}
        } else {
            doc! {"$pull": {"replies.$.likes": user_id}}
        };
        let updated = self
            .coll
            .find_one_and_update(
                doc! {"_id": comment_id, "replies._id": reply_id},
                update,
                Self::after(),
            )
            .await?;
        match updated {
            Some(comment) => Ok(Some(comment)),
            // unknown reply: hand back the comment untouched
            None => self.get_comment(comment_id).await,
        }
    }

    async fn push_reply(&self, comment_id: &str, reply: CommentReply) -> Result<Option<Comment>> {
        let reply = to_bson(&reply)?;
        Ok(self
            .coll
            .find_one_and_update(
                doc! {"_id": comment_id},
                doc! {"$push": {"replies": reply}},
                Self::after(),
            )
            .await?)
    }

    async fn delete_comments(&self, post_id: &str) -> Result<u64> {
        let result = self.coll.delete_many(doc! {"postId": post_id}, None).await?;
        Ok(result.deleted_count)
    }
}
