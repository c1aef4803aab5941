use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use mongodb::{Collection, Database};

use abi::errors::Result;
use abi::model::Post;

use crate::mongodb::create_index;
use crate::post::PostRepo;

const COLL_POSTS: &str = "posts";

#[derive(Debug)]
pub struct MongoPost {
    coll: Collection<Post>,
}

impl MongoPost {
    pub async fn new(db: &Database) -> Result<Self> {
        let coll: Collection<Post> = db.collection(COLL_POSTS);
        create_index(&coll, doc! {"userId": 1, "createTime": -1}, false).await?;
        Ok(Self { coll })
    }

    async fn find_newest(&self, query: Document) -> Result<Vec<Post>> {
        let option = FindOptions::builder()
            .sort(doc! {"createTime": -1})
            .build();
        let cursor = self.coll.find(query, Some(option)).await?;
        Ok(cursor.try_collect().await?)
    }
}

pub(crate) fn like_update(user_id: &str, liked: bool) -> Document {
    if liked {
        doc! {"$addToSet": {"likes": user_id}}
    } else {
        doc! {"$pull": {"likes": user_id}}
    }
}

#[async_trait]
impl PostRepo for MongoPost {
    async fn create_post(&self, post: Post) -> Result<Post> {
        self.coll.insert_one(&post, None).await?;
        Ok(post)
    }

    async fn get_post(&self, id: &str) -> Result<Option<Post>> {
        Ok(self.coll.find_one(doc! {"_id": id}, None).await?)
    }

    async fn get_posts(&self, search: Option<&str>) -> Result<Vec<Post>> {
        let query = match search.filter(|s| !s.is_empty()) {
            Some(search) => doc! {
                "description": {"$regex": regex::escape(search), "$options": "i"}
            },
            None => doc! {},
        };
        self.find_newest(query).await
    }

    async fn get_posts_by_user(&self, user_id: &str) -> Result<Vec<Post>> {
        self.find_newest(doc! {"userId": user_id}).await
    }

    async fn set_post_like(&self, id: &str, user_id: &str, liked: bool) -> Result<Option<Post>> {
        let option = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        Ok(self
            .coll
            .find_one_and_update(doc! {"_id": id}, like_update(user_id, liked), option)
            .await?)
    }

    async fn push_comment(&self, post_id: &str, comment_id: &str) -> Result<()> {
        self.coll
            .update_one(
                doc! {"_id": post_id},
                doc! {"$push": {"comments": comment_id}},
                None,
            )
            .await?;
        Ok(())
    }

    async fn delete_post(&self, id: &str) -> Result<bool> {
        let result = self.coll.delete_one(doc! {"_id": id}, None).await?;
        Ok(result.deleted_count > 0)
    }
}
