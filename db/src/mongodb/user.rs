use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use mongodb::{Collection, Database};

use abi::errors::{Error, Result};
use abi::model::{now_millis, User, UserUpdate};

use crate::mongodb::{create_index, is_duplicate_key};
use crate::user::UserRepo;

const COLL_USERS: &str = "users";

#[derive(Debug)]
pub struct MongoUser {
    coll: Collection<User>,
}

impl MongoUser {
    pub async fn new(db: &Database) -> Result<Self> {
        let coll: Collection<User> = db.collection(COLL_USERS);
        create_index(&coll, doc! {"email": 1}, true).await?;
        Ok(Self { coll })
    }
}

fn update_doc(update: &UserUpdate) -> Document {
    let mut set = doc! {"updateTime": now_millis()};
    let fields = [
        ("firstName", &update.first_name),
        ("lastName", &update.last_name),
        ("location", &update.location),
        ("profileUrl", &update.profile_url),
        ("profession", &update.profession),
    ];
    for (key, value) in fields {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            set.insert(key, value);
        }
    }
    set
}

#[async_trait]
impl UserRepo for MongoUser {
    async fn create_user(&self, user: User) -> Result<User> {
        match self.coll.insert_one(&user, None).await {
            Ok(_) => Ok(user),
            Err(e) if is_duplicate_key(&e) => Err(Error::conflict("Email Address already exists")),
            Err(e) => Err(e.into()),
        }
    }

    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self.coll.find_one(doc! {"_id": id}, None).await?)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.coll.find_one(doc! {"email": email}, None).await?)
    }

    async fn get_users_by_ids(&self, ids: &[String]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let cursor = self.coll.find(doc! {"_id": {"$in": ids}}, None).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn list_users_excluding(&self, exclude: &[String], limit: usize) -> Result<Vec<User>> {
        let option = FindOptions::builder().limit(limit as i64).build();
        let cursor = self
            .coll
            .find(doc! {"_id": {"$nin": exclude}}, Some(option))
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn update_user(&self, id: &str, update: &UserUpdate) -> Result<Option<User>> {
        let option = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        Ok(self
            .coll
            .find_one_and_update(doc! {"_id": id}, doc! {"$set": update_doc(update)}, option)
            .await?)
    }

    async fn add_friend(&self, user_id: &str, friend_id: &str) -> Result<()> {
        self.coll
            .update_one(
                doc! {"_id": user_id},
                doc! {"$addToSet": {"friends": friend_id}},
                None,
            )
            .await?;
        Ok(())
    }

    async fn remove_friend(&self, user_id: &str, friend_id: &str) -> Result<()> {
        self.coll
            .update_one(
                doc! {"_id": user_id},
                doc! {"$pull": {"friends": friend_id}},
                None,
            )
            .await?;
        Ok(())
    }

    async fn push_view(&self, user_id: &str, viewer_id: &str) -> Result<bool> {
        let result = self
            .coll
            .update_one(
                doc! {"_id": user_id},
                doc! {"$push": {"views": viewer_id}},
                None,
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn set_verified(&self, user_id: &str) -> Result<()> {
        self.coll
            .update_one(
                doc! {"_id": user_id},
                doc! {"$set": {"verified": true}},
                None,
            )
            .await?;
        Ok(())
    }

    async fn modify_pwd(&self, user_id: &str, password_hash: &str) -> Result<()> {
        self.coll
            .update_one(
                doc! {"_id": user_id},
                doc! {"$set": {"password": password_hash, "updateTime": now_millis()}},
                None,
            )
            .await?;
        Ok(())
    }

    async fn delete_user(&self, user_id: &str) -> Result<()> {
        self.coll.delete_one(doc! {"_id": user_id}, None).await?;
        Ok(())
    }
}
