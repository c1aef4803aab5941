use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::options::FindOptions;
use mongodb::{Collection, Database};
use nanoid::nanoid;

use abi::errors::Result;
use abi::model::{now_millis, FriendRequest, RequestStatus};

use crate::friend::FriendRequestRepo;
use crate::mongodb::create_index;

const COLL_FRIEND_REQUESTS: &str = "friend_requests";

#[derive(Debug)]
pub struct MongoFriendRequest {
    coll: Collection<FriendRequest>,
}

impl MongoFriendRequest {
    pub async fn new(db: &Database) -> Result<Self> {
        let coll: Collection<FriendRequest> = db.collection(COLL_FRIEND_REQUESTS);
        create_index(&coll, doc! {"requestTo": 1, "requestStatus": 1}, false).await?;
        create_index(&coll, doc! {"requestFrom": 1}, false).await?;
        Ok(Self { coll })
    }
}

#[async_trait]
impl FriendRequestRepo for MongoFriendRequest {
    async fn create_request(&self, from: &str, to: &str) -> Result<FriendRequest> {
        let now = now_millis();
        let request = FriendRequest {
            id: nanoid!(),
            request_from: from.to_string(),
            request_to: to.to_string(),
            request_status: RequestStatus::Pending,
            create_time: now,
            update_time: now,
        };
        self.coll.insert_one(&request, None).await?;
        Ok(request)
    }

    async fn get_request(&self, id: &str) -> Result<Option<FriendRequest>> {
        Ok(self.coll.find_one(doc! {"_id": id}, None).await?)
    }

    async fn get_requests_between(&self, a: &str, b: &str) -> Result<Vec<FriendRequest>> {
        let query = doc! {
            "$or": [
                {"requestFrom": a, "requestTo": b},
                {"requestFrom": b, "requestTo": a},
            ]
        };
        let cursor = self.coll.find(query, None).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn get_requests_involving(&self, user_id: &str) -> Result<Vec<FriendRequest>> {
        let query = doc! {"$or": [{"requestFrom": user_id}, {"requestTo": user_id}]};
        let cursor = self.coll.find(query, None).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn get_pending_for(&self, user_id: &str, limit: usize) -> Result<Vec<FriendRequest>> {
        let query = doc! {
            "requestTo": user_id,
            "requestStatus": RequestStatus::Pending.as_str(),
        };
        let option = FindOptions::builder()
            .sort(doc! {"createTime": -1})
            .limit(limit as i64)
            .build();
        let cursor = self.coll.find(query, Some(option)).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn resolve_request(&self, id: &str, status: RequestStatus) -> Result<bool> {
        // the status filter makes the transition happen at most once
        let result = self
            .coll
            .update_one(
                doc! {"_id": id, "requestStatus": RequestStatus::Pending.as_str()},
                doc! {"$set": {"requestStatus": status.as_str(), "updateTime": now_millis()}},
                None,
            )
            .await?;
        Ok(result.modified_count > 0)
    }
}
