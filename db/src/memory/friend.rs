use async_trait::async_trait;
use nanoid::nanoid;

use abi::errors::Result;
use abi::model::{now_millis, FriendRequest, RequestStatus};

use crate::friend::FriendRequestRepo;
use crate::memory::Table;

#[derive(Debug, Default)]
pub struct MemoryFriendRequest {
    requests: Table<FriendRequest>,
}

impl MemoryFriendRequest {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FriendRequestRepo for MemoryFriendRequest {
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
        self.requests.insert(request.id.clone(), request.clone());
        Ok(request)
    }

    async fn get_request(&self, id: &str) -> Result<Option<FriendRequest>> {
        Ok(self.requests.get(id))
    }

    async fn get_requests_between(&self, a: &str, b: &str) -> Result<Vec<FriendRequest>> {
        Ok(self.requests.find(|fr| {
            (fr.request_from == a && fr.request_to == b)
                || (fr.request_from == b && fr.request_to == a)
        }))
    }

    async fn get_requests_involving(&self, user_id: &str) -> Result<Vec<FriendRequest>> {
        Ok(self.requests.find(|fr| fr.involves(user_id)))
    }

    async fn get_pending_for(&self, user_id: &str, limit: usize) -> Result<Vec<FriendRequest>> {
        let mut list = self.requests.find_newest(|fr| {
            fr.request_to == user_id && fr.request_status == RequestStatus::Pending
        });
        list.truncate(limit);
        Ok(list)
    }

    async fn resolve_request(&self, id: &str, status: RequestStatus) -> Result<bool> {
        let mut changed = false;
        self.requests.update(id, |fr| {
            if fr.request_status == RequestStatus::Pending {
                fr.request_status = status;
                fr.update_time = now_millis();
                changed = true;
            }
        });
        Ok(changed)
    }
}
