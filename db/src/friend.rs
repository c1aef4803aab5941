use std::fmt::Debug;

use async_trait::async_trait;

use abi::errors::Result;
use abi::model::{FriendRequest, RequestStatus};

#[async_trait]
pub trait FriendRequestRepo: Sync + Send + Debug {
    /// create friend request, the status is always pending
    async fn create_request(&self, from: &str, to: &str) -> Result<FriendRequest>;

    async fn get_request(&self, id: &str) -> Result<Option<FriendRequest>>;

    /// every request between the two users, both directions, any status
    async fn get_requests_between(&self, a: &str, b: &str) -> Result<Vec<FriendRequest>>;

    /// every request the user sent or received, any status
    async fn get_requests_involving(&self, user_id: &str) -> Result<Vec<FriendRequest>>;

    /// pending requests addressed to the user, newest first
    async fn get_pending_for(&self, user_id: &str, limit: usize) -> Result<Vec<FriendRequest>>;

    /// move a pending request to `status`; false if it was no longer pending
    async fn resolve_request(&self, id: &str, status: RequestStatus) -> Result<bool>;
}
