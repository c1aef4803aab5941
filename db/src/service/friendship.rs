use tracing::debug;

use abi::errors::{Error, Result};
use abi::model::{FriendRequest, FriendRequestWithUser, RequestStatus, UserBrief};

use crate::DbRepo;

/// most pending requests returned to a user at once
pub const PENDING_LIMIT: usize = 10;

impl DbRepo {
    /// propose a friendship from `from` to `to`
    pub async fn send_friend_request(&self, from: &str, to: &str) -> Result<FriendRequest> {
        debug!("send friend request: {} -> {}", from, to);
        if from == to {
            return Err(Error::bad_request("You cannot send a friend request to yourself."));
        }
        let sender = self
            .user
            .get_user_by_id(from)
            .await?
            .ok_or_else(|| Error::not_found_with_details("User Not Found"))?;
        if self.user.get_user_by_id(to).await?.is_none() {
            return Err(Error::not_found_with_details("User Not Found"));
        }
        if sender.is_friend(to) {
            return Err(Error::conflict("Already friends with this user."));
        }

        let history = self.friend.get_requests_between(from, to).await?;
        if history
            .iter()
            .any(|fr| fr.request_status == RequestStatus::Pending)
        {
            return Err(Error::conflict("Friend Request already sent."));
        }
        if history
            .iter()
            .any(|fr| fr.request_status == RequestStatus::Accepted)
        {
            return Err(Error::conflict("Already friends with this user."));
        }

        self.friend.create_request(from, to).await
    }

    /// pending requests addressed to `user_id` with the sender's profile attached
    pub async fn pending_requests(&self, user_id: &str) -> Result<Vec<FriendRequestWithUser>> {
        let requests = self.friend.get_pending_for(user_id, PENDING_LIMIT).await?;
        let ids: Vec<String> = requests.iter().map(|fr| fr.request_from.clone()).collect();
        let senders = self.user.get_users_by_ids(&ids).await?;

        Ok(requests
            .into_iter()
            .filter_map(|fr| {
                // requests from deleted accounts are skipped
                let sender = senders.iter().find(|u| u.id == fr.request_from)?;
                Some(FriendRequestWithUser {
                    id: fr.id,
                    request_from: UserBrief::from(sender),
                    request_to: fr.request_to,
                    request_status: fr.request_status,
                    create_time: fr.create_time,
                })
            })
            .collect())
    }

    /// accept or deny a pending request; only its recipient may do so
    pub async fn resolve_friend_request(
        &self,
        actor: &str,
        request_id: &str,
        status: &str,
    ) -> Result<FriendRequest> {
        let status: RequestStatus = status.parse()?;
        if status == RequestStatus::Pending {
            return Err(Error::bad_request(
                "Friend request status must be Accepted or Denied",
            ));
        }

        let mut request = self
            .friend
            .get_request(request_id)
            .await?
            .ok_or_else(|| Error::not_found_with_details("No Friend Request Found."))?;
        if request.request_to != actor {
            return Err(Error::forbidden(
                "Only the recipient can answer this friend request.",
            ));
        }
        if !self.friend.resolve_request(request_id, status).await? {
            return Err(Error::conflict("Friend Request has already been answered."));
        }
        debug!(
            "friend request {} {}: {} -> {}",
            request_id, status, request.request_from, request.request_to
        );

        if status == RequestStatus::Accepted {
            self.user
                .add_friend(&request.request_to, &request.request_from)
                .await?;
            self.user
                .add_friend(&request.request_from, &request.request_to)
                .await?;
        }
        request.request_status = status;
        Ok(request)
    }

    /// drop the friendship in both directions; request history is left alone
    pub async fn unfriend(&self, user_id: &str, friend_id: &str) -> Result<()> {
        debug!("unfriend: {} <-> {}", user_id, friend_id);
        self.user.remove_friend(user_id, friend_id).await?;
        self.user.remove_friend(friend_id, user_id).await?;
        Ok(())
    }
}
