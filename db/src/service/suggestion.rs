use std::collections::HashSet;

use tracing::debug;

use abi::errors::{Error, Result};
use abi::model::UserBrief;

use crate::DbRepo;

pub const SUGGESTION_LIMIT: usize = 15;

impl DbRepo {
    /// people the user may know: not the user, not a friend, and no request history either way
    pub async fn suggested_friends(&self, user_id: &str) -> Result<Vec<UserBrief>> {
        let user = self
            .user
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| Error::not_found_with_details("User Not Found"))?;

        let mut exclude: HashSet<String> = HashSet::new();
        exclude.insert(user.id.clone());
        exclude.extend(user.friends);
        for fr in self.friend.get_requests_involving(user_id).await? {
            exclude.insert(fr.counterpart(user_id).to_string());
        }
        debug!("suggestions for {} exclude {} users", user_id, exclude.len());

        let exclude: Vec<String> = exclude.into_iter().collect();
        let users = self
            .user
            .list_users_excluding(&exclude, SUGGESTION_LIMIT)
            .await?;
        Ok(users.into_iter().map(UserBrief::from).collect())
    }
}
