use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::Error;
use crate::model::user::UserBrief;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum RequestStatus {
    #[default]
    Pending,
    Accepted,
    Denied,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Accepted => "Accepted",
            RequestStatus::Denied => "Denied",
        }
    }
}

impl Display for RequestStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(RequestStatus::Pending),
            "Accepted" => Ok(RequestStatus::Accepted),
            "Denied" => Ok(RequestStatus::Denied),
            _ => Err(Error::bad_request(format!(
                "Invalid friend request status: {}",
                s
            ))),
        }
    }
}

/// directional proposal from `request_from` to `request_to`;
/// kept after it is resolved so that the pair is never suggested again
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequest {
    #[serde(rename = "_id")]
    pub id: String,
    pub request_from: String,
    pub request_to: String,
    pub request_status: RequestStatus,
    pub create_time: i64,
    pub update_time: i64,
}

impl FriendRequest {
    pub fn involves(&self, user_id: &str) -> bool {
        self.request_from == user_id || self.request_to == user_id
    }

    /// the side of the request that is not `user_id`
    pub fn counterpart(&self, user_id: &str) -> &str {
        if self.request_from == user_id {
            &self.request_to
        } else {
            &self.request_from
        }
    }
}

/// pending request as shown to its recipient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestWithUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub request_from: UserBrief,
    pub request_to: String,
    pub request_status: RequestStatus,
    pub create_time: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendFriendRequest {
    pub request_to: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolveFriendRequest {
    pub rid: String,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Unfriend {
    pub friend_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_its_name() {
        for status in [
            RequestStatus::Pending,
            RequestStatus::Accepted,
            RequestStatus::Denied,
        ] {
            assert_eq!(status.to_string().parse::<RequestStatus>().unwrap(), status);
        }
        assert!("accepted".parse::<RequestStatus>().is_err());
    }

    #[test]
    fn status_serializes_as_plain_string() {
        let json = serde_json::to_value(RequestStatus::Accepted).unwrap();
        assert_eq!(json, "Accepted");
    }

    #[test]
    fn counterpart_is_the_other_side() {
        let fr = FriendRequest {
            id: "r".into(),
            request_from: "a".into(),
            request_to: "b".into(),
            request_status: RequestStatus::Pending,
            create_time: 0,
            update_time: 0,
        };
        assert!(fr.involves("a") && fr.involves("b") && !fr.involves("c"));
        assert_eq!(fr.counterpart("a"), "b");
        assert_eq!(fr.counterpart("b"), "a");
    }
}
