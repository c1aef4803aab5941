use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub description: String,
    /// url handed back by the media host
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub comments: Vec<String>,
    pub create_time: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub post_id: String,
    pub comment: String,
    pub from: String,
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub replies: Vec<CommentReply>,
    pub create_time: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentReply {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub from: String,
    #[serde(default)]
    pub reply_at: Option<String>,
    pub comment: String,
    #[serde(default)]
    pub likes: Vec<String>,
    pub create_time: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewPost {
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FeedQuery {
    #[serde(default)]
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewComment {
    pub comment: String,
    pub from: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReply {
    pub comment: String,
    pub from: String,
    #[serde(default)]
    pub reply_at: Option<String>,
}
