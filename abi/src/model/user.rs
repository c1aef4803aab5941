use serde::{Deserialize, Serialize};

/// user document as persisted; never serialize this into a response,
/// use [`UserInfo`] or [`UserBrief`] instead
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub profile_url: Option<String>,
    #[serde(default)]
    pub profession: Option<String>,
    /// mirrored on the other side: a ∈ b.friends ⟺ b ∈ a.friends
    #[serde(default)]
    pub friends: Vec<String>,
    /// one entry per visit, duplicates kept
    #[serde(default)]
    pub views: Vec<String>,
    #[serde(default)]
    pub verified: bool,
    pub create_time: i64,
    pub update_time: i64,
}

impl User {
    pub fn is_friend(&self, other: &str) -> bool {
        self.friends.iter().any(|f| f == other)
    }
}

/// the subset of a user shown in lists: suggestions, friend requests, friends
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBrief {
    #[serde(rename = "_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub profile_url: Option<String>,
    pub profession: Option<String>,
}

impl From<&User> for UserBrief {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            profile_url: user.profile_url.clone(),
            profession: user.profession.clone(),
        }
    }
}

impl From<User> for UserBrief {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            profile_url: user.profile_url,
            profession: user.profession,
        }
    }
}

/// full profile without the password hash, friends populated
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    #[serde(rename = "_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub location: Option<String>,
    pub profile_url: Option<String>,
    pub profession: Option<String>,
    pub friends: Vec<UserBrief>,
    pub views: Vec<String>,
    pub verified: bool,
    pub create_time: i64,
    pub update_time: i64,
}

impl UserInfo {
    pub fn new(user: User, friends: Vec<UserBrief>) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            location: user.location,
            profile_url: user.profile_url,
            profession: user.profession,
            friends,
            views: user.views,
            verified: user.verified,
            create_time: user.create_time,
            update_time: user.update_time,
        }
    }
}

/// new account as submitted by a client
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRegister {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// profile fields a user may change; absent or empty fields are left as they are
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub location: Option<String>,
    pub profile_url: Option<String>,
    pub profession: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        [
            &self.first_name,
            &self.last_name,
            &self.location,
            &self.profile_url,
            &self.profession,
        ]
        .iter()
        .all(|field| field.as_deref().map_or(true, str::is_empty))
    }

    pub fn apply(&self, user: &mut User) {
        fn set(target: &mut String, value: &Option<String>) {
            if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
                *target = v.to_string();
            }
        }
        fn set_opt(target: &mut Option<String>, value: &Option<String>) {
            if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
                *target = Some(v.to_string());
            }
        }
        set(&mut user.first_name, &self.first_name);
        set(&mut user.last_name, &self.last_name);
        set_opt(&mut user.location, &self.location);
        set_opt(&mut user.profile_url, &self.profile_url);
        set_opt(&mut user.profession, &self.profession);
    }
}
