use std::fmt::Debug;

use async_trait::async_trait;

use abi::errors::Result;
use abi::model::{User, UserUpdate};

#[async_trait]
pub trait UserRepo: Sync + Send + Debug {
    /// create user; the email must not be taken
    async fn create_user(&self, user: User) -> Result<User>;

    /// get user by id
    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>>;

    /// get user by email
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// users with the given ids, unknown ids are skipped
    async fn get_users_by_ids(&self, ids: &[String]) -> Result<Vec<User>>;

    /// users whose id is not in `exclude`, in natural order
    async fn list_users_excluding(&self, exclude: &[String], limit: usize) -> Result<Vec<User>>;

    /// apply the non-empty fields of the update, None if the user does not exist
    async fn update_user(&self, id: &str, update: &UserUpdate) -> Result<Option<User>>;

    /// idempotent
    async fn add_friend(&self, user_id: &str, friend_id: &str) -> Result<()>;

    /// idempotent
    async fn remove_friend(&self, user_id: &str, friend_id: &str) -> Result<()>;

    /// append a view; false if the user does not exist
    async fn push_view(&self, user_id: &str, viewer_id: &str) -> Result<bool>;

    async fn set_verified(&self, user_id: &str) -> Result<()>;

    async fn modify_pwd(&self, user_id: &str, password_hash: &str) -> Result<()>;

    async fn delete_user(&self, user_id: &str) -> Result<()>;
}
