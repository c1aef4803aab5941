use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use abi::errors::{Error, Result};
use abi::model::{now_millis, User, UserUpdate};

use crate::memory::Table;
use crate::user::UserRepo;

#[derive(Debug, Default)]
pub struct MemoryUser {
    users: Table<User>,
    /// email -> user id, claimed before the row is written
    emails: DashMap<String, String>,
}

impl MemoryUser {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepo for MemoryUser {
    async fn create_user(&self, user: User) -> Result<User> {
        match self.emails.entry(user.email.clone()) {
            Entry::Occupied(_) => return Err(Error::conflict("Email Address already exists")),
            Entry::Vacant(entry) => {
                self.users.insert(user.id.clone(), user.clone());
                entry.insert(user.id.clone());
            }
        }
        Ok(user)
    }

    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self.users.get(id))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.users.find(|u| u.email == email).into_iter().next())
    }

    async fn get_users_by_ids(&self, ids: &[String]) -> Result<Vec<User>> {
        Ok(self.users.find(|u| ids.contains(&u.id)))
    }

    async fn list_users_excluding(&self, exclude: &[String], limit: usize) -> Result<Vec<User>> {
        let mut users = self.users.find(|u| !exclude.contains(&u.id));
        users.truncate(limit);
        Ok(users)
    }

    async fn update_user(&self, id: &str, update: &UserUpdate) -> Result<Option<User>> {
        Ok(self.users.update(id, |user| {
            update.apply(user);
            user.update_time = now_millis();
        }))
    }

    async fn add_friend(&self, user_id: &str, friend_id: &str) -> Result<()> {
        self.users.update(user_id, |user| {
            if !user.is_friend(friend_id) {
                user.friends.push(friend_id.to_string());
            }
        });
        Ok(())
    }

    async fn remove_friend(&self, user_id: &str, friend_id: &str) -> Result<()> {
        self.users
            .update(user_id, |user| user.friends.retain(|f| f != friend_id));
        Ok(())
    }

    async fn push_view(&self, user_id: &str, viewer_id: &str) -> Result<bool> {
        Ok(self
            .users
            .update(user_id, |user| user.views.push(viewer_id.to_string()))
            .is_some())
    }

    async fn set_verified(&self, user_id: &str) -> Result<()> {
        self.users.update(user_id, |user| user.verified = true);
        Ok(())
    }

    async fn modify_pwd(&self, user_id: &str, password_hash: &str) -> Result<()> {
        self.users.update(user_id, |user| {
            user.password = password_hash.to_string();
            user.update_time = now_millis();
        });
        Ok(())
    }

    async fn delete_user(&self, user_id: &str) -> Result<()> {
        if let Some(user) = self.users.remove(user_id) {
            self.emails.remove(&user.email);
        }
        Ok(())
    }
}
