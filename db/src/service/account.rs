use nanoid::nanoid;
use tracing::debug;

use abi::errors::{Error, Result};
use abi::model::{
    now_millis, TokenKind, User, UserBrief, UserInfo, UserRegister, UserUpdate,
};

use crate::DbRepo;

impl DbRepo {
    /// create an unverified account; returns it with the raw verification token
    pub async fn register(&self, new_user: UserRegister) -> Result<(User, String)> {
        let UserRegister {
            first_name,
            last_name,
            email,
            password,
        } = new_user;
        let email = email.trim().to_lowercase();
        if [&first_name, &last_name, &email, &password]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(Error::bad_request("Please provide all required fields"));
        }
        if self.user.get_user_by_email(&email).await?.is_some() {
            return Err(Error::conflict("Email Address already exists"));
        }

        let now = now_millis();
        let user = User {
            id: nanoid!(),
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            email,
            password: utils::hash_secret(&password)?,
            verified: false,
            create_time: now,
            update_time: now,
            ..Default::default()
        };
        let user = self.user.create_user(user).await?;
        let token = self
            .issue_token(TokenKind::EmailVerification, &user.id, None)
            .await?;
        debug!("registered user {}", user.id);
        Ok((user, token))
    }

    /// check credentials; only verified accounts may log in
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(Error::bad_request("Please provide user credentials"));
        }
        let user = self
            .user
            .get_user_by_email(&email.trim().to_lowercase())
            .await?
            .ok_or_else(Error::account_or_pwd)?;
        if !utils::verify_password(password, &user.password) {
            return Err(Error::account_or_pwd());
        }
        if !user.verified {
            return Err(Error::forbidden(
                "User email is not verified. Check your email account and verify your email",
            ));
        }
        Ok(user)
    }

    /// profile with the friends list expanded
    pub async fn get_user(&self, id: &str) -> Result<UserInfo> {
        let user = self
            .user
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found_with_details("User Not Found"))?;
        self.populate(user).await
    }

    pub async fn update_user(&self, id: &str, update: UserUpdate) -> Result<UserInfo> {
        if update.is_empty() {
            return Err(Error::bad_request("Please provide all required fields"));
        }
        let user = self
            .user
            .update_user(id, &update)
            .await?
            .ok_or_else(|| Error::not_found_with_details("User Not Found"))?;
        self.populate(user).await
    }

    /// record that `viewer` looked at `id`'s profile
    pub async fn profile_view(&self, viewer: &str, id: &str) -> Result<()> {
        if !self.user.push_view(id, viewer).await? {
            return Err(Error::not_found_with_details("User Not Found"));
        }
        Ok(())
    }

    async fn populate(&self, user: User) -> Result<UserInfo> {
        let friends = self
            .user
            .get_users_by_ids(&user.friends)
            .await?
            .into_iter()
            .map(UserBrief::from)
            .collect();
        Ok(UserInfo::new(user, friends))
    }
}
