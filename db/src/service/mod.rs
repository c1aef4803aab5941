//! domain operations layered over the repositories

mod account;
mod feed;
mod friendship;
mod suggestion;
mod verification;

pub use friendship::PENDING_LIMIT;
pub use suggestion::SUGGESTION_LIMIT;

#[cfg(test)]
pub(crate) mod tests {
    use abi::config::TokenConfig;
    use abi::model::{now_millis, User};
    use nanoid::nanoid;

    use crate::DbRepo;

    pub fn repo() -> DbRepo {
        DbRepo::memory(TokenConfig::default())
    }

    /// verified user with the given first name
    pub async fn user(repo: &DbRepo, name: &str) -> User {
        let now = now_millis();
        let user = User {
            id: nanoid!(),
            first_name: name.to_string(),
            last_name: "Test".to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            password: utils::hash_secret("password").unwrap(),
            verified: true,
            create_time: now,
            update_time: now,
            ..Default::default()
        };
        repo.user.create_user(user).await.unwrap()
    }

    pub async fn friends_of(repo: &DbRepo, id: &str) -> Vec<String> {
        repo.user.get_user_by_id(id).await.unwrap().unwrap().friends
    }
}
