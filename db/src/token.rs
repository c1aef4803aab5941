use std::fmt::Debug;

use async_trait::async_trait;

use abi::errors::Result;
use abi::model::{TokenKind, TokenRecord};

/// verification and reset tokens, one store per kind
#[async_trait]
pub trait TokenRepo: Sync + Send + Debug {
    async fn save_token(&self, kind: TokenKind, record: TokenRecord) -> Result<()>;

    /// latest record for the user
    async fn get_token_by_user(&self, kind: TokenKind, user_id: &str)
        -> Result<Option<TokenRecord>>;

    /// latest record for the email
    async fn get_token_by_email(&self, kind: TokenKind, email: &str)
        -> Result<Option<TokenRecord>>;

    async fn delete_token(&self, kind: TokenKind, id: &str) -> Result<()>;
}
