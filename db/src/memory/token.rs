use async_trait::async_trait;

use abi::errors::Result;
use abi::model::{TokenKind, TokenRecord};

use crate::memory::Table;
use crate::token::TokenRepo;

#[derive(Debug, Default)]
pub struct MemoryToken {
    verifications: Table<TokenRecord>,
    resets: Table<TokenRecord>,
}

impl MemoryToken {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self, kind: TokenKind) -> &Table<TokenRecord> {
        match kind {
            TokenKind::EmailVerification => &self.verifications,
            TokenKind::PasswordReset => &self.resets,
        }
    }
}

#[async_trait]
impl TokenRepo for MemoryToken {
    async fn save_token(&self, kind: TokenKind, record: TokenRecord) -> Result<()> {
        self.table(kind).insert(record.id.clone(), record);
        Ok(())
    }

    async fn get_token_by_user(
        &self,
        kind: TokenKind,
        user_id: &str,
    ) -> Result<Option<TokenRecord>> {
        Ok(self
            .table(kind)
            .find_newest(|r| r.user_id == user_id)
            .into_iter()
            .next())
    }

    async fn get_token_by_email(
        &self,
        kind: TokenKind,
        email: &str,
    ) -> Result<Option<TokenRecord>> {
        Ok(self
            .table(kind)
            .find_newest(|r| r.email.as_deref() == Some(email))
            .into_iter()
            .next())
    }

    async fn delete_token(&self, kind: TokenKind, id: &str) -> Result<()> {
        self.table(kind).remove(id);
        Ok(())
    }
}
