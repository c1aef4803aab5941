use std::time::Duration;

use async_trait::async_trait;
use mongodb::bson::{doc, to_document, DateTime, Document};
use mongodb::options::{FindOneOptions, IndexOptions};
use mongodb::{Collection, Database, IndexModel};
use tracing::debug;

use abi::errors::Result;
use abi::model::{TokenKind, TokenRecord};

use crate::mongodb::create_index;
use crate::token::TokenRepo;

/// the database purges a record once its `expireAt` date has passed
#[derive(Debug)]
pub struct MongoToken {
    verifications: Collection<TokenRecord>,
    resets: Collection<TokenRecord>,
}

impl MongoToken {
    pub async fn new(db: &Database) -> Result<Self> {
        let verifications: Collection<TokenRecord> = db.collection(TokenKind::EmailVerification.collection());
        let resets: Collection<TokenRecord> = db.collection(TokenKind::PasswordReset.collection());
        for coll in [&verifications, &resets] {
            Self::create_ttl_index(coll).await?;
            create_index(coll, doc! {"userId": 1}, false).await?;
        }
        create_index(&resets, doc! {"email": 1}, false).await?;
        Ok(Self {
            verifications,
            resets,
        })
    }

    async fn create_ttl_index(coll: &Collection<TokenRecord>) -> Result<()> {
        let index_model = IndexModel::builder()
            .keys(doc! {"expireAt": 1})
            .options(
                IndexOptions::builder()
                    .expire_after(Duration::from_secs(0))
                    .build(),
            )
            .build();
        coll.create_index(index_model, None).await?;
        debug!("create ttl index for {}", coll.name());
        Ok(())
    }

    fn coll(&self, kind: TokenKind) -> &Collection<TokenRecord> {
        match kind {
            TokenKind::EmailVerification => &self.verifications,
            TokenKind::PasswordReset => &self.resets,
        }
    }

    async fn find_latest(&self, kind: TokenKind, query: Document) -> Result<Option<TokenRecord>> {
        let option = FindOneOptions::builder()
            .sort(doc! {"createTime": -1})
            .build();
        Ok(self.coll(kind).find_one(query, option).await?)
    }
}

#[async_trait]
impl TokenRepo for MongoToken {
    async fn save_token(&self, kind: TokenKind, record: TokenRecord) -> Result<()> {
        let mut document = to_document(&record)?;
        document.insert("expireAt", DateTime::from_millis(record.expires_at));
        self.coll(kind)
            .clone_with_type::<Document>()
            .insert_one(document, None)
            .await?;
        Ok(())
    }

    async fn get_token_by_user(
        &self,
        kind: TokenKind,
        user_id: &str,
    ) -> Result<Option<TokenRecord>> {
        self.find_latest(kind, doc! {"userId": user_id}).await
    }

    async fn get_token_by_email(
        &self,
        kind: TokenKind,
        email: &str,
    ) -> Result<Option<TokenRecord>> {
        self.find_latest(kind, doc! {"email": email}).await
    }

    async fn delete_token(&self, kind: TokenKind, id: &str) -> Result<()> {
        self.coll(kind).delete_one(doc! {"_id": id}, None).await?;
        Ok(())
    }
}
