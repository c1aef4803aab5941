use std::sync::Arc;

use tracing::info;

use abi::config::{Config, DbBackend, TokenConfig};
use abi::errors::Result;

pub mod friend;
pub mod memory;
pub mod mongodb;
pub mod post;
pub mod service;
pub mod token;
pub mod user;

pub use friend::FriendRequestRepo;
pub use post::{CommentRepo, PostRepo};
pub use token::TokenRepo;
pub use user::UserRepo;

/// every store the services need, behind trait objects so the backend can be swapped
#[derive(Debug, Clone)]
pub struct DbRepo {
    pub user: Arc<dyn UserRepo>,
    pub friend: Arc<dyn FriendRequestRepo>,
    pub post: Arc<dyn PostRepo>,
    pub comment: Arc<dyn CommentRepo>,
    pub token: Arc<dyn TokenRepo>,
    pub tokens: TokenConfig,
}

impl DbRepo {
    pub async fn new(config: &Config) -> Result<Self> {
        match config.db.backend {
            DbBackend::Mongodb => Self::mongodb(config).await,
            DbBackend::Memory => {
                info!("using in-memory storage, data is lost on restart");
                Ok(Self::memory(config.token))
            }
        }
    }

    pub async fn mongodb(config: &Config) -> Result<Self> {
        let db = crate::mongodb::database(config).await?;
        info!("connected to mongodb database {}", db.name());
        Ok(Self {
            user: Arc::new(crate::mongodb::MongoUser::new(&db).await?),
            friend: Arc::new(crate::mongodb::MongoFriendRequest::new(&db).await?),
            post: Arc::new(crate::mongodb::MongoPost::new(&db).await?),
            comment: Arc::new(crate::mongodb::MongoComment::new(&db).await?),
            token: Arc::new(crate::mongodb::MongoToken::new(&db).await?),
            tokens: config.token,
        })
    }

    pub fn memory(tokens: TokenConfig) -> Self {
        Self {
            user: Arc::new(memory::MemoryUser::new()),
            friend: Arc::new(memory::MemoryFriendRequest::new()),
            post: Arc::new(memory::MemoryPost::new()),
            comment: Arc::new(memory::MemoryComment::new()),
            token: Arc::new(memory::MemoryToken::new()),
            tokens,
        }
    }
}
