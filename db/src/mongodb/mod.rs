use mongodb::error::{ErrorKind as MongoErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{bson::Document, Client, Collection, Database, IndexModel};
use tracing::debug;

use abi::config::Config;
use abi::errors::Result;

mod comment;
mod friend;
mod post;
mod token;
mod user;

pub use comment::MongoComment;
pub use friend::MongoFriendRequest;
pub use post::MongoPost;
pub use token::MongoToken;
pub use user::MongoUser;

const DUPLICATE_KEY: i32 = 11000;

pub async fn database(config: &Config) -> Result<Database> {
    let client = Client::with_uri_str(config.db.mongodb.url()).await?;
    Ok(client.database(&config.db.mongodb.database))
}

pub(crate) async fn create_index<T>(coll: &Collection<T>, keys: Document, unique: bool) -> Result<()>
where
    T: Send + Sync,
{
    let index_model = IndexModel::builder()
        .keys(keys.clone())
        .options(IndexOptions::builder().unique(unique).build())
        .build();
    coll.create_index(index_model, None).await?;
    debug!("create {:?} index for {}", keys, coll.name());
    Ok(())
}

pub(crate) fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        MongoErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY
    )
}
