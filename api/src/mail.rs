use std::fmt::Debug;

use async_trait::async_trait;
use tracing::info;

use abi::errors::Result;

/// outbound mail; the server only builds the links
#[async_trait]
pub trait Mailer: Send + Sync + Debug {
    async fn send_verification(&self, to: &str, name: &str, link: &str) -> Result<()>;

    async fn send_password_reset(&self, to: &str, link: &str) -> Result<()>;
}

/// writes every mail to the log instead of delivering it
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_verification(&self, to: &str, name: &str, link: &str) -> Result<()> {
        info!(to, name, link, "verification mail");
        Ok(())
    }

    async fn send_password_reset(&self, to: &str, link: &str) -> Result<()> {
        info!(to, link, "password reset mail");
        Ok(())
    }
}
