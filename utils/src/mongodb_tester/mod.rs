use std::thread;

use mongodb::Database;
use tokio::runtime::Runtime;

use abi::config::MongoDbConfig;

/// creates a uniquely named database and drops it again when the tester goes out of scope
pub struct MongoDbTester {
    pub config: MongoDbConfig,
}

impl MongoDbTester {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> MongoDbTester {
        let dbname = format!("test_{}", uuid::Uuid::new_v4().simple());
        MongoDbTester {
            config: MongoDbConfig {
                host: host.into(),
                port,
                user: user.into(),
                password: password.into(),
                database: dbname,
            },
        }
    }

    /// tester for a server on localhost with no credentials
    pub fn local() -> MongoDbTester {
        Self::new("localhost", 27017, "", "")
    }

    pub fn url(&self) -> String {
        self.config.url()
    }

    pub fn dbname(&self) -> &str {
        &self.config.database
    }

    pub async fn database(&self) -> Result<Database, mongodb::error::Error> {
        let client = mongodb::Client::with_uri_str(self.config.server_url()).await?;
        Ok(client.database(self.dbname()))
    }
}

impl Drop for MongoDbTester {
    fn drop(&mut self) {
        let server_url = self.config.server_url();
        let dbname = self.config.database.clone();
        let handle = thread::spawn(move || {
            let rt = match Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    eprintln!("create runtime error: {}", e);
                    return;
                }
            };
            rt.block_on(async move {
                match mongodb::Client::with_uri_str(server_url).await {
                    Ok(client) => {
                        if let Err(e) = client.database(&dbname).drop(None).await {
                            eprintln!("drop database {} error: {}", dbname, e);
                        }
                    }
                    Err(e) => eprintln!("connect mongodb error: {}", e),
                }
            });
        });
        let _ = handle.join();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_tester_gets_its_own_database() {
        let a = MongoDbTester::local();
        let b = MongoDbTester::local();
        assert!(a.dbname().starts_with("test_"));
        assert_ne!(a.dbname(), b.dbname());
        assert_eq!(a.url(), format!("mongodb://localhost:27017/{}", a.dbname()));
        // no server here, skip the drop
        std::mem::forget(a);
        std::mem::forget(b);
    }
}
