use std::process::ExitCode;

use clap::{arg, command};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;

use abi::config::{Config, LogConfig, LogOutput};

const DEFAULT_CONFIG: &str = "./abi/fixtures/social.yml";
const JWT_SECRET_ENV: &str = "SOCIAL_JWT_SECRET";

/// console or daily rolling file; the guard must live as long as the process logs
fn init_tracing(log: &LogConfig) -> Option<WorkerGuard> {
    let builder = tracing_subscriber::fmt()
        .with_line_number(true)
        .with_max_level(log.level());
    match log.output {
        LogOutput::Console => {
            builder.init();
            None
        }
        LogOutput::File => {
            let appender = tracing_appender::rolling::daily(&log.dir, "social.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            builder.with_ansi(false).with_writer(writer).init();
            Some(guard)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let matches = command!()
        .arg(arg!(-c --config <FILE> "path to the yaml config").default_value(DEFAULT_CONFIG))
        .get_matches();
    let path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or(DEFAULT_CONFIG);

    let mut config = match Config::load(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("failed to load config {}: {}", path, e);
            return ExitCode::FAILURE;
        }
    };
    if let Ok(secret) = std::env::var(JWT_SECRET_ENV) {
        config.server.jwt_secret = secret;
    }

    let _guard = init_tracing(&config.log);
    info!(
        "starting social server on {} with {:?} storage",
        config.server.server_url(),
        config.db.backend
    );

    if let Err(e) = api::start(config).await {
        error!("server exited: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
