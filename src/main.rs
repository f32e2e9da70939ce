use std::io::Error as IoError;
use std::net::TcpListener;

use campaign_analytics::{Config, PostgresDatabase};
use tracing::info;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> Result<(), IoError> {
    // a missing .env file is fine, the environment may already be set
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_span_events(FmtSpan::NEW)
        .compact()
        .init();

    let config = Config::from_env()?;
    let db = PostgresDatabase::new(&config.database);

    let listener = TcpListener::bind((config.host.as_str(), config.port))?;
    info!("listening on {}", listener.local_addr()?);

    campaign_analytics::run(listener, Box::new(db))?.await
}
