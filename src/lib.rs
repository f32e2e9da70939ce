use std::io::Error as IoError;
use std::net::TcpListener;

use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::web::{self, Data, PathConfig, QueryConfig, ServiceConfig};
use actix_web::{App, HttpResponse, HttpServer, ResponseError};
use tracing_actix_web::TracingLogger;

pub mod campaign;
pub mod config;
pub mod database;
pub mod error;
pub mod health;

pub use config::Config;
pub use database::{Database, PostgresDatabase};
pub use error::Error;

/// Registers every endpoint along with the extractor configuration that
/// routes parse failures through [`Error`].
pub fn configure(cfg: &mut ServiceConfig) {
    cfg.app_data(PathConfig::default().error_handler(|err, _req| {
        // format path errors with custom format
        Error::InvalidPath(err).into()
    }))
    .app_data(QueryConfig::default().error_handler(|err, _req| {
        // format query errors with custom format
        Error::InvalidQuery(err).into()
    }))
    .service(health::endpoints::get_service_info)
    .service(health::endpoints::get_health)
    .service(campaign::endpoints::get_campaigns)
    .service(campaign::endpoints::get_campaign_by_id);
}

pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
}

async fn path_does_not_exist() -> HttpResponse {
    Error::PathDoesNotExist.error_response()
}

pub fn run(listener: TcpListener, db: Box<dyn Database>) -> Result<Server, IoError> {
    let db = Data::new(db);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(db.clone())
            .wrap(cors())
            .wrap(TracingLogger::default())
            .configure(configure)
            .default_service(web::to(path_does_not_exist))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
