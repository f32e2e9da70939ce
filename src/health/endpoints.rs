use actix_web::get;
use actix_web::web::{Data, Json};
use serde::{Deserialize, Serialize};

use crate::database::Database;

use super::{manager, DatabaseStatus, HealthReport, HealthStatus};

const SERVICE_NAME: &str = "Grippi Campaign Analytics API";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceInfoBody {
    pub message: String,
    pub version: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HealthBody {
    pub status: HealthStatus,
    pub database: DatabaseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthBody {
    pub fn render(report: HealthReport) -> HealthBody {
        HealthBody {
            status: report.status,
            database: report.database,
            error: report.error,
        }
    }
}

#[get("/")]
#[tracing::instrument]
pub async fn get_service_info() -> Json<ServiceInfoBody> {
    Json(ServiceInfoBody {
        message: SERVICE_NAME.to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
    })
}

#[get("/health")]
#[tracing::instrument(skip(db))]
pub async fn get_health(db: Data<Box<dyn Database>>) -> Json<HealthBody> {
    let report = manager::check_health(&***db).await;

    Json(HealthBody::render(report))
}
