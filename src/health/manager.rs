use tracing::warn;

use crate::database::Database;

use super::{DatabaseStatus, HealthReport, HealthStatus};

/// Never fails: a broken database is part of the report, not an error.
#[tracing::instrument(skip(db))]
pub async fn check_health(db: &dyn Database) -> HealthReport {
    match db.ping().await {
        Ok(()) => HealthReport {
            status: HealthStatus::Healthy,
            database: DatabaseStatus::Connected,
            error: None,
        },
        Err(err) => {
            warn!("database health check failed: {}", err.detail());
            HealthReport {
                status: HealthStatus::Unhealthy,
                database: DatabaseStatus::Disconnected,
                error: Some(err.detail()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test::MockDatabase;
    use crate::error::Error;

    #[tokio::test]
    async fn healthy_when_ping_succeeds() {
        let mut db = MockDatabase::new();
        db.on_ping = Box::new(|_| Ok(()));

        let report = check_health(&db).await;

        assert_eq!(
            report,
            HealthReport {
                status: HealthStatus::Healthy,
                database: DatabaseStatus::Connected,
                error: None,
            }
        );
    }

    #[tokio::test]
    async fn unhealthy_report_carries_the_failure() {
        let mut db = MockDatabase::new();
        db.on_ping = Box::new(|_| {
            Err(Error::DatabaseConnectionFailed(
                "password authentication failed for user \"grippi\"".to_owned(),
            ))
        });

        let report = check_health(&db).await;

        assert_eq!(report.status, HealthStatus::Unhealthy);
        assert_eq!(report.database, DatabaseStatus::Disconnected);
        assert_eq!(
            report.error.as_deref(),
            Some("password authentication failed for user \"grippi\"")
        );
    }

    #[tokio::test]
    async fn query_failures_are_reported_too() {
        let mut db = MockDatabase::new();
        db.on_ping = Box::new(|_| Err(Error::QueryFailed(sqlx::Error::PoolClosed)));

        let report = check_health(&db).await;

        assert_eq!(report.database, DatabaseStatus::Disconnected);
        assert!(report.error.is_some());
    }
}
