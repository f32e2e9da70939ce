use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgPool, Postgres};
use tracing::{info, warn};

use crate::campaign::db::CampaignStore;
use crate::config::DatabaseConfig;
use crate::error::Error;

#[async_trait]
pub trait Database: Send + Sync {
    fn campaigns(&self) -> &dyn CampaignStore;

    /// Runs the liveness query on a connection from the pool, which may be
    /// newly opened or reused.
    async fn ping(&self) -> Result<(), Error>;
}

/// Where request handlers get their connection from. A database that could
/// not even be configured still produces a source; it just fails every
/// acquisition with the reason it is unusable.
#[derive(Clone, Debug)]
pub enum ConnectionSource {
    Pool(PgPool),
    Unavailable(String),
}

impl ConnectionSource {
    pub fn new(config: &DatabaseConfig) -> ConnectionSource {
        let url = match &config.url {
            Some(url) => url,
            None => {
                warn!("DATABASE_URL is not set, every database call will fail");
                return ConnectionSource::Unavailable("DATABASE_URL is not set".to_owned());
            }
        };

        let options = match url.parse::<PgConnectOptions>() {
            Ok(options) => options,
            Err(err) => {
                warn!("DATABASE_URL could not be parsed: {}", err);
                return ConnectionSource::Unavailable(err.to_string());
            }
        };

        info!(
            max_connections = config.max_connections,
            "creating lazy database pool"
        );
        let pool = PgPoolOptions::new()
            .min_connections(0)
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_lazy_with(options);

        ConnectionSource::Pool(pool)
    }

    /// The connection goes back to the pool when the returned guard drops.
    pub async fn acquire(&self) -> Result<PoolConnection<Postgres>, Error> {
        match self {
            ConnectionSource::Pool(pool) => pool
                .acquire()
                .await
                .map_err(|err| Error::DatabaseConnectionFailed(err.to_string())),
            ConnectionSource::Unavailable(reason) => {
                Err(Error::DatabaseConnectionFailed(reason.clone()))
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct PostgresCampaignStore {
    pub(crate) connections: ConnectionSource,
}

#[derive(Clone, Debug)]
pub struct PostgresDatabase {
    campaigns: PostgresCampaignStore,
    connections: ConnectionSource,
}

impl PostgresDatabase {
    pub fn new(config: &DatabaseConfig) -> PostgresDatabase {
        PostgresDatabase::with_connections(ConnectionSource::new(config))
    }

    pub fn with_connections(connections: ConnectionSource) -> PostgresDatabase {
        PostgresDatabase {
            campaigns: PostgresCampaignStore {
                connections: connections.clone(),
            },
            connections,
        }
    }
}

#[async_trait]
impl Database for PostgresDatabase {
    fn campaigns(&self) -> &dyn CampaignStore {
        &self.campaigns
    }

    #[tracing::instrument(skip(self))]
    async fn ping(&self) -> Result<(), Error> {
        let mut conn = self.connections.acquire().await?;
        sqlx::query("SELECT 1").execute(&mut *conn).await?;

        Ok(())
    }
}

#[cfg(test)]
pub mod test {
    use async_trait::async_trait;

    use crate::campaign::db::CampaignStore;
    use crate::campaign::{Campaign, CampaignId};
    use crate::error::Error;

    use super::Database;

    type Handler<A, R> = Box<dyn Fn(A) -> Result<R, Error> + Send + Sync>;

    pub struct MockCampaignStore {
        pub on_fetch_campaigns: Handler<(), Vec<Campaign>>,
        pub on_fetch_campaigns_by_status: Handler<String, Vec<Campaign>>,
        pub on_fetch_campaign_by_id: Handler<CampaignId, Option<Campaign>>,
    }

    impl MockCampaignStore {
        pub fn new() -> MockCampaignStore {
            MockCampaignStore {
                on_fetch_campaigns: Box::new(|_| unimplemented!("fetch_campaigns")),
                on_fetch_campaigns_by_status: Box::new(|_| {
                    unimplemented!("fetch_campaigns_by_status")
                }),
                on_fetch_campaign_by_id: Box::new(|_| unimplemented!("fetch_campaign_by_id")),
            }
        }
    }

    #[async_trait]
    impl CampaignStore for MockCampaignStore {
        async fn fetch_campaigns(&self) -> Result<Vec<Campaign>, Error> {
            (self.on_fetch_campaigns)(())
        }

        async fn fetch_campaigns_by_status(&self, status: &str) -> Result<Vec<Campaign>, Error> {
            (self.on_fetch_campaigns_by_status)(status.to_owned())
        }

        async fn fetch_campaign_by_id(
            &self,
            campaign_id: CampaignId,
        ) -> Result<Option<Campaign>, Error> {
            (self.on_fetch_campaign_by_id)(campaign_id)
        }
    }

    pub struct MockDatabase {
        pub campaigns: MockCampaignStore,
        pub on_ping: Handler<(), ()>,
    }

    impl MockDatabase {
        pub fn new() -> MockDatabase {
            MockDatabase {
                campaigns: MockCampaignStore::new(),
                on_ping: Box::new(|_| unimplemented!("ping")),
            }
        }
    }

    #[async_trait]
    impl Database for MockDatabase {
        fn campaigns(&self) -> &dyn CampaignStore {
            &self.campaigns
        }

        async fn ping(&self) -> Result<(), Error> {
            (self.on_ping)(())
        }
    }

    /// The two rows used throughout the tests, in id order.
    pub fn sample_campaigns() -> Vec<Campaign> {
        vec![
            Campaign {
                id: 1,
                name: "Spring Sale".to_owned(),
                status: "Active".to_owned(),
                clicks: 120,
                cost: 45.5,
                impressions: 3000,
            },
            Campaign {
                id: 2,
                name: "Winter Promo".to_owned(),
                status: "Paused".to_owned(),
                clicks: 30,
                cost: 10.0,
                impressions: 800,
            },
        ]
    }
}
