use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row, TypeInfo, ValueRef};

use crate::database::PostgresCampaignStore;
use crate::error::Error;

use super::{Campaign, CampaignId};

const SELECT_CAMPAIGNS: &str = "SELECT * FROM campaigns ORDER BY id";
const SELECT_CAMPAIGNS_BY_STATUS: &str = "SELECT * FROM campaigns WHERE status = $1 ORDER BY id";
const SELECT_CAMPAIGN_BY_ID: &str = "SELECT * FROM campaigns WHERE id = $1";

#[async_trait]
pub trait CampaignStore: Send + Sync {
    async fn fetch_campaigns(&self) -> Result<Vec<Campaign>, Error>;

    async fn fetch_campaigns_by_status(&self, status: &str) -> Result<Vec<Campaign>, Error>;

    async fn fetch_campaign_by_id(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Option<Campaign>, Error>;
}

/// How a numeric column is stored, judged by its Postgres type name.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NumericColumn {
    Int2,
    Int4,
    Int8,
    Float4,
    Float8,
    Numeric,
    Other,
}

impl NumericColumn {
    pub fn of(type_name: &str) -> NumericColumn {
        match type_name {
            "INT2" => NumericColumn::Int2,
            "INT4" => NumericColumn::Int4,
            "INT8" => NumericColumn::Int8,
            "FLOAT4" => NumericColumn::Float4,
            "FLOAT8" => NumericColumn::Float8,
            "NUMERIC" => NumericColumn::Numeric,
            _ => NumericColumn::Other,
        }
    }
}

/// The cost column as stored: exact decimals get converted, anything else
/// is already a float.
#[derive(Clone, Debug, PartialEq)]
pub enum Cost {
    Exact(Decimal),
    Float(f64),
}

/// One row of the `campaigns` table as Postgres hands it over.
#[derive(Clone, Debug, PartialEq)]
pub struct CampaignRow {
    pub id: CampaignId,
    pub name: String,
    pub status: String,
    pub clicks: i64,
    pub cost: Cost,
    pub impressions: i64,
}

impl<'r> FromRow<'r, PgRow> for CampaignRow {
    fn from_row(row: &'r PgRow) -> Result<CampaignRow, sqlx::Error> {
        Ok(CampaignRow {
            id: integer(row, "id")?,
            name: row.try_get("name")?,
            status: row.try_get("status")?,
            clicks: integer(row, "clicks")?,
            cost: cost(row, "cost")?,
            impressions: integer(row, "impressions")?,
        })
    }
}

fn column_kind(row: &PgRow, column: &str) -> Result<NumericColumn, sqlx::Error> {
    let raw = row.try_get_raw(column)?;
    let kind = NumericColumn::of(raw.type_info().name());

    Ok(kind)
}

fn integer(row: &PgRow, column: &str) -> Result<i64, sqlx::Error> {
    match column_kind(row, column)? {
        NumericColumn::Int2 => Ok(row.try_get::<i16, _>(column)?.into()),
        NumericColumn::Int4 => Ok(row.try_get::<i32, _>(column)?.into()),
        _ => row.try_get::<i64, _>(column),
    }
}

fn cost(row: &PgRow, column: &str) -> Result<Cost, sqlx::Error> {
    match column_kind(row, column)? {
        NumericColumn::Float4 => Ok(Cost::Float(row.try_get::<f32, _>(column)?.into())),
        NumericColumn::Float8 => Ok(Cost::Float(row.try_get(column)?)),
        NumericColumn::Int2 | NumericColumn::Int4 | NumericColumn::Int8 => {
            Ok(Cost::Float(integer(row, column)? as f64))
        }
        _ => Ok(Cost::Exact(row.try_get(column)?)),
    }
}

impl TryFrom<CampaignRow> for Campaign {
    type Error = Error;

    fn try_from(row: CampaignRow) -> Result<Campaign, Error> {
        let cost = match row.cost {
            Cost::Exact(exact) => exact.to_f64().ok_or_else(|| {
                Error::QueryFailed(sqlx::Error::ColumnDecode {
                    index: "cost".to_owned(),
                    source: format!("{} does not fit in a 64-bit float", exact).into(),
                })
            })?,
            Cost::Float(float) => float,
        };

        Ok(Campaign {
            id: row.id,
            name: row.name,
            status: row.status,
            clicks: row.clicks,
            cost,
            impressions: row.impressions,
        })
    }
}

fn into_campaigns(rows: Vec<CampaignRow>) -> Result<Vec<Campaign>, Error> {
    rows.into_iter().map(Campaign::try_from).collect()
}

#[async_trait]
impl CampaignStore for PostgresCampaignStore {
    #[tracing::instrument(skip(self))]
    async fn fetch_campaigns(&self) -> Result<Vec<Campaign>, Error> {
        let mut conn = self.connections.acquire().await?;
        let rows: Vec<CampaignRow> = sqlx::query_as(SELECT_CAMPAIGNS)
            .fetch_all(&mut *conn)
            .await?;

        into_campaigns(rows)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaigns_by_status(&self, status: &str) -> Result<Vec<Campaign>, Error> {
        let mut conn = self.connections.acquire().await?;
        let rows: Vec<CampaignRow> = sqlx::query_as(SELECT_CAMPAIGNS_BY_STATUS)
            .bind(status)
            .fetch_all(&mut *conn)
            .await?;

        into_campaigns(rows)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaign_by_id(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Option<Campaign>, Error> {
        let mut conn = self.connections.acquire().await?;
        let row: Option<CampaignRow> = sqlx::query_as(SELECT_CAMPAIGN_BY_ID)
            .bind(campaign_id)
            .fetch_optional(&mut *conn)
            .await?;

        row.map(Campaign::try_from).transpose()
    }
}
