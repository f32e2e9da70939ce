use actix_web::get;
use actix_web::web::{Data, Json, Path, Query};
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::Error;

use super::{manager, Campaign, CampaignId, StatusFilter};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CampaignsQuery {
    pub status: Option<StatusFilter>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CampaignBody {
    pub id: CampaignId,
    pub name: String,
    pub status: String,
    pub clicks: i64,
    pub cost: f64,
    pub impressions: i64,
}

impl CampaignBody {
    pub fn render(campaign: Campaign) -> CampaignBody {
        CampaignBody {
            id: campaign.id,
            name: campaign.name,
            status: campaign.status,
            clicks: campaign.clicks,
            cost: campaign.cost,
            impressions: campaign.impressions,
        }
    }
}

#[get("/campaigns")]
#[tracing::instrument(skip(db))]
pub async fn get_campaigns(
    db: Data<Box<dyn Database>>,
    query: Query<CampaignsQuery>,
) -> Result<Json<Vec<CampaignBody>>, Error> {
    let query = query.into_inner();

    let campaigns = manager::get_campaigns(&***db, query.status).await?;

    let body = campaigns.into_iter().map(CampaignBody::render).collect();

    Ok(Json(body))
}

#[get("/campaigns/{campaign_id}")]
#[tracing::instrument(skip(db))]
pub async fn get_campaign_by_id(
    db: Data<Box<dyn Database>>,
    params: Path<CampaignId>,
) -> Result<Json<CampaignBody>, Error> {
    let campaign_id = params.into_inner();

    let campaign = manager::get_campaign_by_id(&***db, campaign_id).await?;

    Ok(Json(CampaignBody::render(campaign)))
}
