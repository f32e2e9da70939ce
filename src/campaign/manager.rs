use crate::database::Database;
use crate::error::Error;

use super::{Campaign, CampaignId, StatusFilter};

#[tracing::instrument(skip(db))]
pub async fn get_campaigns(
    db: &dyn Database,
    status: Option<StatusFilter>,
) -> Result<Vec<Campaign>, Error> {
    let campaigns = match status.and_then(StatusFilter::status) {
        Some(status) => db.campaigns().fetch_campaigns_by_status(status).await?,
        None => db.campaigns().fetch_campaigns().await?,
    };

    Ok(campaigns)
}

#[tracing::instrument(skip(db))]
pub async fn get_campaign_by_id(
    db: &dyn Database,
    campaign_id: CampaignId,
) -> Result<Campaign, Error> {
    let campaign = db
        .campaigns()
        .fetch_campaign_by_id(campaign_id)
        .await?
        .ok_or(Error::CampaignNotFound { campaign_id })?;

    Ok(campaign)
}
