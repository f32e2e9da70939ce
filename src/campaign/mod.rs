use serde::{Deserialize, Serialize};

pub mod db;
pub mod endpoints;
pub mod manager;
pub use endpoints::*;

pub type CampaignId = i64;

#[derive(Clone, Debug, PartialEq)]
pub struct Campaign {
    pub id: CampaignId,
    pub name: String,
    pub status: String,
    pub clicks: i64,
    pub cost: f64,
    pub impressions: i64,
}

/// Accepted values of the `status` filter. Anything else is rejected while
/// the query string is parsed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum StatusFilter {
    Active,
    Paused,
    All,
}

impl StatusFilter {
    /// The stored status to match, or `None` when no filtering applies.
    pub fn status(self) -> Option<&'static str> {
        match self {
            StatusFilter::Active => Some("Active"),
            StatusFilter::Paused => Some("Paused"),
            StatusFilter::All => None,
        }
    }
}
