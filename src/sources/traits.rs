use crate::error::Result;
use crate::models::BaseOffer;
use async_trait::async_trait;

/// Common trait for everything that can supply base offers to the generator.
#[async_trait]
pub trait OfferSource: Send + Sync {
    /// Fetch the base offers, normalized to a list
    async fn fetch(&self) -> Result<Vec<BaseOffer>>;

    /// Human readable origin of the offers, used in logs
    fn source_name(&self) -> &str;
}
