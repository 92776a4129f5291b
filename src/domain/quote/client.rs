//! Quotes sub-client — latest spot prices.

use crate::client::BullionClient;
use crate::domain::quote::Quote;
use crate::error::SdkError;
use crate::shared::Metal;

/// Sub-client for latest-quote operations.
pub struct Quotes<'a> {
    pub(crate) client: &'a BullionClient,
}

impl<'a> Quotes<'a> {
    /// Latest quote for the client's configured metals.
    pub async fn latest(&self) -> Result<Quote, SdkError> {
        self.latest_for(&self.client.metals).await
    }

    /// Latest quote for an explicit metal set.
    pub async fn latest_for(&self, metals: &[Metal]) -> Result<Quote, SdkError> {
        let resp = self.client.http.get_latest(metals).await?;
        Ok(Quote::try_from(resp)?)
    }
}
