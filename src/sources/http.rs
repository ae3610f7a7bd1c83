use crate::error::{OfferError, Result};
use crate::models::BaseOffer;
use crate::sources::traits::OfferSource;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, info, warn};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Endpoint body: either one base offer or a list of them
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<BaseOffer>),
    One(BaseOffer),
}

impl From<OneOrMany> for Vec<BaseOffer> {
    fn from(body: OneOrMany) -> Self {
        match body {
            OneOrMany::Many(offers) => offers,
            OneOrMany::One(offer) => vec![offer],
        }
    }
}

/// Fetches base offers with a single JSON GET request
pub struct HttpOfferSource {
    client: Client,
    url: Url,
}

impl HttpOfferSource {
    /// Create a source for `url`; only http and https URLs are accepted
    pub fn new(url: &str) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|err| OfferError::Argument(format!("invalid url '{url}': {err}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(OfferError::Argument(format!(
                "unsupported url scheme '{}'",
                url.scheme()
            )));
        }

        // No timeout is configured, reqwest defaults apply.
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| OfferError::Fetch(format!("failed to create HTTP client: {err}")))?;

        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// Decode an endpoint body into a list of base offers.
pub fn parse_base_offers(body: &[u8]) -> Result<Vec<BaseOffer>> {
    let parsed: OneOrMany = serde_json::from_slice(body)
        .map_err(|err| OfferError::Fetch(format!("malformed JSON body: {err}")))?;
    Ok(parsed.into())
}

#[async_trait]
impl OfferSource for HttpOfferSource {
    async fn fetch(&self) -> Result<Vec<BaseOffer>> {
        info!("Fetching base offers from {}", self.url);

        let response = self.client.get(self.url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Endpoint returned status: {}", status);
            return Err(OfferError::Fetch(format!(
                "{} responded with {}",
                self.url, status
            )));
        }

        let body = response.bytes().await?;
        debug!("Downloaded {} bytes of JSON", body.len());

        let offers = parse_base_offers(&body)?;
        info!("Received {} base offers", offers.len());
        Ok(offers)
    }

    fn source_name(&self) -> &str {
        self.url.as_str()
    }
}
