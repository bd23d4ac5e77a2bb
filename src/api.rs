//! Remote collection client.
//!
//! One HTTP GET per page against the paginated list endpoints. No retries;
//! the only policy beyond a single attempt is the configured request timeout.

use std::marker::PhantomData;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::config::Config;
use crate::loader::PageFetcher;
use crate::model::{PageEnvelope, Resource};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to build HTTP client: {0}")]
    Build(reqwest::Error),
    #[error("Invalid endpoint URL: {0}")]
    Url(url::ParseError),
    #[error("Transport error: {0}")]
    Transport(reqwest::Error),
    #[error("Error al cargar los {}", .resource.noun())]
    Status {
        resource: Resource,
        code: reqwest::StatusCode,
    },
    #[error("Parse JSON error: {0}")]
    Decode(serde_json::Error),
}

pub struct Client {
    base: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(Error::Build)?;
        Ok(Self {
            base: config.base_url.clone(),
            http,
        })
    }

    /// `GET {base}/{resource}?page={n}`, 1-indexed.
    pub async fn fetch_page<T: DeserializeOwned>(
        &self,
        resource: Resource,
        page: u32,
    ) -> Result<PageEnvelope<T>, Error> {
        let url = self.base.join(resource.path()).map_err(Error::Url)?;
        let response = self
            .http
            .get(url)
            .query(&[("page", page)])
            .send()
            .await
            .map_err(Error::Transport)?;
        let code = response.status();
        if !code.is_success() {
            return Err(Error::Status { resource, code });
        }
        let body = response.text().await.map_err(Error::Transport)?;
        trace!(%resource, page, text = body.as_str(), "page response");
        let envelope = serde_json::from_str::<PageEnvelope<T>>(&body).map_err(Error::Decode)?;
        debug!(
            %resource,
            page,
            results = envelope.results.len(),
            pages = envelope.pages,
            count = envelope.count,
            "page fetched"
        );
        Ok(envelope)
    }

    /// Typed per-resource handle implementing the loader's fetch seam.
    pub fn collection<T: DeserializeOwned>(&self, resource: Resource) -> RemoteCollection<'_, T> {
        RemoteCollection {
            client: self,
            resource,
            _items: PhantomData,
        }
    }
}

/// A paginated remote list endpoint, fixed to one resource and item type.
pub struct RemoteCollection<'a, T> {
    client: &'a Client,
    resource: Resource,
    _items: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned + Send> PageFetcher<T> for RemoteCollection<'_, T> {
    type Error = Error;

    fn fetch_page(
        &self,
        page: u32,
    ) -> impl Future<Output = Result<PageEnvelope<T>, Self::Error>> + Send {
        self.client.fetch_page(self.resource, page)
    }
}
