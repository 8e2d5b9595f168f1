use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{CatalogError, Result};
use crate::types::CatalogItemDto;

/// Raw transport to the catalog service. The policy stack in `CatalogClient`
/// wraps this seam, so tests substitute scripted implementations.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn fetch_item(&self, id: Uuid) -> Result<CatalogItemDto>;
}

pub struct HttpCatalogApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalogApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn fetch_item(&self, id: Uuid) -> Result<CatalogItemDto> {
        let url = format!("{}/items/{}", self.base_url, id);
        let resp = self.client.get(&url).send().await?;

        let status = resp.status();
        // Server-side failures and upstream timeouts are worth retrying;
        // everything else non-2xx is a well-formed rejection.
        if status.is_server_error() || status.as_u16() == 408 {
            let message = resp.text().await.unwrap_or_default();
            return Err(CatalogError::Unavailable {
                status: status.as_u16(),
                message,
            });
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(CatalogError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        resp.json::<CatalogItemDto>()
            .await
            .map_err(|err| CatalogError::Parse(err.to_string()))
    }
}
