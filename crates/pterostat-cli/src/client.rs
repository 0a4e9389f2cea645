use async_trait::async_trait;
use pterostat_common::{ApiItem, PageEnvelope};
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::error::ApiError;

/// Versioned media type of the panel's application API.
pub const API_ACCEPT: &str = "Application/vnd.pterodactyl.v1+json";

const BODY_EXCERPT_CHARS: usize = 200;

pub fn auth(builder: reqwest::RequestBuilder, token: &str) -> reqwest::RequestBuilder {
    builder.bearer_auth(token).header(ACCEPT, API_ACCEPT)
}

/// Something that can return one raw page of a list endpoint.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(
        &self,
        endpoint: &str,
        params: &[(String, String)],
        page: u32,
    ) -> Result<Value, ApiError>;
}

pub struct ApiClient {
    http: Client,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        // Certificate and hostname verification stay on.
        let http = Client::builder()
            .danger_accept_invalid_certs(false)
            .user_agent(concat!("pterostat/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config })
    }
}

#[async_trait]
impl PageSource for ApiClient {
    async fn fetch_page(
        &self,
        endpoint: &str,
        params: &[(String, String)],
        page: u32,
    ) -> Result<Value, ApiError> {
        let url = self.config.endpoint_url(endpoint);
        tracing::debug!(%url, page, "fetching page");

        let resp = auth(self.http.get(&url), &self.config.token)
            .query(params)
            .query(&[("page", page)])
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: body.chars().take(BODY_EXCERPT_CHARS).collect(),
            });
        }

        let value: Value = serde_json::from_str(&body)?;
        if value.is_null() {
            return Err(ApiError::null_body());
        }
        Ok(value)
    }
}

/// Walk every page of `endpoint`, starting at page 1, and return all list
/// items in page order.
pub async fn fetch_all<T, S>(
    source: &S,
    endpoint: &str,
    params: &[(String, String)],
) -> Result<Vec<T>, ApiError>
where
    T: DeserializeOwned,
    S: PageSource + ?Sized,
{
    let mut items = Vec::new();
    let mut page = 1u32;

    loop {
        let raw = source.fetch_page(endpoint, params, page).await?;
        let envelope: PageEnvelope<T> = serde_json::from_value(raw)?;
        let last = envelope.is_last_page(page);
        items.extend(envelope.into_items());

        if last {
            break;
        }
        page += 1;
    }

    tracing::info!(endpoint, pages = page, items = items.len(), "fetched list");
    Ok(items)
}

/// Like [`fetch_all`], but decodes every item's `attributes` as `T`. A single
/// malformed item fails the whole fetch.
pub async fn fetch_attributes<T, S>(
    source: &S,
    endpoint: &str,
    params: &[(String, String)],
) -> Result<Vec<T>, ApiError>
where
    T: DeserializeOwned,
    S: PageSource + ?Sized,
{
    let items: Vec<ApiItem<T>> = fetch_all(source, endpoint, params).await?;
    Ok(items.into_iter().map(|item| item.attributes).collect())
}
