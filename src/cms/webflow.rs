use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};
use url::Url;

use super::{Cms, CmsError, CmsItemPayload, ItemPage};
use crate::config::Config;

const PAGE_LIMIT: u64 = 100;

/// Webflow Data API v2 client scoped to one collection.
pub struct WebflowClient {
    http: Client,
    api_base: Url,
    token: String,
    collection_id: String,
}

#[derive(Deserialize)]
struct CreatedItem {
    #[serde(default)]
    id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PublishRequest<'a> {
    item_ids: [&'a str; 1],
}

impl WebflowClient {
    pub fn new(http: Client, config: &Config) -> Self {
        Self {
            http,
            api_base: config.api_base.clone(),
            token: config.api_token.clone(),
            collection_id: config.collection_id.clone(),
        }
    }

    fn url(&self, path: &str) -> Result<Url, CmsError> {
        Ok(self
            .api_base
            .join(&format!("collections/{}/{}", self.collection_id, path))?)
    }

    fn check(response: Response) -> Result<Response, CmsError> {
        let status = response.status();
        if status == StatusCode::CONFLICT {
            return Err(CmsError::Conflict);
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(CmsError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

impl Cms for WebflowClient {
    /// GET /collections/{id}/items
    fn list_items(&self, offset: u64) -> Result<ItemPage, CmsError> {
        let mut url = self.url("items")?;
        url.query_pairs_mut()
            .append_pair("offset", &offset.to_string())
            .append_pair("limit", &PAGE_LIMIT.to_string());

        let response = self.http.get(url).bearer_auth(&self.token).send()?;
        Ok(Self::check(response)?.json()?)
    }

    /// POST /collections/{id}/items
    fn create_item(&self, payload: &CmsItemPayload) -> Result<String, CmsError> {
        let url = self.url("items")?;
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(payload)
            .send()?;
        let body = Self::check(response)?.text()?;

        serde_json::from_str::<CreatedItem>(&body)
            .ok()
            .and_then(|created| created.id)
            .filter(|id| !id.trim().is_empty())
            .ok_or(CmsError::MissingItemId)
    }

    /// POST /collections/{id}/items/publish
    fn publish_item(&self, item_id: &str) -> Result<(), CmsError> {
        let url = self.url("items/publish")?;
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(&PublishRequest {
                item_ids: [item_id],
            })
            .send()?;
        Self::check(response)?;
        Ok(())
    }
}
