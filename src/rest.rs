//! HTTP implementation of [`RemoteStore`] against a PostgREST-style API
//! (one resource per collection, filters and ordering in query parameters).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::time::Duration;

use crate::error::RemoteError;
use crate::model::Collection;
use crate::remote::RemoteStore;

pub struct RestStore {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl RestStore {
    /// `base_url` is the REST root (e.g. `https://xyz.example.co/rest/v1`).
    /// Every request is bounded by `timeout`.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("parvis/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url, api_key })
    }

    fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        let mut req = self.client.request(method, url);
        if let Some(key) = &self.api_key {
            req = req.header("apikey", key).header("Authorization", format!("Bearer {key}"));
        }
        req
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(RemoteError::Remote { status: status.as_u16(), message })
    }
}

#[async_trait]
impl RemoteStore for RestStore {
    async fn fetch_rows(
        &self,
        collection: Collection,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Value>, RemoteError> {
        let url = format!("{}/{}", self.base_url, collection.as_str());
        let now_iso = now.to_rfc3339();
        let response = self
            .request(reqwest::Method::GET, url)
            .query(&[
                ("select", "*"),
                ("or", &format!("(scheduled_at.is.null,scheduled_at.lte.{now_iso})")),
                ("order", "scheduled_at.desc.nullsfirst"),
                ("limit", &limit.to_string()),
            ])
            .send()
            .await?;
        let rows = Self::check(response).await?.json::<Vec<Value>>().await?;
        Ok(rows)
    }

    async fn insert_row(&self, collection: Collection, row: Value) -> Result<(), RemoteError> {
        let url = format!("{}/{}", self.base_url, collection.as_str());
        let response = self.request(reqwest::Method::POST, url).json(&row).send().await?;
        Self::check(response).await.map(|_| ())
    }

    async fn update_row(&self, collection: Collection, id: &str, patch: Value) -> Result<(), RemoteError> {
        let url = format!("{}/{}", self.base_url, collection.as_str());
        let response = self
            .request(reqwest::Method::PATCH, url)
            .query(&[("id", format!("eq.{id}"))])
            .json(&patch)
            .send()
            .await?;
        Self::check(response).await.map(|_| ())
    }

    async fn delete_row(&self, collection: Collection, id: &str) -> Result<(), RemoteError> {
        let url = format!("{}/{}", self.base_url, collection.as_str());
        let response = self
            .request(reqwest::Method::DELETE, url)
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await?;
        Self::check(response).await.map(|_| ())
    }
}
