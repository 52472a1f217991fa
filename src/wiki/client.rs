use std::time::Instant;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::WikiSource;
use crate::config::Settings;
use crate::error::{Result, WikiError};

/// MediaWiki `action=parse` client for year pages (`page=<year>`).
#[derive(Debug, Clone)]
pub struct MediaWikiClient {
    http: Client,
    api_url: String,
}

impl MediaWikiClient {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let http = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .connect_timeout(settings.connect_timeout())
            .timeout(settings.request_timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            api_url: settings.api_url.clone(),
        })
    }

    async fn parse(&self, year: i32, prop: &str, section: Option<&str>) -> Result<Value> {
        let page = year.to_string();
        let mut params = vec![
            ("action", "parse"),
            ("page", page.as_str()),
            ("prop", prop),
            ("format", "json"),
            ("formatversion", "2"),
        ];
        if let Some(section) = section {
            params.push(("section", section));
        }

        let start = Instant::now();
        let resp = self
            .http
            .get(&self.api_url)
            .query(&params)
            .send()
            .await
            .map_err(WikiError::RemoteUnavailable)?;

        let status = resp.status();
        if !status.is_success() {
            warn!("Wikipedia answered {} for page={} prop={} section={:?}", status, page, prop, section);
            return Err(WikiError::RemoteRejected {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(WikiError::RemoteUnavailable)?;
        let json = serde_json::from_str(&body)?;

        debug!(
            "Fetched page={} prop={} section={:?} in {:.2}s ({} bytes)",
            page,
            prop,
            section,
            start.elapsed().as_secs_f32(),
            body.len()
        );
        Ok(json)
    }
}

#[async_trait]
impl WikiSource for MediaWikiClient {
    async fn table_of_contents(&self, year: i32) -> Result<Value> {
        let mut json = self.parse(year, "tocdata", None).await?;
        let toc = json
            .pointer_mut("/parse/tocdata")
            .map(Value::take)
            .unwrap_or_else(|| Value::Array(Vec::new()));
        info!("Fetched table of contents for {}", year);
        Ok(toc)
    }

    async fn section_text(&self, year: i32, index: &str) -> Result<String> {
        let json = self.parse(year, "wikitext", Some(index)).await?;
        let wikitext = json
            .pointer("/parse/wikitext")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        if wikitext.is_empty() {
            debug!("Section {} of {} is empty or missing", index, year);
        }
        Ok(wikitext)
    }
}
