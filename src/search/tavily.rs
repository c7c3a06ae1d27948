//! Tavily 搜索客户端

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::SearchConfig;
use crate::error::{CollaboratorError, PipelineError};
use crate::search::{SearchResultItem, Searcher};

#[derive(Debug, Serialize)]
struct TavilySearchRequest<'a> {
    query: &'a str,
    max_results: u32,
}

#[derive(Debug, Deserialize)]
struct TavilySearchResponse {
    results: Vec<SearchResultItem>,
}

/// 基于 reqwest 的 Tavily 搜索客户端
#[derive(Clone)]
pub struct TavilyClient {
    http: reqwest::Client,
    config: SearchConfig,
}

impl TavilyClient {
    pub fn new(config: SearchConfig) -> Result<Self, PipelineError> {
        if config.api_key.trim().is_empty() {
            return Err(PipelineError::Construction(
                "missing API key for search service (set DEEPRESEARCH_SEARCH_API_KEY or TAVILY_API_KEY)"
                    .to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| PipelineError::Construction(format!("search client: {}", e)))?;

        Ok(Self { http, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/search", self.config.api_base_url.trim_end_matches('/'))
    }

    fn map_transport_error(&self, err: reqwest::Error) -> CollaboratorError {
        if err.is_timeout() {
            CollaboratorError::Timeout {
                seconds: self.config.timeout_seconds,
            }
        } else {
            CollaboratorError::Transport(err.to_string())
        }
    }
}

/// 解析响应体，状态码非 2xx 时原样携带响应文本
pub fn parse_search_response(
    status: u16,
    body: &str,
) -> Result<Vec<SearchResultItem>, CollaboratorError> {
    if !(200..300).contains(&status) {
        return Err(CollaboratorError::Status {
            status,
            body: body.to_string(),
        });
    }

    let parsed: TavilySearchResponse =
        serde_json::from_str(body).map_err(|e| CollaboratorError::Malformed(e.to_string()))?;
    Ok(parsed.results)
}

#[async_trait]
impl Searcher for TavilyClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchResultItem>, CollaboratorError> {
        let request = TavilySearchRequest {
            query,
            max_results: self.config.max_results,
        };

        debug!(endpoint = %self.endpoint(), "调用搜索服务");

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        parse_search_response(status, &body)
    }
}
