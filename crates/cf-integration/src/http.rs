//! HTTP client for the dashboard backend
//!
//! One request per call. Retries and caching are left to callers.

use crate::wire::{
    CommentThreadList, DeleteBody, ErrorBody, GenerateReplyResponse, PlaylistItemList, ReplyBody,
};
use async_trait::async_trait;
use cf_core::api::{CommentService, GeneratedReply};
use cf_core::comment::{ThreadedComment, Video};
use cf_core::config::ApiConfig;
use cf_core::error::{CommentFlowError, Result};
use cf_core::reply::GenerationRequest;
use cf_core::stats::{DashboardStats, WeeklyPoint};
use cf_core::types::{CommentId, ReplyId, VideoId};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, COOKIE};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

/// [`CommentService`] backed by the dashboard's JSON API
#[derive(Debug, Clone)]
pub struct HttpCommentService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCommentService {
    /// Build a client from API configuration
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(cookie) = &config.session_cookie {
            let value = HeaderValue::from_str(cookie).map_err(|_| {
                CommentFlowError::Config("session_cookie contains invalid characters".to_string())
            })?;
            headers.insert(COOKIE, value);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| CommentFlowError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and map transport failures and non-2xx responses
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        operation: &str,
    ) -> Result<reqwest::Response> {
        let resp = request
            .send()
            .await
            .map_err(|e| CommentFlowError::network(operation, e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.message())
                .unwrap_or(body);
            return Err(CommentFlowError::network(
                operation,
                format!("HTTP {status}: {detail}"),
            ));
        }

        debug!("{} -> {}", operation, status);
        Ok(resp)
    }

    async fn json<T: DeserializeOwned>(resp: reqwest::Response, operation: &str) -> Result<T> {
        resp.json::<T>()
            .await
            .map_err(|e| CommentFlowError::network(operation, format!("invalid response: {e}")))
    }
}

#[async_trait]
impl CommentService for HttpCommentService {
    async fn fetch_comments(&self, video_id: &VideoId) -> Result<Vec<ThreadedComment>> {
        let op = "fetch comments";
        let url = self.url(&format!("/youtube/comments/{}", video_id));
        let resp = self.send(self.client.get(url), op).await?;
        let list: CommentThreadList = Self::json(resp, op).await?;

        if list.comments_disabled {
            info!("Comments are disabled for video {}", video_id);
        }
        Ok(list
            .items
            .into_iter()
            .map(|item| item.into_threaded(video_id))
            .collect())
    }

    async fn generate_reply(&self, request: &GenerationRequest) -> Result<GeneratedReply> {
        let op = "generate reply";
        let resp = self
            .send(self.client.post(self.url("/ai/generate-reply")).json(request), op)
            .await?;
        let body: GenerateReplyResponse = Self::json(resp, op).await?;

        body.into_text()
            .map(|reply| GeneratedReply { reply })
            .ok_or_else(|| CommentFlowError::network(op, "response contained no reply text"))
    }

    async fn submit_reply(&self, comment_id: &CommentId, text: &str) -> Result<()> {
        let body = ReplyBody {
            comment_id: comment_id.as_str(),
            reply_text: text,
        };
        self.send(
            self.client.post(self.url("/youtube/comments/reply")).json(&body),
            "submit reply",
        )
        .await?;
        Ok(())
    }

    async fn delete_reply(&self, reply_id: &ReplyId) -> Result<()> {
        let body = DeleteBody {
            comment_id: reply_id.as_str(),
        };
        self.send(
            self.client.post(self.url("/youtube/comments/delete")).json(&body),
            "delete reply",
        )
        .await?;
        Ok(())
    }

    async fn fetch_videos(&self, max_results: u32) -> Result<Vec<Video>> {
        let op = "fetch videos";
        let request = self
            .client
            .get(self.url("/youtube/videos"))
            .query(&[("max_results", max_results)]);
        let resp = self.send(request, op).await?;
        let list: PlaylistItemList = Self::json(resp, op).await?;
        Ok(list.items.into_iter().map(|item| item.into_video()).collect())
    }

    async fn fetch_stats(&self) -> Result<DashboardStats> {
        let op = "fetch stats";
        let resp = self.send(self.client.get(self.url("/youtube/stats")), op).await?;
        Self::json(resp, op).await
    }

    async fn fetch_weekly_stats(&self) -> Result<Vec<WeeklyPoint>> {
        let op = "fetch weekly stats";
        let resp = self
            .send(self.client.get(self.url("/youtube/weekly-stats")), op)
            .await?;
        Self::json(resp, op).await
    }
}
