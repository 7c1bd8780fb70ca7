use crate::config::Credentials;
use crate::error::ReportError;
use crate::provider::{
    BACKLINKS_DOMAIN_PAGES_LIVE_ENDPOINT, BACKLINKS_SUMMARY_LIVE_ENDPOINT, BacklinksSummary,
    ItemsEnvelope, LighthouseItem, ON_PAGE_INSTANT_PAGES_ENDPOINT,
    ON_PAGE_LIGHTHOUSE_LIVE_ENDPOINT, OnPageSummaryItem, TASK_SUCCESS_CODE, Task, TaskResponse,
    TopPageEntry,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;

/// Outcome of a supplementary fetch. A failed optional fetch narrows the
/// payload instead of aborting the pipeline, so it is not an `Err`.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Fetched(T),
    Failed(String),
}

impl<T> FetchOutcome<T> {
    /// Logs the failure reason (if any) and degrades to `None`.
    pub fn ok_or_log(self, endpoint: &str) -> Option<T> {
        match self {
            FetchOutcome::Fetched(value) => Some(value),
            FetchOutcome::Failed(reason) => {
                tracing::warn!(endpoint = %endpoint, reason = %reason, "Optional fetch failed, continuing without it");
                None
            }
        }
    }
}

impl<T> From<Result<T, ReportError>> for FetchOutcome<T> {
    fn from(result: Result<T, ReportError>) -> Self {
        match result {
            Ok(value) => FetchOutcome::Fetched(value),
            Err(e) => FetchOutcome::Failed(e.to_string()),
        }
    }
}

/// Authenticated client for the DataForSEO v3 API.
///
/// Single attempt per call; nothing here retries. Credentials are passed per
/// request rather than stored so fetchers stay pure functions of their input.
pub struct SeoDataClient {
    client: reqwest::Client,
    base_url: String,
}

impl SeoDataClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// POSTs a JSON task payload with Basic auth and decodes the envelope.
    async fn request<R>(
        &self,
        endpoint: &str,
        credentials: &Credentials,
        body: &impl Serialize,
    ) -> Result<TaskResponse<R>, ReportError>
    where
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!(endpoint = %endpoint, "DataForSEO request");

        let response = self
            .client
            .post(&url)
            .basic_auth(
                &credentials.dataforseo_login,
                Some(&credentials.dataforseo_password),
            )
            .json(body)
            .send()
            .await
            .map_err(|source| ReportError::ProviderTransport {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(ReportError::ProviderHttp {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body_excerpt: ReportError::excerpt(&body_text),
            });
        }

        response
            .json::<TaskResponse<R>>()
            .await
            .map_err(|source| ReportError::ProviderTransport {
                endpoint: endpoint.to_string(),
                source,
            })
    }

    /// Validates the task envelope and pulls out the result array.
    ///
    /// The provider can answer HTTP 200 and still report a failed task, so
    /// both the outer and the task status code must be the success sentinel.
    fn task_results<R>(
        endpoint: &str,
        response: TaskResponse<R>,
    ) -> Result<Vec<R>, ReportError> {
        if response.status_code != TASK_SUCCESS_CODE {
            return Err(ReportError::ProviderTask {
                endpoint: endpoint.to_string(),
                reason: format!(
                    "response status {}: {}",
                    response.status_code,
                    response.status_message.unwrap_or_default()
                ),
            });
        }

        let task: Task<R> = response.tasks.into_iter().next().ok_or_else(|| {
            ReportError::ProviderTask {
                endpoint: endpoint.to_string(),
                reason: "response contained no tasks".to_string(),
            }
        })?;

        if task.status_code != TASK_SUCCESS_CODE {
            return Err(ReportError::ProviderTask {
                endpoint: endpoint.to_string(),
                reason: format!(
                    "task status {}: {}",
                    task.status_code,
                    task.status_message.unwrap_or_default()
                ),
            });
        }

        match task.result {
            Some(result) if !result.is_empty() => Ok(result),
            _ => Err(ReportError::ProviderTask {
                endpoint: endpoint.to_string(),
                reason: "task returned an empty result array".to_string(),
            }),
        }
    }

    /// Unwraps `tasks[0].result[0].items[0]` for the endpoints that nest one
    /// level deeper.
    fn first_item<R>(endpoint: &str, results: Vec<ItemsEnvelope<R>>) -> Result<R, ReportError> {
        results
            .into_iter()
            .next()
            .and_then(|envelope| envelope.items)
            .and_then(|items| items.into_iter().next())
            .ok_or_else(|| ReportError::ProviderTask {
                endpoint: endpoint.to_string(),
                reason: "result contained no items".to_string(),
            })
    }

    /// Primary fetch: live on-page summary for one URL. Failure here is
    /// fatal to the whole pipeline, so errors propagate.
    pub async fn fetch_on_page_summary(
        &self,
        target_url: &str,
        credentials: &Credentials,
    ) -> Result<OnPageSummaryItem, ReportError> {
        let endpoint = ON_PAGE_INSTANT_PAGES_ENDPOINT;
        let payload = json!([{
            "url": target_url,
            "load_resources": true,
            "enable_javascript": false,
        }]);

        let response = self
            .request::<ItemsEnvelope<OnPageSummaryItem>>(endpoint, credentials, &payload)
            .await?;
        let results = Self::task_results(endpoint, response)?;
        Self::first_item(endpoint, results)
    }

    /// Optional fetch: Lighthouse audit for performance metrics.
    pub async fn fetch_lighthouse(
        &self,
        target_url: &str,
        credentials: &Credentials,
        for_mobile: bool,
    ) -> FetchOutcome<LighthouseItem> {
        let endpoint = ON_PAGE_LIGHTHOUSE_LIVE_ENDPOINT;
        let payload = json!([{
            "url": target_url,
            "for_mobile": for_mobile,
        }]);

        let result = async {
            let response = self
                .request::<ItemsEnvelope<LighthouseItem>>(endpoint, credentials, &payload)
                .await?;
            let results = Self::task_results(endpoint, response)?;
            Self::first_item(endpoint, results)
        }
        .await;

        result.into()
    }

    /// Optional fetch: domain-level backlink profile.
    pub async fn fetch_backlinks_summary(
        &self,
        target_url: &str,
        credentials: &Credentials,
    ) -> FetchOutcome<BacklinksSummary> {
        let endpoint = BACKLINKS_SUMMARY_LIVE_ENDPOINT;
        let payload = json!([{ "target": target_url }]);

        let result = async {
            let response = self
                .request::<BacklinksSummary>(endpoint, credentials, &payload)
                .await?;
            let results = Self::task_results(endpoint, response)?;
            // Backlinks summary puts its payload directly in result[0].
            results
                .into_iter()
                .next()
                .ok_or_else(|| ReportError::ProviderTask {
                    endpoint: endpoint.to_string(),
                    reason: "task returned an empty result array".to_string(),
                })
        }
        .await;

        result.into()
    }

    /// Optional fetch: the domain's strongest pages by backlink profile.
    pub async fn fetch_top_pages(
        &self,
        target_url: &str,
        credentials: &Credentials,
        limit: u32,
    ) -> FetchOutcome<Vec<TopPageEntry>> {
        let endpoint = BACKLINKS_DOMAIN_PAGES_LIVE_ENDPOINT;
        let payload = json!([{
            "target": target_url,
            "limit": limit,
        }]);

        let result = async {
            let response = self
                .request::<ItemsEnvelope<TopPageEntry>>(endpoint, credentials, &payload)
                .await?;
            let results = Self::task_results(endpoint, response)?;
            let items = results
                .into_iter()
                .next()
                .and_then(|envelope| envelope.items)
                .unwrap_or_default();
            if items.is_empty() {
                return Err(ReportError::ProviderTask {
                    endpoint: endpoint.to_string(),
                    reason: "listing contained no pages".to_string(),
                });
            }
            Ok(items)
        }
        .await;

        result.into()
    }
}
