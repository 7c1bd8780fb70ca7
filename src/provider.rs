use serde::Deserialize;
use std::collections::HashMap;

/// DataForSEO API base host.
pub const DATAFORSEO_BASE_URL: &str = "https://api.dataforseo.com";

// Live-mode endpoints
pub const ON_PAGE_INSTANT_PAGES_ENDPOINT: &str = "/v3/on_page/instant_pages";
pub const ON_PAGE_LIGHTHOUSE_LIVE_ENDPOINT: &str = "/v3/on_page/lighthouse/live";
pub const BACKLINKS_SUMMARY_LIVE_ENDPOINT: &str = "/v3/backlinks/summary/live";
pub const BACKLINKS_DOMAIN_PAGES_LIVE_ENDPOINT: &str = "/v3/backlinks/domain_pages/live";

/// DataForSEO reports success as 20000 both on the outer response and on
/// each task inside it. Anything else is a failure, even on HTTP 200.
pub const TASK_SUCCESS_CODE: u32 = 20000;

/// Outer response envelope shared by every DataForSEO endpoint.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "R: Deserialize<'de>"))]
pub struct TaskResponse<R> {
    pub status_code: u32,
    #[serde(default)]
    pub status_message: Option<String>,
    #[serde(default)]
    pub tasks: Vec<Task<R>>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "R: Deserialize<'de>"))]
pub struct Task<R> {
    pub status_code: u32,
    #[serde(default)]
    pub status_message: Option<String>,
    #[serde(default)]
    pub result: Option<Vec<R>>,
}

/// Some endpoints nest their payload one level deeper:
/// `tasks[0].result[0].items[...]`.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ItemsEnvelope<T> {
    #[serde(default)]
    pub items: Option<Vec<T>>,
}

/// One page's worth of on-page metrics from `instant_pages`.
///
/// Every field is optional: the provider omits signals it could not measure,
/// and absence must survive into the normalized payload.
#[derive(Debug, Clone, Deserialize)]
pub struct OnPageSummaryItem {
    #[serde(default)]
    pub meta: Option<PageMeta>,
    #[serde(default)]
    pub checks: Option<HashMap<String, bool>>,
    #[serde(default)]
    pub page_timing: Option<PageTiming>,
    #[serde(default)]
    pub onpage_score: Option<f64>,
    #[serde(default)]
    pub total_images_count: Option<u64>,
    #[serde(default)]
    pub images_without_alt_count: Option<u64>,
    #[serde(default)]
    pub internal_links_count: Option<u64>,
    #[serde(default)]
    pub broken_links_count: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Heading level -> heading texts, e.g. `{"h1": ["Welcome"]}`.
    /// The provider has shipped both upper- and lowercase level keys.
    #[serde(default)]
    pub htags: Option<HashMap<String, Vec<String>>>,
    #[serde(default)]
    pub content: Option<PageContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageContent {
    #[serde(default)]
    pub plain_text_word_count: Option<u64>,
    #[serde(default)]
    pub plain_text_rate: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageTiming {
    #[serde(default)]
    pub largest_contentful_paint: Option<f64>,
    #[serde(default)]
    pub total_blocking_time: Option<f64>,
    #[serde(default)]
    pub cumulative_layout_shift: Option<f64>,
}

/// Lighthouse audit payload from `on_page/lighthouse/live`.
#[derive(Debug, Clone, Deserialize)]
pub struct LighthouseItem {
    #[serde(default)]
    pub audits: Option<LighthouseAudits>,
    #[serde(default)]
    pub categories: Option<LighthouseCategories>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LighthouseAudits {
    #[serde(default)]
    pub metrics: Option<MetricsAudit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsAudit {
    #[serde(default)]
    pub details: Option<MetricsDetails>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsDetails {
    #[serde(default)]
    pub items: Vec<MetricsItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsItem {
    #[serde(default)]
    pub largest_contentful_paint: Option<f64>,
    #[serde(default)]
    pub total_blocking_time: Option<f64>,
    #[serde(default)]
    pub cumulative_layout_shift: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LighthouseCategories {
    #[serde(default)]
    pub performance: Option<CategoryScore>,
    #[serde(default)]
    pub accessibility: Option<CategoryScore>,
    #[serde(default)]
    pub seo: Option<CategoryScore>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryScore {
    /// Lighthouse scores are 0.0-1.0; the report wants 0-100.
    #[serde(default)]
    pub score: Option<f64>,
}

/// Domain-level link profile from `backlinks/summary/live`.
#[derive(Debug, Clone, Deserialize)]
pub struct BacklinksSummary {
    #[serde(default)]
    pub rank: Option<u64>,
    #[serde(default)]
    pub backlinks: Option<u64>,
    #[serde(default)]
    pub referring_domains: Option<u64>,
    #[serde(default)]
    pub first_seen: Option<String>,
}

/// One entry from the `backlinks/domain_pages/live` listing.
#[derive(Debug, Clone, Deserialize)]
pub struct TopPageEntry {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub rank: Option<u64>,
    #[serde(default)]
    pub backlinks: Option<u64>,
    #[serde(default)]
    pub referring_domains: Option<u64>,
}
