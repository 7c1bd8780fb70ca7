use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flattened view of one page's SEO signals, ready to be embedded in the
/// synthesis prompt.
///
/// `None` means "the provider did not supply this signal" and is omitted from
/// the serialized payload; it is never collapsed into a zero or a false.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPageData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    pub h1_tags: Vec<String>,
    /// Heading level -> count, e.g. `{"H1": 1, "H2": 4}`. Sorted keys keep
    /// the serialized payload stable.
    pub header_tags_structure: BTreeMap<String, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_to_html_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_duplicate_content: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_images: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images_missing_alt_text: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub largest_contentful_paint_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_blocking_time_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cumulative_layout_shift: Option<f64>,
    /// 0-100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_mobile_friendly: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport_defined: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_internal_links: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub broken_internal_links: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_duplicate_title: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_duplicate_meta_description: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_indexable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_indexable_reason: Option<String>,
}

/// Domain-level link metrics from the backlinks summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OffPageMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_domain_authority: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referring_domains_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backlinks_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_seen: Option<String>,
}

/// One page from the top-pages listing, by backlink strength.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopPage {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backlinks: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referring_domains: Option<u64>,
}

/// Everything the synthesizer gets to see: one normalized page plus whatever
/// optional domain-level data survived the fan-out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedPayload {
    pub target_url: String,
    pub on_page_summary: NormalizedPageData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub off_page_summary: Option<OffPageMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_pages: Option<Vec<TopPage>>,
}

impl AggregatedPayload {
    /// Canonical text form embedded in the prompt. Struct field order plus
    /// sorted maps make this deterministic for identical inputs.
    pub fn to_prompt_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// --- Synthesized report ---
//
// This is the JSON contract with the generation model; the field names below
// must match what the prompt template asks for.

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoReport {
    pub analyzed_url: String,
    pub on_page_analysis: SeoSection,
    pub off_page_analysis: SeoSection,
    pub overall_summary: OverallSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeoSection {
    pub title: String,
    pub introduction: String,
    pub factors: Vec<SeoFactor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoFactor {
    pub factor_name: String,
    pub current_observation: String,
    pub importance: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallSummary {
    pub title: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub top_recommendations: Vec<PrioritizedRecommendation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrioritizedRecommendation {
    pub priority: u32,
    pub action: String,
    pub reasoning: String,
}
