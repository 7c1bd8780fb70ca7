use crate::models::{AggregatedPayload, NormalizedPageData, OffPageMetrics, TopPage};
use crate::provider::{BacklinksSummary, LighthouseItem, MetricsItem, OnPageSummaryItem, TopPageEntry};
use std::collections::BTreeMap;
use std::collections::HashMap;

// The provider has renamed boolean checks between API versions. Each target
// field probes its candidates in order; the first key present wins, and no
// match leaves the field absent.
const MOBILE_FRIENDLY_CHECKS: &[&str] = &["mobile_friendly", "is_mobile_friendly"];
const VIEWPORT_CHECKS: &[&str] = &["viewport", "has_meta_viewport"];
const DUPLICATE_CONTENT_CHECKS: &[&str] = &["duplicate_content", "has_duplicate_content"];
const DUPLICATE_TITLE_CHECKS: &[&str] = &["duplicate_title", "has_duplicate_title"];
const DUPLICATE_DESCRIPTION_CHECKS: &[&str] =
    &["duplicate_description", "duplicate_meta_description"];

// Checks that make a page non-indexable, in the order the reason is reported.
const NON_INDEXABLE_CHECKS: &[(&str, &str)] = &[
    ("is_robots_txt_disallowed", "robots.txt"),
    ("is_meta_robots_disallowed", "meta_noindex"),
    ("noindex_meta_tag", "meta_noindex"),
    ("noindex_header", "x-robots-tag_noindex"),
];

/// Reshapes the settled fetch results into the single payload handed to the
/// synthesizer. Pure and deterministic: no clock, no randomness, no I/O.
///
/// Only the on-page summary is required. Each optional source that is `None`
/// leaves its fields absent rather than defaulted.
pub fn normalize(
    target_url: &str,
    summary: &OnPageSummaryItem,
    lighthouse: Option<&LighthouseItem>,
    backlinks: Option<&BacklinksSummary>,
    top_pages: Option<&[TopPageEntry]>,
) -> AggregatedPayload {
    AggregatedPayload {
        target_url: target_url.to_string(),
        on_page_summary: normalize_page(summary, lighthouse),
        off_page_summary: backlinks.map(normalize_off_page),
        top_pages: top_pages.map(normalize_top_pages),
    }
}

fn normalize_page(
    summary: &OnPageSummaryItem,
    lighthouse: Option<&LighthouseItem>,
) -> NormalizedPageData {
    let meta = summary.meta.as_ref();
    let content = meta.and_then(|m| m.content.as_ref());
    let checks = summary.checks.as_ref();
    let timing = summary.page_timing.as_ref();
    let metrics = lighthouse.and_then(lighthouse_metrics);

    NormalizedPageData {
        page_title: meta.and_then(|m| m.title.clone()),
        meta_description: meta.and_then(|m| m.description.clone()),
        h1_tags: h1_tags(meta.and_then(|m| m.htags.as_ref())),
        header_tags_structure: heading_structure(meta.and_then(|m| m.htags.as_ref())),
        word_count: content.and_then(|c| c.plain_text_word_count),
        text_to_html_ratio: content.and_then(|c| c.plain_text_rate),
        has_duplicate_content: probe(checks, DUPLICATE_CONTENT_CHECKS),
        total_images: summary.total_images_count,
        images_missing_alt_text: summary.images_without_alt_count,
        // Core Web Vitals: the dedicated Lighthouse audit is the most
        // specific source, the summary's own timing block is the fallback.
        largest_contentful_paint_ms: metrics
            .and_then(|m| m.largest_contentful_paint)
            .or_else(|| timing.and_then(|t| t.largest_contentful_paint)),
        total_blocking_time_ms: metrics
            .and_then(|m| m.total_blocking_time)
            .or_else(|| timing.and_then(|t| t.total_blocking_time)),
        cumulative_layout_shift: metrics
            .and_then(|m| m.cumulative_layout_shift)
            .or_else(|| timing.and_then(|t| t.cumulative_layout_shift)),
        performance_score: performance_score(summary, lighthouse),
        is_mobile_friendly: probe(checks, MOBILE_FRIENDLY_CHECKS),
        viewport_defined: probe(checks, VIEWPORT_CHECKS),
        total_internal_links: summary.internal_links_count,
        broken_internal_links: summary.broken_links_count,
        has_duplicate_title: probe(checks, DUPLICATE_TITLE_CHECKS),
        has_duplicate_meta_description: probe(checks, DUPLICATE_DESCRIPTION_CHECKS),
        is_indexable: is_indexable(checks),
        non_indexable_reason: non_indexable_reason(checks),
    }
}

/// First-matching candidate wins; a page with no checks map at all reports
/// nothing rather than false.
fn probe(checks: Option<&HashMap<String, bool>>, candidates: &[&str]) -> Option<bool> {
    let checks = checks?;
    candidates
        .iter()
        .find_map(|candidate| checks.get(*candidate).copied())
}

fn h1_tags(htags: Option<&HashMap<String, Vec<String>>>) -> Vec<String> {
    let Some(htags) = htags else {
        return Vec::new();
    };
    htags
        .iter()
        .find(|(level, _)| level.eq_ignore_ascii_case("h1"))
        .map(|(_, tags)| tags.clone())
        .unwrap_or_default()
}

/// Heading level -> count, keys uppercased. No headings is a valid (empty)
/// structure, not an error.
fn heading_structure(htags: Option<&HashMap<String, Vec<String>>>) -> BTreeMap<String, usize> {
    htags
        .map(|htags| {
            htags
                .iter()
                .map(|(level, tags)| (level.to_uppercase(), tags.len()))
                .collect()
        })
        .unwrap_or_default()
}

fn lighthouse_metrics(lighthouse: &LighthouseItem) -> Option<&MetricsItem> {
    lighthouse
        .audits
        .as_ref()?
        .metrics
        .as_ref()?
        .details
        .as_ref()?
        .items
        .first()
}

/// The dedicated audit's score (0.0-1.0, scaled to 0-100) wins over the
/// summary's own score; with neither source the field stays absent.
fn performance_score(
    summary: &OnPageSummaryItem,
    lighthouse: Option<&LighthouseItem>,
) -> Option<u8> {
    let audit_score = lighthouse
        .and_then(|lh| lh.categories.as_ref())
        .and_then(|categories| categories.performance.as_ref())
        .and_then(|performance| performance.score)
        .map(|score| (score * 100.0).round().clamp(0.0, 100.0) as u8);

    audit_score.or_else(|| {
        summary
            .onpage_score
            .map(|score| score.round().clamp(0.0, 100.0) as u8)
    })
}

fn is_indexable(checks: Option<&HashMap<String, bool>>) -> Option<bool> {
    let checks = checks?;
    Some(
        !NON_INDEXABLE_CHECKS
            .iter()
            .any(|(check, _)| checks.get(*check).copied().unwrap_or(false)),
    )
}

fn non_indexable_reason(checks: Option<&HashMap<String, bool>>) -> Option<String> {
    let checks = checks?;
    NON_INDEXABLE_CHECKS
        .iter()
        .find(|(check, _)| checks.get(*check).copied().unwrap_or(false))
        .map(|(_, reason)| reason.to_string())
}

fn normalize_off_page(backlinks: &BacklinksSummary) -> OffPageMetrics {
    OffPageMetrics {
        estimated_domain_authority: backlinks.rank,
        referring_domains_count: backlinks.referring_domains,
        backlinks_count: backlinks.backlinks,
        first_seen: backlinks.first_seen.clone(),
    }
}

fn normalize_top_pages(entries: &[TopPageEntry]) -> Vec<TopPage> {
    entries
        .iter()
        .filter_map(|entry| {
            entry.url.as_ref().map(|url| TopPage {
                url: url.clone(),
                rank: entry.rank,
                backlinks: entry.backlinks,
                referring_domains: entry.referring_domains,
            })
        })
        .collect()
}
