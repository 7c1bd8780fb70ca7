mod server;

use seoscribe::config::Credentials;
use seoscribe::error::ReportError;
use seoscribe::fetchers::SeoDataClient;
use seoscribe::http_client::build_http_client;
use seoscribe::pipeline::{PipelineOptions, ReportPipeline};
use seoscribe::synthesizer::GeminiClient;
use server::{Scenario, start_mock_providers};
use std::sync::atomic::Ordering;

fn test_credentials() -> Credentials {
    Credentials {
        dataforseo_login: "login".to_string(),
        dataforseo_password: "password".to_string(),
        gemini_api_key: "test-key".to_string(),
    }
}

fn build_pipeline(base_url: &str) -> ReportPipeline {
    let client = build_http_client(10).expect("Failed to build HTTP client");
    ReportPipeline::new(
        SeoDataClient::new(client.clone(), base_url),
        GeminiClient::new(client, base_url),
        PipelineOptions { audit_mobile: true },
    )
}

fn no_progress() -> impl Fn(&str) + Send + Sync {
    |_message: &str| {}
}

#[tokio::test]
async fn test_full_pipeline_generates_report() {
    let (base_url, synthesis_calls) = start_mock_providers(Scenario::AllOk).await;
    let pipeline = build_pipeline(&base_url);

    let report = pipeline
        .generate_report("https://example.com", &test_credentials(), &no_progress())
        .await
        .expect("Pipeline should succeed");

    assert_eq!(report.analyzed_url, "https://example.com");
    assert!(!report.on_page_analysis.factors.is_empty());
    assert!(!report.off_page_analysis.factors.is_empty());
    assert_eq!(report.overall_summary.top_recommendations.len(), 1);
    assert_eq!(synthesis_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_collect_prefers_lighthouse_metrics() {
    let (base_url, _) = start_mock_providers(Scenario::AllOk).await;
    let pipeline = build_pipeline(&base_url);

    let payload = pipeline
        .collect("https://example.com", &test_credentials(), &no_progress())
        .await
        .expect("Collect should succeed");

    let page = &payload.on_page_summary;
    assert_eq!(page.page_title.as_deref(), Some("Example Domain"));
    // Lighthouse data wins over the summary's page_timing block
    assert_eq!(page.largest_contentful_paint_ms, Some(1850.0));
    assert_eq!(page.cumulative_layout_shift, Some(0.05));
    assert_eq!(page.performance_score, Some(92));

    let off_page = payload.off_page_summary.expect("Backlinks data expected");
    assert_eq!(off_page.estimated_domain_authority, Some(412));
    assert_eq!(off_page.backlinks_count, Some(1532));

    let top_pages = payload.top_pages.expect("Top pages expected");
    assert_eq!(top_pages.len(), 2);
    assert_eq!(top_pages[0].url, "https://example.com/");
}

#[tokio::test]
async fn test_primary_task_failure_aborts_before_synthesis() {
    let (base_url, synthesis_calls) = start_mock_providers(Scenario::PrimaryTaskFails).await;
    let pipeline = build_pipeline(&base_url);

    let result = pipeline
        .generate_report("https://example.com", &test_credentials(), &no_progress())
        .await;

    match result {
        Err(ReportError::ProviderTask { endpoint, reason }) => {
            assert_eq!(endpoint, "/v3/on_page/instant_pages");
            assert!(reason.contains("40501"), "Reason was: {}", reason);
        }
        other => panic!("Expected ProviderTask error, got: {:?}", other.err()),
    }

    assert_eq!(
        synthesis_calls.load(Ordering::SeqCst),
        0,
        "Synthesizer must never be called when the primary fetch fails"
    );
}

#[tokio::test]
async fn test_primary_http_failure_is_fatal() {
    let (base_url, synthesis_calls) = start_mock_providers(Scenario::PrimaryHttpFails).await;
    let pipeline = build_pipeline(&base_url);

    let result = pipeline
        .generate_report("https://example.com", &test_credentials(), &no_progress())
        .await;

    match result {
        Err(ReportError::ProviderHttp {
            endpoint,
            status,
            body_excerpt,
        }) => {
            assert_eq!(endpoint, "/v3/on_page/instant_pages");
            assert_eq!(status, 500);
            assert!(body_excerpt.contains("provider exploded"));
        }
        other => panic!("Expected ProviderHttp error, got: {:?}", other.err()),
    }

    assert_eq!(synthesis_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_optional_failure_degrades_and_still_synthesizes() {
    let (base_url, synthesis_calls) = start_mock_providers(Scenario::LighthouseFails).await;
    let pipeline = build_pipeline(&base_url);

    let payload = pipeline
        .collect("https://example.com", &test_credentials(), &no_progress())
        .await
        .expect("Collect should tolerate a failed optional fetch");

    let page = &payload.on_page_summary;
    // Falls back to the summary's own signals
    assert_eq!(page.performance_score, Some(81));
    assert_eq!(page.largest_contentful_paint_ms, Some(2400.0));
    assert_eq!(page.cumulative_layout_shift, Some(0.12));
    // The summary has no blocking-time signal, so the field stays absent
    assert_eq!(page.total_blocking_time_ms, None);

    let report = pipeline
        .generate_report("https://example.com", &test_credentials(), &no_progress())
        .await
        .expect("Pipeline should still reach synthesis");
    assert_eq!(report.analyzed_url, "https://example.com");
    assert_eq!(synthesis_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_fenced_synthesis_response_is_accepted() {
    let (base_url, _) = start_mock_providers(Scenario::FencedSynthesis).await;
    let pipeline = build_pipeline(&base_url);

    let report = pipeline
        .generate_report("https://example.com", &test_credentials(), &no_progress())
        .await
        .expect("Fenced JSON should be stripped and parsed");

    assert_eq!(report.analyzed_url, "https://example.com");
}

#[tokio::test]
async fn test_incomplete_synthesis_response_is_rejected() {
    let (base_url, _) = start_mock_providers(Scenario::IncompleteSynthesis).await;
    let pipeline = build_pipeline(&base_url);

    let result = pipeline
        .generate_report("https://example.com", &test_credentials(), &no_progress())
        .await;

    match result {
        Err(ReportError::IncompleteSynthesis { missing_fields }) => {
            assert_eq!(missing_fields, vec!["topRecommendations".to_string()]);
        }
        other => panic!("Expected IncompleteSynthesis, got: {:?}", other.err()),
    }
}

#[tokio::test]
async fn test_payload_serialization_is_deterministic() {
    let (base_url, _) = start_mock_providers(Scenario::AllOk).await;
    let pipeline = build_pipeline(&base_url);

    let first = pipeline
        .collect("https://example.com", &test_credentials(), &no_progress())
        .await
        .expect("Collect should succeed");
    let second = pipeline
        .collect("https://example.com", &test_credentials(), &no_progress())
        .await
        .expect("Collect should succeed");

    assert_eq!(
        first.to_prompt_json().unwrap(),
        second.to_prompt_json().unwrap(),
        "Identical inputs must serialize byte-identically"
    );
}
