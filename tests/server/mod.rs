use actix_web::{App, HttpResponse, HttpServer, web};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Which provider calls misbehave for a given test run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum Scenario {
    AllOk,
    /// The on-page summary task reports an internal failure on HTTP 200.
    PrimaryTaskFails,
    /// The on-page summary endpoint answers with HTTP 500.
    PrimaryHttpFails,
    /// The Lighthouse endpoint answers with HTTP 500.
    LighthouseFails,
    /// The AI endpoint returns fenced JSON around a valid report.
    FencedSynthesis,
    /// The AI endpoint returns JSON missing topRecommendations.
    IncompleteSynthesis,
}

/// Starts one server that plays both providers: the DataForSEO task
/// endpoints and the Gemini generateContent endpoint. Returns the base URL
/// and a counter of synthesis calls so tests can assert the AI was (not)
/// reached.
pub async fn start_mock_providers(scenario: Scenario) -> (String, Arc<AtomicUsize>) {
    let synthesis_calls = Arc::new(AtomicUsize::new(0));
    let calls = synthesis_calls.clone();

    let http_server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(scenario))
            .app_data(web::Data::new(calls.clone()))
            .route(
                "/v3/on_page/instant_pages",
                web::post().to(on_page_instant_pages),
            )
            .route(
                "/v3/on_page/lighthouse/live",
                web::post().to(lighthouse_live),
            )
            .route(
                "/v3/backlinks/summary/live",
                web::post().to(backlinks_summary_live),
            )
            .route(
                "/v3/backlinks/domain_pages/live",
                web::post().to(backlinks_domain_pages_live),
            )
            .route(
                "/v1beta/models/gemini-2.5-flash:generateContent",
                web::post().to(generate_content),
            )
    })
    .bind(("127.0.0.1", 0))
    .expect("Failed to bind mock provider server");

    let addr = http_server
        .addrs()
        .first()
        .cloned()
        .expect("No address bound");
    let url = format!("http://{}", addr);

    let app_server = http_server.run();

    tokio::spawn(async move {
        if let Err(e) = app_server.await {
            eprintln!("Mock provider server error: {}", e);
        }
    });

    (url, synthesis_calls)
}

fn task_envelope(result: Value) -> Value {
    json!({
        "status_code": 20000,
        "status_message": "Ok.",
        "tasks": [{
            "status_code": 20000,
            "status_message": "Ok.",
            "result": result,
        }],
    })
}

async fn on_page_instant_pages(scenario: web::Data<Scenario>) -> HttpResponse {
    match *scenario.get_ref() {
        Scenario::PrimaryHttpFails => {
            HttpResponse::InternalServerError().body("provider exploded")
        }
        Scenario::PrimaryTaskFails => HttpResponse::Ok().json(json!({
            "status_code": 20000,
            "status_message": "Ok.",
            "tasks": [{
                "status_code": 40501,
                "status_message": "Invalid Field.",
                "result": null,
            }],
        })),
        _ => HttpResponse::Ok().json(task_envelope(json!([{
            "items": [{
                "meta": {
                    "title": "Example Domain",
                    "description": "An illustrative example page.",
                    "htags": { "h1": ["Example Domain"], "h2": ["More information", "Contact"] },
                    "content": {
                        "plain_text_word_count": 238,
                        "plain_text_rate": 0.32,
                    },
                },
                "checks": {
                    "is_mobile_friendly": true,
                    "viewport": true,
                    "duplicate_title": false,
                    "duplicate_description": false,
                    "duplicate_content": false,
                },
                "page_timing": {
                    "largest_contentful_paint": 2400.0,
                    "cumulative_layout_shift": 0.12,
                },
                "onpage_score": 81.4,
                "total_images_count": 5,
                "images_without_alt_count": 2,
                "internal_links_count": 14,
                "broken_links_count": 1,
            }],
        }]))),
    }
}

async fn lighthouse_live(scenario: web::Data<Scenario>) -> HttpResponse {
    match *scenario.get_ref() {
        Scenario::LighthouseFails => {
            HttpResponse::InternalServerError().body("lighthouse unavailable")
        }
        _ => HttpResponse::Ok().json(task_envelope(json!([{
            "items": [{
                "audits": {
                    "metrics": {
                        "details": {
                            "items": [{
                                "largest_contentful_paint": 1850.0,
                                "total_blocking_time": 120.0,
                                "cumulative_layout_shift": 0.05,
                            }],
                        },
                    },
                },
                "categories": {
                    "performance": { "score": 0.92 },
                    "accessibility": { "score": 0.88 },
                    "seo": { "score": 0.95 },
                },
            }],
        }]))),
    }
}

async fn backlinks_summary_live() -> HttpResponse {
    HttpResponse::Ok().json(task_envelope(json!([{
        "rank": 412,
        "backlinks": 1532,
        "referring_domains": 87,
        "first_seen": "2019-03-02 11:04:15 +00:00",
    }])))
}

async fn backlinks_domain_pages_live() -> HttpResponse {
    HttpResponse::Ok().json(task_envelope(json!([{
        "items": [
            {
                "url": "https://example.com/",
                "rank": 410,
                "backlinks": 1200,
                "referring_domains": 80,
            },
            {
                "url": "https://example.com/blog",
                "rank": 120,
                "backlinks": 300,
                "referring_domains": 25,
            },
        ],
    }])))
}

fn valid_report_json() -> Value {
    json!({
        "analyzedUrl": "https://example.com",
        "onPageAnalysis": {
            "title": "On-Page SEO Analysis",
            "introduction": "Findings from the on-page metrics.",
            "factors": [{
                "factorName": "Title Tag",
                "currentObservation": "The title is \"Example Domain\" (14 characters).",
                "importance": "The title is the first thing users and engines see.",
                "recommendation": "Lengthen the title to 50-60 characters.",
            }],
        },
        "offPageAnalysis": {
            "title": "Off-Page SEO Analysis",
            "introduction": "Findings from the link profile.",
            "factors": [{
                "factorName": "Domain Authority (Rank)",
                "currentObservation": "The domain rank is 412.",
                "importance": "Rank predicts ranking ability.",
                "recommendation": "Keep earning quality backlinks.",
            }],
        },
        "overallSummary": {
            "title": "Overall Summary",
            "strengths": ["Fast LCP of 1850ms."],
            "weaknesses": ["2 images are missing alt text."],
            "topRecommendations": [{
                "priority": 1,
                "action": "Add alt text to the 2 images missing it.",
                "reasoning": "Quick accessibility and image SEO win.",
            }],
        },
    })
}

async fn generate_content(
    scenario: web::Data<Scenario>,
    calls: web::Data<Arc<AtomicUsize>>,
) -> HttpResponse {
    calls.fetch_add(1, Ordering::SeqCst);

    let report_text = match *scenario.get_ref() {
        Scenario::FencedSynthesis => format!("```json\n{}\n```", valid_report_json()),
        Scenario::IncompleteSynthesis => {
            let mut report = valid_report_json();
            report["overallSummary"]
                .as_object_mut()
                .unwrap()
                .remove("topRecommendations");
            report.to_string()
        }
        _ => valid_report_json().to_string(),
    };

    HttpResponse::Ok().json(json!({
        "candidates": [{
            "content": { "parts": [{ "text": report_text }] },
        }],
    }))
}
