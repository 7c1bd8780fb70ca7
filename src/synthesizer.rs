use crate::error::ReportError;
use crate::models::{AggregatedPayload, SeoReport};
use serde::Deserialize;
use serde_json::{Value, json};

/// Gemini API base host.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const GEMINI_MODEL_NAME: &str = "gemini-2.5-flash";

/// Top-level fields the report JSON must carry before it is trusted. The
/// nested paths cover the sections the renderer cannot do without.
const REQUIRED_FIELDS: &[&str] = &[
    "analyzedUrl",
    "onPageAnalysis",
    "onPageAnalysis.factors",
    "offPageAnalysis",
    "offPageAnalysis.factors",
    "overallSummary",
    "overallSummary.topRecommendations",
];

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

/// Client for the text-generation API that writes the final report.
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            model: GEMINI_MODEL_NAME.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Renders the payload into the prompt, asks for a JSON response, and
    /// validates the result before returning it.
    pub async fn synthesize(
        &self,
        payload: &AggregatedPayload,
        api_key: &str,
    ) -> Result<SeoReport, ReportError> {
        let payload_json = payload
            .to_prompt_json()
            .map_err(|e| ReportError::SynthesisTransport(e.to_string()))?;
        let prompt = build_prompt(&payload.target_url, &payload_json);

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "responseMimeType": "application/json" },
        });

        tracing::debug!(model = %self.model, "Requesting report synthesis");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ReportError::SynthesisTransport(e.to_string()))?;

        let status = response.status();
        let body_text = response
            .text()
            .await
            .map_err(|e| ReportError::SynthesisTransport(e.to_string()))?;

        if !status.is_success() {
            return Err(classify_api_error(status.as_u16(), &body_text));
        }

        let generated: GenerateContentResponse =
            serde_json::from_str(&body_text).map_err(|_| ReportError::MalformedSynthesis {
                raw_excerpt: ReportError::excerpt(&body_text),
            })?;

        let text = generated
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .ok_or_else(|| ReportError::MalformedSynthesis {
                raw_excerpt: ReportError::excerpt(&body_text),
            })?;

        parse_report(&text)
    }
}

/// Maps the generation API's error bodies onto the typed failures the caller
/// can present. Substring matching is all the API gives us here.
fn classify_api_error(status: u16, body: &str) -> ReportError {
    if body.contains("API_KEY_INVALID") || body.contains("API key not valid") || status == 401 {
        ReportError::InvalidCredentials
    } else if body.contains("RESOURCE_EXHAUSTED") || body.contains("quota") || status == 429 {
        ReportError::QuotaExceeded
    } else {
        ReportError::SynthesisTransport(format!("HTTP {}: {}", status, ReportError::excerpt(body)))
    }
}

/// Parses the model's text output into a validated report.
pub fn parse_report(text: &str) -> Result<SeoReport, ReportError> {
    let cleaned = strip_code_fences(text);

    let value: Value =
        serde_json::from_str(cleaned).map_err(|_| ReportError::MalformedSynthesis {
            raw_excerpt: ReportError::excerpt(cleaned),
        })?;

    let missing = missing_required_fields(&value);
    if !missing.is_empty() {
        return Err(ReportError::IncompleteSynthesis {
            missing_fields: missing,
        });
    }

    serde_json::from_value(value).map_err(|_| ReportError::MalformedSynthesis {
        raw_excerpt: ReportError::excerpt(cleaned),
    })
}

/// Models sometimes wrap JSON in markdown fences despite being told not to.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(rest) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop an optional language tag on the opening fence, e.g. ```json
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.trim()
}

/// Returns the required field paths absent from the parsed report.
pub fn missing_required_fields(value: &Value) -> Vec<String> {
    let mut missing = Vec::new();
    for path in REQUIRED_FIELDS {
        if lookup_path(value, path).is_none() {
            // Report the leaf name, matching what the prompt asked for.
            let leaf = path.rsplit('.').next().unwrap_or(path).to_string();
            if !missing.contains(&leaf) {
                missing.push(leaf);
            }
        }
    }
    missing
}

fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |current, segment| current.get(segment))
}

/// The fixed instructional template. The JSON skeleton below is the contract
/// validated by `missing_required_fields` and deserialized into `SeoReport`.
pub fn build_prompt(target_url: &str, payload_json: &str) -> String {
    format!(
        r#"You are a world-class SEO analyst. You have been given aggregated technical
data from several DataForSEO API endpoints (OnPage Summary, Lighthouse,
Backlinks) for the website at "{target_url}".
Interpret all of this data and produce a holistic, actionable SEO report.

Aggregated DataForSEO data:
```json
{payload_json}
```

Instructions:
1. Base every "currentObservation" strictly on the data above. Fields absent
   from the JSON were not measured; say so explicitly instead of guessing.
2. Prefer the Lighthouse-derived page speed metrics where present.
3. "importance" explains why the factor matters; "recommendation" must follow
   from the observation.
4. Strengths, weaknesses, and topRecommendations in "overallSummary" must be
   derived only from the data above, with recommendations ordered by priority.
5. Respond with ONLY a well-formed JSON object, no surrounding text and no
   markdown code fences, in exactly this shape:

{{
  "analyzedUrl": "{target_url}",
  "onPageAnalysis": {{
    "title": "...",
    "introduction": "...",
    "factors": [
      {{
        "factorName": "Title Tag",
        "currentObservation": "...",
        "importance": "...",
        "recommendation": "..."
      }}
    ]
  }},
  "offPageAnalysis": {{
    "title": "...",
    "introduction": "...",
    "factors": [
      {{
        "factorName": "Domain Authority (Rank)",
        "currentObservation": "...",
        "importance": "...",
        "recommendation": "..."
      }}
    ]
  }},
  "overallSummary": {{
    "title": "...",
    "strengths": ["..."],
    "weaknesses": ["..."],
    "topRecommendations": [
      {{ "priority": 1, "action": "...", "reasoning": "..." }}
    ]
  }}
}}

Cover at least these on-page factors: title tag, meta description, heading
structure, content quality, image optimization, page speed and Core Web
Vitals, mobile friendliness, internal linking, indexability, duplicate tags.
Cover these off-page factors: domain authority, backlink profile, and the
strongest pages by backlinks when a top_pages listing is present."#
    )
}
