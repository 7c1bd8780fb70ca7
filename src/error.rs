use thiserror::Error;

/// Everything that can terminate a report pipeline run.
///
/// Optional fetcher failures never show up here; they degrade to absent
/// payload sections inside the pipeline. This enum covers the fatal cases:
/// configuration problems, the primary fetch, and every synthesis stage.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Credentials missing before any network call was attempted.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The SEO data provider answered with a non-success HTTP status.
    #[error("provider returned HTTP {status} for {endpoint}: {body_excerpt}")]
    ProviderHttp {
        endpoint: String,
        status: u16,
        body_excerpt: String,
    },

    /// The request to the SEO data provider never completed (DNS, timeout,
    /// connection reset).
    #[error("provider request to {endpoint} failed: {source}")]
    ProviderTransport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// HTTP 200, but the provider's task envelope reported a failure or an
    /// empty result.
    #[error("provider task for {endpoint} failed: {reason}")]
    ProviderTask { endpoint: String, reason: String },

    /// The synthesizer's response could not be parsed as JSON.
    #[error("AI response was not valid JSON: {raw_excerpt}")]
    MalformedSynthesis { raw_excerpt: String },

    /// The synthesizer's JSON parsed but is missing required report fields.
    #[error("AI response is missing required fields: {}", missing_fields.join(", "))]
    IncompleteSynthesis { missing_fields: Vec<String> },

    #[error("AI API key was rejected, check your credentials")]
    InvalidCredentials,

    #[error("AI API quota exceeded, try again later")]
    QuotaExceeded,

    /// Any other failure talking to the generation API.
    #[error("AI service error: {0}")]
    SynthesisTransport(String),
}

impl ReportError {
    /// Truncates provider/AI response bodies so errors stay readable.
    pub fn excerpt(body: &str) -> String {
        const MAX: usize = 200;
        if body.len() <= MAX {
            body.to_string()
        } else {
            let mut end = MAX;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...", &body[..end])
        }
    }
}
