use crate::aggregator::normalize;
use crate::config::Credentials;
use crate::error::ReportError;
use crate::fetchers::SeoDataClient;
use crate::models::{AggregatedPayload, SeoReport};
use crate::provider::{
    BACKLINKS_DOMAIN_PAGES_LIVE_ENDPOINT, BACKLINKS_SUMMARY_LIVE_ENDPOINT,
    ON_PAGE_LIGHTHOUSE_LIVE_ENDPOINT,
};
use crate::synthesizer::GeminiClient;

/// How many entries the top-pages listing asks for.
const TOP_PAGES_LIMIT: u32 = 10;

/// Options that shape one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Run the Lighthouse audit against the mobile rendering.
    pub audit_mobile: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self { audit_mobile: true }
    }
}

/// Sequences fetch -> normalize -> synthesize for one target URL.
///
/// Linear and stateless: every invocation is independent, runs to completion
/// or to the first fatal error, and never retries. The progress callback gets
/// a human-readable line at each stage transition.
pub struct ReportPipeline {
    seo_data: SeoDataClient,
    gemini: GeminiClient,
    options: PipelineOptions,
}

impl ReportPipeline {
    pub fn new(seo_data: SeoDataClient, gemini: GeminiClient, options: PipelineOptions) -> Self {
        Self {
            seo_data,
            gemini,
            options,
        }
    }

    pub async fn generate_report(
        &self,
        target_url: &str,
        credentials: &Credentials,
        progress: &(dyn Fn(&str) + Send + Sync),
    ) -> Result<SeoReport, ReportError> {
        let payload = self.collect(target_url, credentials, progress).await?;

        progress("Step 3/3: Writing the report with Gemini...");
        let report = self
            .gemini
            .synthesize(&payload, &credentials.gemini_api_key)
            .await?;

        tracing::info!(url = %target_url, "Report generated");
        Ok(report)
    }

    /// Fans out all four provider calls, waits for every one to settle, and
    /// normalizes whatever came back. Only the on-page summary is allowed to
    /// abort the run; the optional fetchers degrade to absent data.
    pub async fn collect(
        &self,
        target_url: &str,
        credentials: &Credentials,
        progress: &(dyn Fn(&str) + Send + Sync),
    ) -> Result<AggregatedPayload, ReportError> {
        progress("Step 1/3: Fetching SEO data from DataForSEO...");

        let (summary, lighthouse, backlinks, top_pages) = tokio::join!(
            self.seo_data.fetch_on_page_summary(target_url, credentials),
            self.seo_data
                .fetch_lighthouse(target_url, credentials, self.options.audit_mobile),
            self.seo_data
                .fetch_backlinks_summary(target_url, credentials),
            self.seo_data
                .fetch_top_pages(target_url, credentials, TOP_PAGES_LIMIT),
        );

        // The primary fetch is the one result the payload cannot do without.
        let summary = summary?;
        let lighthouse = lighthouse.ok_or_log(ON_PAGE_LIGHTHOUSE_LIVE_ENDPOINT);
        let backlinks = backlinks.ok_or_log(BACKLINKS_SUMMARY_LIVE_ENDPOINT);
        let top_pages = top_pages.ok_or_log(BACKLINKS_DOMAIN_PAGES_LIVE_ENDPOINT);

        progress("Step 2/3: Normalizing provider data...");
        Ok(normalize(
            target_url,
            &summary,
            lighthouse.as_ref(),
            backlinks.as_ref(),
            top_pages.as_deref(),
        ))
    }
}
