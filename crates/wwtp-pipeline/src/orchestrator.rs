//! A discovery run: search every keyword, deduplicate, verify candidates.
//!
//! Searching is strictly sequential (each page depends on the previous
//! page's token and the provider's page delay). Verification may run several
//! candidates at once, but results are assembled by discovery position so the
//! output order never depends on completion order.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use wwtp_core::{
    radius_km_to_meters, validate_radius_km, AppConfig, Candidate, Coordinate, PipelineResult,
    PipelineWarning, SearchHit, SearchPage, VerifiedCandidate, WarningStage,
    DEFAULT_SEARCH_KEYWORDS,
};
use wwtp_places::PlacesError;
use wwtp_vision::parse_verdict;

use crate::error::PipelineError;
use crate::policy::{accepts, status_label};
use crate::provider::{ImageClassifier, ImageSource, PlacesSearch};
use crate::resolve::resolve_candidates;

/// Upper bound on pages followed per keyword. The provider itself stops at
/// three; anything beyond this is a runaway cursor.
pub const MAX_PAGES_PER_KEYWORD: usize = 5;

const DEFAULT_PAGE_DELAY: Duration = Duration::from_secs(2);
const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(90);

/// Tunables for a [`DiscoveryPipeline`].
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Ordered search terms; hits are accumulated in this order.
    pub keywords: Vec<String>,
    /// Wait before requesting a follow-up page.
    pub page_delay: Duration,
    /// Candidates verified concurrently. Values below 1 are treated as 1.
    pub max_in_flight: usize,
    /// Limit applied to every individual provider call.
    pub call_timeout: Duration,
    pub max_pages_per_keyword: usize,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_SEARCH_KEYWORDS
                .iter()
                .map(ToString::to_string)
                .collect(),
            page_delay: DEFAULT_PAGE_DELAY,
            max_in_flight: 1,
            call_timeout: DEFAULT_CALL_TIMEOUT,
            max_pages_per_keyword: MAX_PAGES_PER_KEYWORD,
        }
    }
}

impl DiscoveryOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            keywords: config.search_keywords.clone(),
            page_delay: Duration::from_millis(config.page_delay_ms),
            max_in_flight: config.max_in_flight.max(1),
            call_timeout: Duration::from_secs(config.call_timeout_secs),
            ..Self::default()
        }
    }
}

/// A provider call that failed or outlived the call timeout.
#[derive(Debug)]
enum CallError<E> {
    Failed(E),
    TimedOut(Duration),
}

impl<E: fmt::Display> fmt::Display for CallError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallError::Failed(e) => write!(f, "{e}"),
            CallError::TimedOut(limit) => {
                write!(f, "timed out after {}s", limit.as_secs_f64())
            }
        }
    }
}

async fn bounded<T, E, F>(limit: Duration, call: F) -> Result<T, CallError<E>>
where
    F: Future<Output = Result<T, E>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(CallError::Failed(e)),
        Err(_) => Err(CallError::TimedOut(limit)),
    }
}

/// Everything one candidate contributes to the result.
struct CandidateOutcome {
    candidate: Candidate,
    verified: Option<VerifiedCandidate>,
    warnings: Vec<PipelineWarning>,
}

impl CandidateOutcome {
    fn skipped(candidate: Candidate, warnings: Vec<PipelineWarning>) -> Self {
        Self {
            candidate,
            verified: None,
            warnings,
        }
    }
}

/// Runs discovery against injected provider collaborators.
pub struct DiscoveryPipeline {
    places: Arc<dyn PlacesSearch>,
    imagery: Arc<dyn ImageSource>,
    classifier: Arc<dyn ImageClassifier>,
    options: DiscoveryOptions,
}

impl DiscoveryPipeline {
    #[must_use]
    pub fn new(
        places: Arc<dyn PlacesSearch>,
        imagery: Arc<dyn ImageSource>,
        classifier: Arc<dyn ImageClassifier>,
        options: DiscoveryOptions,
    ) -> Self {
        Self {
            places,
            imagery,
            classifier,
            options,
        }
    }

    /// Searches around `center`, deduplicates, and verifies every candidate.
    ///
    /// Every resolved candidate appears in `all_candidates`, including those
    /// whose imagery or classification failed; only policy-accepted ones
    /// appear in `verified`. Both lists keep discovery order. Failed steps
    /// are reported in `warnings` and never abort the run.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::InvalidInput`] if `radius_km` is not a positive
    ///   finite number.
    /// - [`PipelineError::NoKeywords`] if the keyword list is empty.
    pub async fn run_discovery(
        &self,
        center: Coordinate,
        radius_km: f64,
    ) -> Result<PipelineResult, PipelineError> {
        let radius_km = validate_radius_km(radius_km)?;
        if self.options.keywords.is_empty() {
            return Err(PipelineError::NoKeywords);
        }
        let radius_meters = radius_km_to_meters(radius_km);

        tracing::info!(
            center = %center,
            radius_meters,
            keywords = self.options.keywords.len(),
            "starting discovery"
        );

        let mut warnings = Vec::new();
        let hits = self.search_all(center, radius_meters, &mut warnings).await;
        let hit_count = hits.len();
        let candidates = resolve_candidates(hits);
        tracing::info!(
            hits = hit_count,
            candidates = candidates.len(),
            "search complete"
        );

        let mut result = PipelineResult {
            warnings,
            ..PipelineResult::default()
        };
        for outcome in self.verify_all(candidates).await {
            result.all_candidates.push(outcome.candidate);
            result.verified.extend(outcome.verified);
            result.warnings.extend(outcome.warnings);
        }

        tracing::info!(
            candidates = result.all_candidates.len(),
            verified = result.verified.len(),
            warnings = result.warnings.len(),
            "discovery complete"
        );
        Ok(result)
    }

    async fn search_all(
        &self,
        center: Coordinate,
        radius_meters: u32,
        warnings: &mut Vec<PipelineWarning>,
    ) -> Vec<SearchHit> {
        let mut hits = Vec::new();
        for keyword in &self.options.keywords {
            let before = hits.len();
            if let Err(e) = self
                .search_keyword(center, radius_meters, keyword, &mut hits)
                .await
            {
                tracing::warn!(
                    keyword = %keyword,
                    error = %e,
                    "search failed; keeping hits gathered so far"
                );
                warnings.push(PipelineWarning {
                    stage: WarningStage::Search,
                    provider_id: None,
                    subject: keyword.clone(),
                    message: e.to_string(),
                });
            }
            tracing::info!(keyword = %keyword, hits = hits.len() - before, "keyword searched");
        }
        hits
    }

    /// Follows one keyword's pages, appending hits as they arrive. On error
    /// the hits from pages already fetched stay in `hits`.
    async fn search_keyword(
        &self,
        center: Coordinate,
        radius_meters: u32,
        keyword: &str,
        hits: &mut Vec<SearchHit>,
    ) -> Result<(), CallError<PlacesError>> {
        let limit = self.options.call_timeout;
        let mut page = bounded(limit, self.places.search(center, radius_meters, keyword)).await?;
        let mut pages = 1;

        loop {
            let SearchPage {
                hits: page_hits,
                next_page_token,
            } = page;
            let page_was_empty = page_hits.is_empty();
            hits.extend(page_hits);

            let Some(token) = next_page_token else {
                return Ok(());
            };
            if page_was_empty {
                tracing::debug!(keyword, pages, "empty page with a token; stopping");
                return Ok(());
            }
            if pages >= self.options.max_pages_per_keyword {
                tracing::warn!(
                    keyword,
                    pages,
                    "page limit reached with a token outstanding; stopping"
                );
                return Ok(());
            }

            tracing::debug!(
                keyword,
                next_page = pages + 1,
                delay = ?self.options.page_delay,
                "waiting for next page"
            );
            tokio::time::sleep(self.options.page_delay).await;
            page = bounded(limit, self.places.search_next_page(&token)).await?;
            pages += 1;
        }
    }

    async fn verify_all(&self, candidates: Vec<Candidate>) -> Vec<CandidateOutcome> {
        let mut slots: Vec<Option<CandidateOutcome>> =
            std::iter::repeat_with(|| None).take(candidates.len()).collect();

        let completed: Vec<(usize, CandidateOutcome)> =
            stream::iter(candidates.into_iter().enumerate())
                .map(|(index, candidate)| async move { (index, self.verify(candidate).await) })
                .buffer_unordered(self.options.max_in_flight.max(1))
                .collect()
                .await;

        for (index, outcome) in completed {
            slots[index] = Some(outcome);
        }
        slots.into_iter().flatten().collect()
    }

    /// Address, imagery, classification, policy for one candidate. Never
    /// fails: each step's error becomes a warning and ends the candidate's
    /// processing, except a failed address lookup, which only leaves the
    /// address empty.
    async fn verify(&self, mut candidate: Candidate) -> CandidateOutcome {
        let limit = self.options.call_timeout;
        let mut warnings = Vec::new();

        match bounded(limit, self.places.place_address(&candidate.provider_id)).await {
            Ok(Some(address)) => candidate.address = Some(address),
            Ok(None) => {
                tracing::debug!(provider_id = %candidate.provider_id, "no address on record");
            }
            Err(e) => warnings.push(step_failed(&candidate, WarningStage::Address, &e)),
        }

        let image = match bounded(limit, self.imagery.fetch(candidate.coordinate)).await {
            Ok(image) => image,
            Err(e) => {
                warnings.push(step_failed(&candidate, WarningStage::Imagery, &e));
                return CandidateOutcome::skipped(candidate, warnings);
            }
        };

        let text = match bounded(limit, self.classifier.classify(&image)).await {
            Ok(text) => text,
            Err(e) => {
                warnings.push(step_failed(&candidate, WarningStage::Classification, &e));
                return CandidateOutcome::skipped(candidate, warnings);
            }
        };

        let verdict = parse_verdict(&text);
        let accepted = accepts(&verdict);
        tracing::info!(
            provider_id = %candidate.provider_id,
            name = %candidate.name,
            decision = %verdict.decision,
            water_present = %verdict.water_present,
            confidence = %verdict.confidence,
            capacity = %verdict.capacity_estimate,
            accepted,
            "verdict"
        );

        let verified = if accepted {
            Some(VerifiedCandidate {
                candidate: candidate.clone(),
                status_label: status_label(&verdict),
                imagery_url: image.reference_url,
                verdict,
            })
        } else {
            None
        };

        CandidateOutcome {
            candidate,
            verified,
            warnings,
        }
    }
}

fn step_failed(
    candidate: &Candidate,
    stage: WarningStage,
    error: &dyn fmt::Display,
) -> PipelineWarning {
    tracing::warn!(
        provider_id = %candidate.provider_id,
        name = %candidate.name,
        stage = %stage,
        error = %error,
        "candidate step failed"
    );
    PipelineWarning {
        stage,
        provider_id: Some(candidate.provider_id.clone()),
        subject: candidate.name.clone(),
        message: error.to_string(),
    }
}
