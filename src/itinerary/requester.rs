use std::backtrace::Backtrace;
use std::sync::Arc;
use std::time::Duration;

use super::prompt::build_itinerary_prompt;
use super::{FailureKind, ItineraryCache, ItineraryResult, TripRequest};
use crate::backend::{Backend, BackendError};

/// Sends one trip's prompt to a backend and classifies the outcome.
///
/// No retries: one failed call is one reported failure.
pub struct Requester {
    cache: Option<Arc<ItineraryCache>>,
    timeout: Duration,
}

impl Requester {
    pub fn new(timeout: Duration) -> Self {
        Self {
            cache: None,
            timeout,
        }
    }

    /// Serve repeated identical requests from `cache`.
    pub fn with_cache(mut self, cache: Arc<ItineraryCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn caching(&self) -> bool {
        self.cache.is_some()
    }

    pub async fn generate(&self, backend: &dyn Backend, request: &TripRequest) -> ItineraryResult {
        if let Some(text) = self.cache.as_ref().and_then(|c| c.get(request)) {
            tracing::debug!(destination = request.destination(), "itinerary served from cache");
            return ItineraryResult::Success { text };
        }

        let prompt = build_itinerary_prompt(request);
        tracing::info!(
            days = request.days(),
            destination = request.destination(),
            departure = %request.departure(),
            "requesting itinerary"
        );

        match tokio::time::timeout(self.timeout, backend.generate(&prompt)).await {
            Ok(Ok(text)) => {
                let text = match &self.cache {
                    Some(cache) => cache.insert(request, &text),
                    None => text,
                };
                ItineraryResult::Success { text }
            }
            Ok(Err(err)) => classify(err),
            Err(_) => {
                let detail = format!("request timed out after {}s", self.timeout.as_secs());
                tracing::error!(
                    timeout_secs = self.timeout.as_secs(),
                    backtrace = %Backtrace::force_capture(),
                    "Unexpected error: {detail}"
                );
                ItineraryResult::Failure {
                    kind: FailureKind::Unexpected,
                    detail,
                }
            }
        }
    }
}

fn classify(err: BackendError) -> ItineraryResult {
    let detail = err.to_string();
    if err.is_quota_exhausted() {
        tracing::error!("ResourceExhausted: {detail}");
        ItineraryResult::Failure {
            kind: FailureKind::QuotaExceeded,
            detail,
        }
    } else {
        tracing::error!(
            error = ?err,
            backtrace = %Backtrace::force_capture(),
            "Unexpected error: {detail}"
        );
        ItineraryResult::Failure {
            kind: FailureKind::Unexpected,
            detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::{MockBackend, MockReply};
    use chrono::NaiveDate;

    fn kyoto() -> TripRequest {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        TripRequest::new(3, "Kyoto", date, "").unwrap()
    }

    fn requester() -> Requester {
        Requester::new(Duration::from_secs(5))
    }

    #[tokio::test]
    async fn success_returns_text_verbatim() {
        let backend = MockBackend::text("## Day 1\n...");
        let result = requester().generate(&backend, &kyoto()).await;
        assert_eq!(
            result,
            ItineraryResult::Success {
                text: "## Day 1\n...".to_string()
            }
        );
        let prompts = backend.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("next destination : I don't know yet"));
    }

    #[tokio::test]
    async fn quota_maps_to_quota_exceeded() {
        let backend = MockBackend::new(vec![MockReply::Quota("429 quota".to_string())]);
        let result = requester().generate(&backend, &kyoto()).await;
        assert_eq!(
            result,
            ItineraryResult::Failure {
                kind: FailureKind::QuotaExceeded,
                detail: "429 quota".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn other_errors_map_to_unexpected() {
        let backend = MockBackend::new(vec![MockReply::Api {
            status: 500,
            message: "internal".to_string(),
        }]);
        match requester().generate(&backend, &kyoto()).await {
            ItineraryResult::Failure { kind, detail } => {
                assert_eq!(kind, FailureKind::Unexpected);
                assert!(detail.contains("internal"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn no_retry_after_failure() {
        let backend = MockBackend::new(vec![
            MockReply::Api {
                status: 503,
                message: "down".to_string(),
            },
            MockReply::Text("should not be reached".to_string()),
        ]);
        let result = requester().generate(&backend, &kyoto()).await;
        assert!(!result.is_success());
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_maps_to_unexpected() {
        let backend = MockBackend::new(vec![MockReply::Delayed(
            Duration::from_secs(120),
            "late".to_string(),
        )]);
        let requester = Requester::new(Duration::from_secs(30));
        match requester.generate(&backend, &kyoto()).await {
            ItineraryResult::Failure { kind, detail } => {
                assert_eq!(kind, FailureKind::Unexpected);
                assert_eq!(detail, "request timed out after 30s");
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn cache_serves_identical_requests() {
        let cache = Arc::new(ItineraryCache::new());
        let requester = requester().with_cache(Arc::clone(&cache));
        let backend = MockBackend::text("plan");

        let first = requester.generate(&backend, &kyoto()).await;
        let second = requester.generate(&backend, &kyoto()).await;

        assert_eq!(first, second);
        assert_eq!(backend.calls(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let cache = Arc::new(ItineraryCache::new());
        let requester = requester().with_cache(Arc::clone(&cache));
        let backend = MockBackend::new(vec![
            MockReply::Quota("slow down".to_string()),
            MockReply::Text("plan".to_string()),
        ]);

        assert!(!requester.generate(&backend, &kyoto()).await.is_success());
        assert!(requester.generate(&backend, &kyoto()).await.is_success());
        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test]
    async fn without_cache_every_call_hits_backend() {
        let backend = MockBackend::new(vec![
            MockReply::Text("a".to_string()),
            MockReply::Text("b".to_string()),
        ]);
        let requester = requester();
        assert!(!requester.caching());
        requester.generate(&backend, &kyoto()).await;
        requester.generate(&backend, &kyoto()).await;
        assert_eq!(backend.calls(), 2);
    }
}
