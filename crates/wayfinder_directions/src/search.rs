use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::warn;
use wayfinder_providers::capabilities::{IndoorServices, PlaceAutocomplete, SearchParams};
use wayfinder_providers::location::{Location, PlacePrediction};

use crate::error::DirectionsError;

pub const DEFAULT_SEARCH_WINDOW: Duration = Duration::from_millis(450);

/// Unified search candidate: indoor results first, external predictions
/// after.
#[derive(Debug, Clone, PartialEq)]
pub enum Candidate {
    Indoor(Location),
    Place(PlacePrediction),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// A newer submission or response superseded this one; ignore it.
    Superseded,
    Candidates(Vec<Candidate>),
}

/// Request-sequencing guard: responses only apply for the most recently
/// issued query, so an earlier, slower response can never overwrite a later
/// one (last-write-wins by issuing order, not completion order).
#[derive(Debug, Default)]
pub struct QueryGuard {
    issued: AtomicU64,
}

impl QueryGuard {
    pub fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, seq: u64) -> bool {
        self.issued.load(Ordering::SeqCst) == seq
    }
}

/// Debounced free-text endpoint search. Each keystroke submits the whole
/// field value; only a submission that survives the quiescence window and
/// differs from the previously issued query reaches the capabilities.
pub struct EndpointSearch {
    window: Duration,
    generation: AtomicU64,
    guard: QueryGuard,
    last_issued: Mutex<Option<String>>,
}

impl EndpointSearch {
    pub fn new(window: Duration) -> EndpointSearch {
        EndpointSearch {
            window,
            generation: AtomicU64::new(0),
            guard: QueryGuard::default(),
            last_issued: Mutex::new(None),
        }
    }

    /// Queries the indoor search capability and, when available, the
    /// external place-autocomplete capability in parallel. Capability
    /// failures degrade to empty partial results; an entirely empty result
    /// for a non-empty query is `NoMatchingResults`.
    pub async fn run<I, P>(
        &self,
        raw_query: &str,
        indoor: &I,
        places: Option<&P>,
        params: &SearchParams,
        country: Option<&str>,
    ) -> Result<SearchOutcome, DirectionsError>
    where
        I: IndoorServices,
        P: PlaceAutocomplete,
    {
        let query = raw_query.trim().to_string();
        if query.is_empty() {
            return Ok(SearchOutcome::Candidates(Vec::new()));
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.window).await;
        if self.generation.load(Ordering::SeqCst) != generation {
            return Ok(SearchOutcome::Superseded);
        }

        {
            let mut last = self.last_issued.lock().unwrap_or_else(|e| e.into_inner());
            if last.as_deref() == Some(query.as_str()) {
                return Ok(SearchOutcome::Superseded);
            }
            *last = Some(query.clone());
        }

        let seq = self.guard.issue();

        let (indoor_results, predictions) = match places {
            Some(places) => tokio::join!(
                indoor.search(&query, params),
                places.predict(&query, country)
            ),
            None => (indoor.search(&query, params).await, Ok(Vec::new())),
        };

        if !self.guard.is_current(seq) {
            return Ok(SearchOutcome::Superseded);
        }

        let indoor_results = indoor_results.unwrap_or_else(|e| {
            warn!("Indoor search failed for '{}': {}", query, e);
            Vec::new()
        });
        let predictions = predictions.unwrap_or_else(|e| {
            warn!("Place autocomplete failed for '{}': {}", query, e);
            Vec::new()
        });

        let candidates: Vec<Candidate> = indoor_results
            .into_iter()
            .map(Candidate::Indoor)
            .chain(predictions.into_iter().map(Candidate::Place))
            .collect();

        if candidates.is_empty() {
            return Err(DirectionsError::NoMatchingResults(query));
        }

        Ok(SearchOutcome::Candidates(candidates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FakeIndoor, FakePlaces, indoor_location};
    use std::sync::Arc;

    fn search_params() -> SearchParams {
        SearchParams::default()
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_typing_issues_single_query() {
        let search = Arc::new(EndpointSearch::new(DEFAULT_SEARCH_WINDOW));
        let indoor = Arc::new(FakeIndoor::with_search_results(vec![indoor_location(
            "cafe", "Cafe",
        )]));

        let mut handles = Vec::new();
        for text in ["a", "ab", "abc"] {
            let search = Arc::clone(&search);
            let indoor = Arc::clone(&indoor);
            handles.push(tokio::spawn(async move {
                search
                    .run::<_, FakePlaces>(text, indoor.as_ref(), None, &search_params(), None)
                    .await
            }));
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        let mut outcomes = Vec::new();
        for handle in handles {
            outcomes.push(handle.await.unwrap().unwrap());
        }

        assert_eq!(outcomes[0], SearchOutcome::Superseded);
        assert_eq!(outcomes[1], SearchOutcome::Superseded);
        assert!(matches!(&outcomes[2], SearchOutcome::Candidates(c) if c.len() == 1));
        assert_eq!(indoor.search_queries(), vec!["abc"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_discarded() {
        let search = Arc::new(EndpointSearch::new(DEFAULT_SEARCH_WINDOW));
        let indoor = Arc::new(
            FakeIndoor::with_search_results(vec![indoor_location("cafe", "Cafe")])
                .with_search_delay("slow", Duration::from_secs(10)),
        );

        let slow = {
            let search = Arc::clone(&search);
            let indoor = Arc::clone(&indoor);
            tokio::spawn(async move {
                search
                    .run::<_, FakePlaces>("slow", indoor.as_ref(), None, &search_params(), None)
                    .await
            })
        };
        // Let the slow query pass its debounce window and reach the
        // capability before the next one is typed.
        tokio::time::sleep(Duration::from_millis(600)).await;

        let fast = search
            .run::<_, FakePlaces>("fast", indoor.as_ref(), None, &search_params(), None)
            .await
            .unwrap();
        assert!(matches!(fast, SearchOutcome::Candidates(_)));

        let slow = slow.await.unwrap().unwrap();
        assert_eq!(slow, SearchOutcome::Superseded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_indoor_results_precede_places() {
        let search = EndpointSearch::new(Duration::from_millis(1));
        let indoor = FakeIndoor::with_search_results(vec![indoor_location("cafe", "Cafe")]);
        let places = FakePlaces::with_predictions(vec!["station"]);

        let outcome = search
            .run("coffee", &indoor, Some(&places), &search_params(), None)
            .await
            .unwrap();

        match outcome {
            SearchOutcome::Candidates(candidates) => {
                assert_eq!(candidates.len(), 2);
                assert!(matches!(candidates[0], Candidate::Indoor(_)));
                assert!(matches!(candidates[1], Candidate::Place(_)));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_result_is_no_matching_results() {
        let search = EndpointSearch::new(Duration::from_millis(1));
        let indoor = FakeIndoor::with_search_results(Vec::new());

        let outcome = search
            .run::<_, FakePlaces>("nothing here", &indoor, None, &search_params(), None)
            .await;

        assert!(matches!(
            outcome,
            Err(DirectionsError::NoMatchingResults(q)) if q == "nothing here"
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_query_not_reissued() {
        let search = EndpointSearch::new(Duration::from_millis(1));
        let indoor = FakeIndoor::with_search_results(vec![indoor_location("cafe", "Cafe")]);

        let first = search
            .run::<_, FakePlaces>("cafe", &indoor, None, &search_params(), None)
            .await
            .unwrap();
        let second = search
            .run::<_, FakePlaces>(" cafe ", &indoor, None, &search_params(), None)
            .await
            .unwrap();

        assert!(matches!(first, SearchOutcome::Candidates(_)));
        assert_eq!(second, SearchOutcome::Superseded);
        assert_eq!(indoor.search_queries(), vec!["cafe"]);
    }
}
