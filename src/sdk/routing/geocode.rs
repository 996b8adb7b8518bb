use super::coord::LocationCandidate;
use super::error::GeocodeError;
use super::service::GeocodingProvider;
use crate::sdk::config::ServiceConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Free-text place lookup on top of a [`GeocodingProvider`].
pub struct Geocoder<G> {
    provider: G,
}

impl<G: GeocodingProvider> Geocoder<G> {
    pub fn new(provider: G) -> Self {
        Self { provider }
    }

    /// Blank input returns no candidates without touching the network.
    pub async fn search(&self, text: &str) -> Result<Vec<LocationCandidate>, GeocodeError> {
        let query = text.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        log::debug!("[GEOCODER] Searching for \"{}\"", query);
        let result = self.provider.search_places(query).await;
        match &result {
            Ok(candidates) => log::debug!(
                "[GEOCODER] \"{}\" matched {} candidates",
                query,
                candidates.len()
            ),
            Err(e) => log::warn!("[GEOCODER] Search for \"{}\" failed: {}", query, e),
        }
        result
    }
}

/// What a search box shows after the latest completed search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    /// Counts executed searches; never goes backwards.
    pub generation: u64,
    pub query: String,
    pub candidates: Vec<LocationCandidate>,
    pub failure: Option<GeocodeError>,
}

impl SearchResults {
    fn from_outcome(
        generation: u64,
        query: &str,
        outcome: Result<Vec<LocationCandidate>, GeocodeError>,
    ) -> Self {
        let (candidates, failure) = match outcome {
            Ok(candidates) => (candidates, None),
            Err(e) => (Vec::new(), Some(e)),
        };
        Self {
            generation,
            query: query.to_string(),
            candidates,
            failure,
        }
    }

    pub fn failure_message(&self) -> Option<&'static str> {
        self.failure.as_ref().map(|e| e.kind().user_message())
    }
}

/// Search-as-you-type. Keystrokes are buffered until the input has been quiet
/// for the debounce window, then exactly one search runs. A keystroke that
/// arrives while a search is in flight cancels it.
pub struct SearchSession {
    input: watch::Sender<String>,
    results: watch::Receiver<SearchResults>,
    task: JoinHandle<()>,
}

impl SearchSession {
    pub fn spawn<G>(geocoder: Arc<Geocoder<G>>, window: Duration) -> Self
    where
        G: GeocodingProvider + 'static,
    {
        let (input_tx, input_rx) = watch::channel(String::new());
        let (results_tx, results_rx) = watch::channel(SearchResults::default());
        let task = tokio::spawn(run_session(geocoder, window, input_rx, results_tx));

        Self {
            input: input_tx,
            results: results_rx,
            task,
        }
    }

    /// Uses the configured debounce window.
    pub fn from_config<G>(geocoder: Arc<Geocoder<G>>, config: &ServiceConfig) -> Self
    where
        G: GeocodingProvider + 'static,
    {
        Self::spawn(geocoder, config.debounce)
    }

    pub fn input(&self, text: impl Into<String>) {
        self.input.send_replace(text.into());
    }

    pub fn results(&self) -> watch::Receiver<SearchResults> {
        self.results.clone()
    }

    pub fn latest(&self) -> SearchResults {
        self.results.borrow().clone()
    }

    /// Types `text` in one go and waits for the search it triggers. `None`
    /// once the session has stopped.
    pub async fn settle(&self, text: impl Into<String>) -> Option<SearchResults> {
        let mut results = self.results.clone();
        let before = results.borrow_and_update().generation;
        self.input(text);
        let settled = results.wait_for(|r| r.generation > before).await.ok()?;
        Some((*settled).clone())
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_session<G: GeocodingProvider>(
    geocoder: Arc<Geocoder<G>>,
    window: Duration,
    mut input: watch::Receiver<String>,
    results: watch::Sender<SearchResults>,
) {
    let mut generation = 0u64;
    let mut pending = false;

    loop {
        if !pending && input.changed().await.is_err() {
            return;
        }
        pending = false;

        // Every keystroke restarts the quiet period.
        loop {
            tokio::select! {
                changed = input.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
                _ = tokio::time::sleep(window) => break,
            }
        }

        let text = input.borrow_and_update().clone();
        generation += 1;

        tokio::select! {
            outcome = geocoder.search(&text) => {
                results.send_replace(SearchResults::from_outcome(generation, &text, outcome));
            }
            changed = input.changed() => {
                if changed.is_err() {
                    return;
                }
                log::debug!("[GEOCODER] Search for \"{}\" superseded before it resolved", text);
                pending = true;
            }
        }
    }
}
