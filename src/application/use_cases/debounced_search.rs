use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::application::use_cases::SearchConnectorUseCase;
use crate::application::SearchOptions;
use crate::domain::{ConnectorId, DomainError, SearchItem};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

/// Result of one debounced search request.
#[derive(Debug)]
pub struct SearchOutcome {
    pub generation: u64,
    pub connector: ConnectorId,
    pub query: String,
    pub result: Result<Vec<SearchItem>, DomainError>,
}

/// Debounces query changes and keeps at most one search alive.
///
/// Every [`request`](Self::request) cancels the previous request (pending
/// timer or in-flight search) and bumps the generation. Outcomes are
/// delivered through an internal channel and only outcomes of the current
/// generation are ever returned, so a slow, superseded search can never
/// overwrite newer state. Dropping the value cancels whatever is pending.
///
/// Requests spawn onto the ambient tokio runtime.
pub struct DebouncedSearch {
    use_case: Arc<SearchConnectorUseCase>,
    delay: Duration,
    limit: usize,
    generation: u64,
    in_flight: Option<CancellationToken>,
    tx: mpsc::UnboundedSender<SearchOutcome>,
    rx: mpsc::UnboundedReceiver<SearchOutcome>,
}

impl DebouncedSearch {
    pub fn new(use_case: Arc<SearchConnectorUseCase>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let limit = use_case.default_limit();
        Self {
            use_case,
            delay: DEFAULT_DEBOUNCE,
            limit,
            generation: 0,
            in_flight: None,
            tx,
            rx,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a request is waiting on its timer or its search.
    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Schedule a search for `query` after the debounce delay and return its
    /// generation.
    pub fn request(&mut self, connector: ConnectorId, query: impl Into<String>) -> u64 {
        self.cancel();
        let generation = self.generation;
        let query = query.into();

        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());

        let use_case = Arc::clone(&self.use_case);
        let tx = self.tx.clone();
        let delay = self.delay;
        let limit = self.limit;

        debug!("Scheduling {} search #{} for \"{}\"", connector, generation, query);

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }

            let options = SearchOptions::new(limit).with_cancellation(token.clone());
            let result = use_case.execute(connector, &query, options).await;

            if token.is_cancelled() {
                debug!("Dropping superseded {} search #{}", connector, generation);
                return;
            }

            let _ = tx.send(SearchOutcome {
                generation,
                connector,
                query,
                result,
            });
        });

        generation
    }

    /// Cancel the pending request, if any. Outcomes already queued become stale.
    pub fn cancel(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
        self.generation += 1;
    }

    pub fn is_current(&self, outcome: &SearchOutcome) -> bool {
        outcome.generation == self.generation
    }

    /// Next current outcome that is already available, skipping stale ones.
    pub fn try_next(&mut self) -> Option<SearchOutcome> {
        while let Ok(outcome) = self.rx.try_recv() {
            if self.is_current(&outcome) {
                self.in_flight = None;
                return Some(outcome);
            }
        }
        None
    }

    /// Wait for the next current outcome. Cancel safe.
    pub async fn next(&mut self) -> Option<SearchOutcome> {
        loop {
            let outcome = self.rx.recv().await?;
            if self.is_current(&outcome) {
                self.in_flight = None;
                return Some(outcome);
            }
            debug!("Ignoring stale search outcome #{}", outcome.generation);
        }
    }
}

impl Drop for DebouncedSearch {
    fn drop(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
    }
}
