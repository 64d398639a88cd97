//! Background search execution where the latest search wins.
//!
//! Each [`SearchLoader::restart`] runs one pipeline invocation on its own
//! tokio task. Starting a new search aborts the previous task and bumps a
//! generation counter; any result still tagged with an older generation is
//! dropped by [`SearchLoader::next_finished`] instead of being delivered.

use crate::fetch::BodySource;
use crate::pipeline::{NewsPipeline, SearchOutcome};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// A completed search.
#[derive(Debug)]
pub struct LoadFinished {
    /// Which [`SearchLoader::restart`] call produced this result.
    pub generation: u64,
    pub outcome: SearchOutcome,
}

/// Runs searches off the caller's task, delivering only the newest result.
pub struct SearchLoader<S> {
    pipeline: Arc<NewsPipeline<S>>,
    generation: u64,
    in_flight: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<LoadFinished>,
    rx: mpsc::UnboundedReceiver<LoadFinished>,
}

impl<S> SearchLoader<S>
where
    S: BodySource + Send + Sync + 'static,
{
    pub fn new(pipeline: Arc<NewsPipeline<S>>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            pipeline,
            generation: 0,
            in_flight: None,
            tx,
            rx,
        }
    }

    /// Start a search for `request_url`, superseding any search in flight.
    ///
    /// Returns the generation assigned to the new search.
    pub fn restart(&mut self, request_url: String) -> u64 {
        if let Some(previous) = self.in_flight.take() {
            debug!(generation = self.generation, "Aborting superseded search");
            previous.abort();
        }

        self.generation += 1;
        let generation = self.generation;
        let pipeline = Arc::clone(&self.pipeline);
        let tx = self.tx.clone();

        self.in_flight = Some(tokio::spawn(async move {
            let outcome = pipeline.search(&request_url).await;
            // The receiver lives as long as the loader.
            let _ = tx.send(LoadFinished {
                generation,
                outcome,
            });
        }));
        info!(generation, "Search started");
        generation
    }

    /// Whether a search has been started and not yet delivered.
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Wait for the current search to finish.
    ///
    /// Results of superseded searches are discarded. Returns `None` when no
    /// search is in flight.
    pub async fn next_finished(&mut self) -> Option<LoadFinished> {
        if self.in_flight.is_none() {
            return None;
        }
        loop {
            let finished = self.rx.recv().await?;
            if finished.generation == self.generation {
                self.in_flight = None;
                return Some(finished);
            }
            debug!(
                stale = finished.generation,
                current = self.generation,
                "Discarding stale search result"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Canned, EchoQuery};
    use std::time::Duration;

    #[tokio::test]
    async fn test_single_search_is_delivered() {
        let body = r#"{"response":{"results":[{"webTitle":"Hello"}]}}"#;
        let mut loader = SearchLoader::new(Arc::new(NewsPipeline::new(Canned::body(body))));
        assert!(!loader.is_loading());

        let generation = loader.restart("https://example.com/search".to_string());
        assert!(loader.is_loading());

        let finished = loader.next_finished().await.unwrap();
        assert_eq!(finished.generation, generation);
        assert_eq!(finished.outcome.articles[0].title(), "Hello");
        assert!(!loader.is_loading());
    }

    #[tokio::test]
    async fn test_nothing_in_flight_returns_none() {
        let mut loader = SearchLoader::new(Arc::new(NewsPipeline::new(Canned::body(""))));
        assert!(loader.next_finished().await.is_none());
    }

    #[tokio::test]
    async fn test_later_search_supersedes_earlier() {
        let source = EchoQuery {
            delay: Duration::from_millis(300),
        };
        let mut loader = SearchLoader::new(Arc::new(NewsPipeline::new(source)));

        let first = loader.restart("https://example.com/search?q=slow".to_string());
        let second = loader.restart("https://example.com/search?q=fast".to_string());
        assert!(second > first);

        let finished = loader.next_finished().await.unwrap();
        assert_eq!(finished.generation, second);
        assert_eq!(finished.outcome.articles[0].title(), "fast");
        assert!(loader.next_finished().await.is_none());
    }

    #[tokio::test]
    async fn test_stale_result_already_sent_is_discarded() {
        let source = Canned::slow_body(
            r#"{"response":{"results":[{"webTitle":"same"}]}}"#,
            Duration::from_millis(50),
        );
        let mut loader = SearchLoader::new(Arc::new(NewsPipeline::new(source)));

        loader.restart("https://example.com/a".to_string());
        // Let the first search complete and queue its result.
        tokio::time::sleep(Duration::from_millis(200)).await;
        let latest = loader.restart("https://example.com/b".to_string());

        let finished = loader.next_finished().await.unwrap();
        assert_eq!(finished.generation, latest);
    }
}
