//! Run manager for coordinating concurrent searches.
//!
//! The RunManager is the central orchestrator for all searches. It keeps a
//! registry of runs, starts each search on its own tokio task and cancels
//! them on request.
//!
//! Every run gets a private event channel. A forwarding task folds those
//! events into the registry with [`apply_event`] and passes them on to the
//! front end, so [`RunManager::get_run`] always reflects what the front end
//! has been told.

use crate::annotator::{ChannelSink, StreamAnnotator};
use crate::config::AppConfig;
use crate::crew::CrewEngine;
use crate::llm::{ClientFactory, ModelClient, ModelError};
use crate::state::run::{apply_event, cancel_run, create_run, fail_run};
use anyhow::{anyhow, bail, Result};
use ps_protocol::ipc::{Event, Op};
use ps_protocol::{ModelSelection, Run};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;
use tokio::task::AbortHandle;
use uuid::Uuid;

/// Builds the model client for a search.
pub type ClientBuilder =
    Arc<dyn Fn(&ModelSelection) -> Result<Arc<dyn ModelClient>, ModelError> + Send + Sync>;

struct RunEntry {
    run: Run,
    /// Aborts the crew task; `None` once the run has ended.
    abort: Option<AbortHandle>,
    /// The run's private event channel; `None` once the run has ended.
    tx: Option<UnboundedSender<Event>>,
}

/// Manages all searches.
pub struct RunManager {
    runs: Arc<Mutex<HashMap<Uuid, RunEntry>>>,
    config: Arc<AppConfig>,
    events_tx: UnboundedSender<Event>,
    client_builder: ClientBuilder,
}

impl RunManager {
    /// Create a RunManager that reports to `events_tx`.
    ///
    /// Model clients come from [`ClientFactory::create`] unless replaced with
    /// [`RunManager::with_client_builder`].
    pub fn new(config: AppConfig, events_tx: UnboundedSender<Event>) -> Self {
        Self {
            runs: Arc::new(Mutex::new(HashMap::new())),
            config: Arc::new(config),
            events_tx,
            client_builder: Arc::new(ClientFactory::create),
        }
    }

    pub fn with_client_builder<F>(mut self, builder: F) -> Self
    where
        F: Fn(&ModelSelection) -> Result<Arc<dyn ModelClient>, ModelError> + Send + Sync + 'static,
    {
        self.client_builder = Arc::new(builder);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Start a search in the background and return its run id.
    ///
    /// `RunStarted` is always emitted. Problems found before the crew starts,
    /// such as a missing API key or an unknown crew, fail the run with a
    /// `RunError` event rather than returning an error.
    ///
    /// # Errors
    ///
    /// Returns an error only if `query` is blank.
    pub async fn start_search(&self, query: &str, selection: ModelSelection) -> Result<Uuid> {
        let query = query.trim();
        if query.is_empty() {
            bail!("Enter a product name or SKU to search for");
        }

        let mut run = create_run(query);
        let run_id = run.id;
        let (tx, rx) = unbounded_channel();

        self.runs.lock().await.insert(
            run_id,
            RunEntry {
                run: run.clone(),
                abort: None,
                tx: Some(tx.clone()),
            },
        );
        self.spawn_forwarder(run_id, rx);

        let _ = tx.send(Event::RunStarted {
            run_id,
            query: query.to_string(),
        });
        tracing::info!(%run_id, query, selection = ?selection, "search started");

        let client = match (self.client_builder)(&selection) {
            Ok(client) => client,
            Err(e) => {
                fail_run(&mut run, &tx, e.to_string());
                return Ok(run_id);
            }
        };
        let crew = match self.config.crew_for(query) {
            Ok(crew) => crew,
            Err(e) => {
                fail_run(&mut run, &tx, e.to_string());
                return Ok(run_id);
            }
        };

        let palette = self.config.global.annotator.palette.clone();
        let handle = tokio::spawn(async move {
            let mut annotator = StreamAnnotator::new(
                ChannelSink::new(run_id, tx.clone()),
                ChannelSink::new(run_id, tx.clone()),
            )
            .with_palette(palette)
            .with_roles(&crew.roles);

            let engine = CrewEngine::new(client);
            if let Err(e) = engine.run(&crew, &mut run, &mut annotator, &tx).await {
                tracing::debug!(%run_id, error = %e, "search ended with an error");
            }
        });

        if let Some(entry) = self.runs.lock().await.get_mut(&run_id) {
            if !entry.run.status.is_terminal() {
                entry.abort = Some(handle.abort_handle());
            }
        }

        Ok(run_id)
    }

    /// Cancel a running search. Output produced so far is kept.
    ///
    /// Cancelling a run that already ended does nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the run is not found.
    pub async fn cancel_search(&self, run_id: Uuid) -> Result<()> {
        let mut runs = self.runs.lock().await;
        let entry = runs
            .get_mut(&run_id)
            .ok_or_else(|| anyhow!("Run {run_id} not found"))?;

        if entry.run.status.is_terminal() {
            return Ok(());
        }

        if let Some(abort) = entry.abort.take() {
            abort.abort();
        }
        if let Some(tx) = &entry.tx {
            let mut run = entry.run.clone();
            cancel_run(&mut run, tx);
        }

        tracing::info!(%run_id, "search cancelled");
        Ok(())
    }

    /// Cancel every search that is still running.
    pub async fn shutdown(&self) {
        let active: Vec<Uuid> = self
            .runs
            .lock()
            .await
            .values()
            .filter(|entry| !entry.run.status.is_terminal())
            .map(|entry| entry.run.id)
            .collect();

        for run_id in active {
            let _ = self.cancel_search(run_id).await;
        }
        tracing::debug!("run manager shut down");
    }

    /// Get the current state of a run.
    pub async fn get_run(&self, run_id: Uuid) -> Option<Run> {
        self.runs
            .lock()
            .await
            .get(&run_id)
            .map(|entry| entry.run.clone())
    }

    /// All runs, oldest first.
    pub async fn list_runs(&self) -> Vec<Run> {
        let mut runs: Vec<Run> = self
            .runs
            .lock()
            .await
            .values()
            .map(|entry| entry.run.clone())
            .collect();
        runs.sort_by_key(|run| run.started_at);
        runs
    }

    /// Handle operations from a front end until `Op::Shutdown` arrives or the
    /// channel closes.
    pub async fn serve(&self, mut op_rx: UnboundedReceiver<Op>) {
        while let Some(op) = op_rx.recv().await {
            match op {
                Op::StartSearch { query, selection } => {
                    if let Err(e) = self.start_search(&query, selection).await {
                        tracing::warn!(error = %e, "search not started");
                    }
                }
                Op::CancelSearch { run_id } => {
                    if let Err(e) = self.cancel_search(run_id).await {
                        tracing::warn!(error = %e, "cancel failed");
                    }
                }
                Op::Shutdown => break,
            }
        }
        self.shutdown().await;
    }

    fn spawn_forwarder(&self, run_id: Uuid, mut rx: UnboundedReceiver<Event>) {
        let runs = Arc::clone(&self.runs);
        let events_tx = self.events_tx.clone();

        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                {
                    let mut runs = runs.lock().await;
                    let Some(entry) = runs.get_mut(&run_id) else {
                        break;
                    };
                    if !apply_event(&mut entry.run, &event) {
                        continue;
                    }
                    if entry.run.status.is_terminal() {
                        entry.abort = None;
                        entry.tx = None;
                    }
                }
                let _ = events_tx.send(event);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockClient;
    use ps_protocol::{ProviderKind, RunStatus};
    use std::time::Duration;
    use tokio::time::timeout;

    async fn events_until_terminal(rx: &mut UnboundedReceiver<Event>) -> Vec<Event> {
        let mut events = Vec::new();
        loop {
            let event = timeout(Duration::from_secs(5), rx.recv())
                .await
                .expect("timed out waiting for events")
                .expect("event channel closed");
            let done = event.is_terminal();
            events.push(event);
            if done {
                return events;
            }
        }
    }

    #[tokio::test]
    async fn test_mock_search_completes() {
        let (tx, mut rx) = unbounded_channel();
        let manager = RunManager::new(AppConfig::default(), tx);

        let run_id = manager
            .start_search("sony wh-1000xm5", ModelSelection::new(ProviderKind::Mock))
            .await
            .unwrap();
        let events = events_until_terminal(&mut rx).await;

        assert_eq!(
            events[0],
            Event::RunStarted {
                run_id,
                query: "sony wh-1000xm5".to_string(),
            }
        );
        assert!(matches!(events.last(), Some(Event::RunCompleted { result, .. }) if result.contains("best deal")));
        assert!(events.iter().any(|e| matches!(e, Event::TaskNotice { .. })));

        let run = manager.get_run(run_id).await.unwrap();
        assert_eq!(run.status, RunStatus::Completed);
        assert_eq!(run.current_task, 2);
        assert!(run.transcript().contains(":star: best deal"));
        assert!(run.transcript().contains(":green[Price: $"));
    }

    #[tokio::test]
    async fn test_missing_key_fails_run() {
        let (tx, mut rx) = unbounded_channel();
        let manager = RunManager::new(AppConfig::default(), tx);

        let run_id = manager
            .start_search("kettle", ModelSelection::new(ProviderKind::Groq))
            .await
            .unwrap();
        let events = events_until_terminal(&mut rx).await;

        assert!(matches!(
            events.last(),
            Some(Event::RunError { error, .. }) if error == "Missing API key for Groq"
        ));
        let run = manager.get_run(run_id).await.unwrap();
        assert_eq!(run.status, RunStatus::Failed);
    }

    #[tokio::test]
    async fn test_blank_query_is_rejected() {
        let (tx, _rx) = unbounded_channel();
        let manager = RunManager::new(AppConfig::default(), tx);

        let result = manager
            .start_search("   ", ModelSelection::new(ProviderKind::Mock))
            .await;
        assert!(result.is_err());
        assert!(manager.list_runs().await.is_empty());
    }

    #[tokio::test]
    async fn test_cancel_keeps_output() {
        let (tx, mut rx) = unbounded_channel();
        let manager = RunManager::new(AppConfig::default(), tx)
            .with_client_builder(|_| Ok(Arc::new(SlowClient) as Arc<dyn ModelClient>));

        let run_id = manager
            .start_search("kettle", ModelSelection::new(ProviderKind::Mock))
            .await
            .unwrap();

        // Wait until the crew is visibly running.
        loop {
            let event = timeout(Duration::from_secs(5), rx.recv()).await.unwrap().unwrap();
            if matches!(event, Event::LogBlock { .. }) {
                break;
            }
        }

        manager.cancel_search(run_id).await.unwrap();
        let events = events_until_terminal(&mut rx).await;
        assert_eq!(events.last(), Some(&Event::RunCancelled { run_id }));

        let run = manager.get_run(run_id).await.unwrap();
        assert_eq!(run.status, RunStatus::Cancelled);
        assert!(!run.log_blocks.is_empty());

        // Cancelling again is a no-op.
        manager.cancel_search(run_id).await.unwrap();
    }

    #[tokio::test]
    async fn test_cancel_unknown_run() {
        let (tx, _rx) = unbounded_channel();
        let manager = RunManager::new(AppConfig::default(), tx);

        assert!(manager.cancel_search(Uuid::new_v4()).await.is_err());
    }

    #[tokio::test]
    async fn test_serve_handles_ops() {
        let (events_tx, mut events_rx) = unbounded_channel();
        let (op_tx, op_rx) = unbounded_channel();
        let manager = Arc::new(RunManager::new(AppConfig::default(), events_tx));

        let server = {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move { manager.serve(op_rx).await })
        };

        op_tx
            .send(Op::StartSearch {
                query: "usb-c hub".to_string(),
                selection: ModelSelection::new(ProviderKind::Mock),
            })
            .unwrap();
        let events = events_until_terminal(&mut events_rx).await;
        assert!(matches!(events.last(), Some(Event::RunCompleted { .. })));

        op_tx.send(Op::Shutdown).unwrap();
        timeout(Duration::from_secs(5), server).await.unwrap().unwrap();
        assert_eq!(manager.list_runs().await.len(), 1);
    }

    #[tokio::test]
    async fn test_failing_client() {
        let (tx, mut rx) = unbounded_channel();
        let manager = RunManager::new(AppConfig::default(), tx)
            .with_client_builder(|_| Ok(Arc::new(MockClient::failing()) as Arc<dyn ModelClient>));

        manager
            .start_search("kettle", ModelSelection::new(ProviderKind::Mock))
            .await
            .unwrap();
        let events = events_until_terminal(&mut rx).await;

        assert!(matches!(
            events.last(),
            Some(Event::RunError { error, .. }) if error.contains("Mock failure")
        ));
    }

    /// Writes one line, then never finishes.
    struct SlowClient;

    #[async_trait::async_trait]
    impl ModelClient for SlowClient {
        fn describe(&self) -> String {
            "slow".to_string()
        }

        async fn check_availability(&self) -> bool {
            true
        }

        async fn complete(
            &self,
            _request: &crate::llm::CompletionRequest,
        ) -> Result<crate::llm::ModelEventStream, ModelError> {
            let first = tokio_stream::iter(vec![Ok(crate::llm::ModelEvent::Chunk(
                "thinking...\n".to_string(),
            ))]);
            Ok(Box::pin(tokio_stream::StreamExt::chain(
                first,
                tokio_stream::pending(),
            )))
        }
    }
}
