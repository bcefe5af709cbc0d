//! Event catalog client and its loading state machine.
//!
//! `Idle → Loading → Loaded | Failed`. Each fetch carries its own
//! [`CancellationToken`] and a generation number; a result is committed only
//! while its token is live and its generation is the newest one, so a
//! superseded or aborted request can never overwrite state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use klife_core::{CatalogPayload, EventRecord};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::CatalogError;

/// Thin HTTP wrapper around the events endpoint.
#[derive(Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    url: String,
}

impl CatalogClient {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, url))
    }

    /// Create from an existing `reqwest::Client` (e.g. shared with the auth client).
    pub fn with_client(client: reqwest::Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the catalog once. Resolves to [`CatalogError::Cancelled`] as
    /// soon as `cancel` fires.
    pub async fn fetch(&self, cancel: &CancellationToken) -> Result<Vec<EventRecord>, CatalogError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(CatalogError::Cancelled),
            result = self.fetch_uncancelled() => result,
        }
    }

    async fn fetch_uncancelled(&self) -> Result<Vec<EventRecord>, CatalogError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(CatalogError::network)?;
        let status = resp.status().as_u16();
        let raw = resp.text().await.map_err(CatalogError::network)?;
        let payload = CatalogPayload::parse(raw);

        if status != 200 {
            return Err(CatalogError::Status(status));
        }
        payload.into_records().map_err(|e| CatalogError::Malformed {
            detail: e.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogState {
    Idle,
    Loading,
    Loaded(Arc<Vec<EventRecord>>),
    Failed(CatalogError),
}

impl CatalogState {
    pub fn records(&self) -> Option<&[EventRecord]> {
        match self {
            Self::Loaded(records) => Some(records.as_slice()),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&CatalogError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

struct InFlight {
    generation: u64,
    cancel: CancellationToken,
}

struct Control {
    state: CatalogState,
    generation: u64,
    in_flight: Option<InFlight>,
}

struct Shared {
    control: Mutex<Control>,
    /// Highest generation whose fetch has finished (committed or discarded).
    settled: watch::Sender<u64>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Control> {
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn snapshot(&self) -> CatalogState {
        self.lock().state.clone()
    }

    fn commit(
        &self,
        generation: u64,
        cancel: &CancellationToken,
        result: Result<Vec<EventRecord>, CatalogError>,
    ) {
        {
            let mut ctl = self.lock();
            if cancel.is_cancelled() || ctl.generation != generation {
                tracing::debug!(generation, "discarding superseded catalog fetch");
            } else {
                ctl.in_flight = None;
                ctl.state = match result {
                    Ok(records) => {
                        tracing::debug!(generation, count = records.len(), "catalog loaded");
                        CatalogState::Loaded(Arc::new(records))
                    }
                    Err(e) => {
                        tracing::warn!(generation, "catalog fetch failed: {e:?}");
                        CatalogState::Failed(e)
                    }
                };
            }
        }
        self.mark_settled(generation);
    }

    fn mark_settled(&self, generation: u64) {
        self.settled.send_if_modified(|g| {
            if generation > *g {
                *g = generation;
                true
            } else {
                false
            }
        });
    }
}

/// Awaitable handle for one fetch started by [`CatalogLoader::refresh`].
pub struct FetchHandle {
    task: JoinHandle<()>,
    shared: Arc<Shared>,
}

impl FetchHandle {
    /// Wait for the fetch to finish and return the state afterwards.
    pub async fn finished(self) -> CatalogState {
        if let Err(e) = self.task.await {
            tracing::error!("catalog fetch task failed: {e}");
        }
        self.shared.snapshot()
    }
}

/// Owns the catalog state for one consumer (a page, a CLI run).
#[derive(Clone)]
pub struct CatalogLoader {
    client: CatalogClient,
    shared: Arc<Shared>,
}

impl CatalogLoader {
    pub fn new(client: CatalogClient) -> Self {
        let (settled, _) = watch::channel(0);
        Self {
            client,
            shared: Arc::new(Shared {
                control: Mutex::new(Control {
                    state: CatalogState::Idle,
                    generation: 0,
                    in_flight: None,
                }),
                settled,
            }),
        }
    }

    pub fn snapshot(&self) -> CatalogState {
        self.shared.snapshot()
    }

    /// Use externally supplied records; no fetch will be made for them.
    pub fn seed(&self, records: Vec<EventRecord>) {
        let generation = {
            let mut ctl = self.shared.lock();
            if let Some(prev) = ctl.in_flight.take() {
                prev.cancel.cancel();
            }
            ctl.generation += 1;
            ctl.state = CatalogState::Loaded(Arc::new(records));
            ctl.generation
        };
        self.shared.mark_settled(generation);
    }

    /// Start a new fetch, aborting any fetch still in flight.
    pub fn refresh(&self) -> FetchHandle {
        let (generation, cancel) = {
            let mut ctl = self.shared.lock();
            if let Some(prev) = ctl.in_flight.take() {
                tracing::debug!(generation = prev.generation, "superseding catalog fetch");
                prev.cancel.cancel();
            }
            ctl.generation += 1;
            let cancel = CancellationToken::new();
            ctl.in_flight = Some(InFlight {
                generation: ctl.generation,
                cancel: cancel.clone(),
            });
            ctl.state = CatalogState::Loading;
            (ctl.generation, cancel)
        };

        let client = self.client.clone();
        let shared = Arc::clone(&self.shared);
        let task = tokio::spawn(async move {
            let result = client.fetch(&cancel).await;
            shared.commit(generation, &cancel, result);
        });

        FetchHandle {
            task,
            shared: Arc::clone(&self.shared),
        }
    }

    /// Abort the in-flight fetch. Its result is discarded and the current
    /// state is left untouched.
    pub fn cancel(&self) {
        if let Some(prev) = self.shared.lock().in_flight.take() {
            tracing::debug!(generation = prev.generation, "cancelling catalog fetch");
            prev.cancel.cancel();
        }
    }

    /// Fetch unless records are already held, otherwise wait for any fetch
    /// in flight. A failed load is retried. Returns the resulting state.
    pub async fn ensure_loaded(&self) -> CatalogState {
        let needs_fetch = {
            let ctl = self.shared.lock();
            ctl.in_flight.is_none() && !matches!(ctl.state, CatalogState::Loaded(_))
        };
        if needs_fetch {
            return self.refresh().finished().await;
        }
        self.settled().await
    }

    /// Wait until no fetch is in flight.
    pub async fn settled(&self) -> CatalogState {
        let mut settled = self.shared.settled.subscribe();
        loop {
            let pending = self.shared.lock().in_flight.as_ref().map(|f| f.generation);
            let Some(generation) = pending else {
                return self.snapshot();
            };
            if settled.wait_for(|g| *g >= generation).await.is_err() {
                return self.snapshot();
            }
        }
    }
}
