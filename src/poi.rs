//! Point-of-interest resolution: fan-out, join, and snapshot publication.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::PipelineError;
use crate::models::{Coordinate, PoiCandidate, ResolvedPoi};
use crate::viewport::{compute_viewport, Viewport};

/// Capability behind POI search: free-text completions plus a per-candidate
/// coordinate lookup.
#[async_trait]
pub trait PoiProvider: Send + Sync {
    /// Candidate completions for a free-text query
    async fn completions(&self, query: &str) -> Result<Vec<PoiCandidate>, PipelineError>;

    /// Resolve one candidate to a coordinate; `Ok(None)` when nothing matches
    async fn resolve(&self, candidate: &PoiCandidate)
        -> Result<Option<Coordinate>, PipelineError>;
}

/// Atomically published result of one query submission.
///
/// Replaced wholesale per submission; a consumer never observes a partially
/// resolved batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoiSnapshot {
    /// Submission counter; later submissions supersede earlier ones
    pub generation: u64,
    pub query: String,
    pub pois: Vec<ResolvedPoi>,
    /// Framing region; absent while no POI has resolved
    pub viewport: Option<Viewport>,
    pub error: Option<String>,
}

/// Resolves POI queries into coordinate sets and publishes them.
pub struct PoiResolver {
    provider: Arc<dyn PoiProvider>,
    generation: AtomicU64,
    tx: watch::Sender<PoiSnapshot>,
}

impl PoiResolver {
    pub fn new(provider: Arc<dyn PoiProvider>) -> Self {
        let (tx, _rx) = watch::channel(PoiSnapshot::default());
        Self {
            provider,
            generation: AtomicU64::new(0),
            tx,
        }
    }

    /// Subscribe to snapshot updates
    pub fn subscribe(&self) -> watch::Receiver<PoiSnapshot> {
        self.tx.subscribe()
    }

    /// The most recently published snapshot
    pub fn latest(&self) -> PoiSnapshot {
        self.tx.borrow().clone()
    }

    /// Resolve every candidate concurrently and keep the successes.
    ///
    /// All lookups are issued at once and the aggregate is produced only
    /// after every one has settled; a slow or failing lookup delays the
    /// aggregate but never aborts it. Candidates that fail or return no
    /// match are dropped. Output preserves input order.
    pub async fn resolve_all(&self, candidates: &[PoiCandidate]) -> Vec<ResolvedPoi> {
        let lookups = candidates
            .iter()
            .map(|candidate| self.provider.resolve(candidate));
        let settled = join_all(lookups).await;

        let mut resolved = Vec::with_capacity(candidates.len());
        for (candidate, outcome) in candidates.iter().zip(settled) {
            match outcome {
                Ok(Some(coordinate)) => {
                    resolved.push(ResolvedPoi::new(candidate.title.clone(), coordinate));
                }
                Ok(None) => {
                    debug!(title = %candidate.title, "candidate resolved to no match, dropping");
                }
                Err(e) => {
                    warn!(title = %candidate.title, error = %e, "candidate resolution failed, dropping");
                }
            }
        }
        resolved
    }

    /// Run one query end to end and publish the resulting snapshot.
    ///
    /// Completions, then the concurrent resolve of every candidate, then the
    /// viewport over whatever resolved. A newer submission supersedes an
    /// older in-flight one; the older result is discarded on arrival.
    pub async fn submit_query(&self, query: &str) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let candidates = match self.provider.completions(query).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(query, error = %e, "completion lookup failed");
                self.publish(PoiSnapshot {
                    generation,
                    query: query.to_string(),
                    pois: Vec::new(),
                    viewport: None,
                    error: Some(e.to_string()),
                });
                return;
            }
        };

        let pois = self.resolve_all(&candidates).await;
        let viewport = if pois.is_empty() {
            None
        } else {
            let points: Vec<Coordinate> = pois.iter().map(|p| p.coordinate).collect();
            compute_viewport(&points).ok()
        };

        self.publish(PoiSnapshot {
            generation,
            query: query.to_string(),
            pois,
            viewport,
            error: None,
        });
    }

    fn publish(&self, snapshot: PoiSnapshot) {
        self.tx.send_if_modified(|current| {
            if snapshot.generation < current.generation {
                debug!(
                    stale = snapshot.generation,
                    latest = current.generation,
                    "discarding stale POI batch"
                );
                return false;
            }
            *current = snapshot;
            true
        });
    }
}
