//! Pipeline orchestration: one fetch cycle per coordinate, one atomic
//! snapshot per cycle.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::{pin_mut, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::alerts::AlertSource;
use crate::conditions::{ConditionsSource, CurrentConditions};
use crate::error::PipelineError;
use crate::geocode::{resolve_place_name, ReverseGeocode};
use crate::location::{LocationUpdate, PermissionStatus};
use crate::models::{Alert, Coordinate, PlaceName};

/// Complete result of one fetch cycle, published atomically.
///
/// Replaced wholesale per cycle; a consumer never observes a place name
/// paired with alerts fetched for a different coordinate. The initial value
/// is an empty sentinel at generation zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaceAlertSnapshot {
    /// Fetch-cycle counter; later cycles supersede earlier ones
    pub generation: u64,
    /// Coordinate the cycle ran for; absent only in the sentinel
    pub coordinate: Option<Coordinate>,
    pub place: PlaceName,
    /// Active alerts in feed order
    pub alerts: Vec<Alert>,
    /// Current observed weather, when a conditions source is configured
    pub conditions: Option<CurrentConditions>,
    /// Degraded-fetch or permission advisory for the consumer to display
    pub error: Option<String>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl PlaceAlertSnapshot {
    /// Alerts sorted most urgent first. Derived view; the stored list keeps
    /// feed order, and ties here keep it too.
    pub fn alerts_by_urgency(&self) -> Vec<Alert> {
        let mut sorted = self.alerts.clone();
        sorted.sort_by(|a, b| b.severity.cmp(&a.severity));
        sorted
    }

    /// The most urgent alert; first in feed order among equals
    pub fn most_urgent(&self) -> Option<&Alert> {
        self.alerts.iter().fold(None, |best, alert| match best {
            Some(current) if current.severity >= alert.severity => Some(current),
            _ => Some(alert),
        })
    }
}

/// The hazard-advisory pipeline.
///
/// One shared instance serves every consumer; construct it once, inject it
/// into the presentation layer, and tear it down by dropping it. Providers
/// come in as trait objects so tests and alternative backends can stand in.
pub struct HazardPipeline {
    geocoder: Arc<dyn ReverseGeocode>,
    alerts: Arc<dyn AlertSource>,
    conditions: Option<Arc<dyn ConditionsSource>>,
    generation: AtomicU64,
    tx: watch::Sender<PlaceAlertSnapshot>,
}

impl HazardPipeline {
    pub fn new(geocoder: Arc<dyn ReverseGeocode>, alerts: Arc<dyn AlertSource>) -> Self {
        let (tx, _rx) = watch::channel(PlaceAlertSnapshot::default());
        Self {
            geocoder,
            alerts,
            conditions: None,
            generation: AtomicU64::new(0),
            tx,
        }
    }

    /// Enrich every snapshot with current conditions from `source`
    pub fn with_conditions(mut self, source: Arc<dyn ConditionsSource>) -> Self {
        self.conditions = Some(source);
        self
    }

    /// Subscribe to snapshot updates
    pub fn subscribe(&self) -> watch::Receiver<PlaceAlertSnapshot> {
        self.tx.subscribe()
    }

    /// The most recently published snapshot
    pub fn latest(&self) -> PlaceAlertSnapshot {
        self.tx.borrow().clone()
    }

    /// Run one fetch cycle for `coordinate` and publish its snapshot.
    ///
    /// Geocode, alert fetch, and the optional conditions fetch run
    /// concurrently; the snapshot publishes only after all of them settle.
    /// A failed alert fetch degrades to an empty list plus a recorded cause
    /// so the consumer always has a displayable state. A cycle that loses
    /// the race against a newer coordinate is discarded on arrival.
    pub async fn refresh(&self, coordinate: Coordinate) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(%coordinate, generation, "starting fetch cycle");

        let place_fut = resolve_place_name(self.geocoder.as_ref(), coordinate);
        let alerts_fut = self.alerts.active_alerts(coordinate);
        let conditions_fut = async {
            match &self.conditions {
                Some(source) => match source.current(coordinate).await {
                    Ok(current) => Some(current),
                    Err(e) => {
                        warn!(%coordinate, error = %e, "conditions fetch failed, continuing without");
                        None
                    }
                },
                None => None,
            }
        };

        let (place, alerts_result, conditions) = tokio::join!(place_fut, alerts_fut, conditions_fut);

        let (alerts, error) = match alerts_result {
            Ok(alerts) => (alerts, None),
            Err(e) => {
                warn!(%coordinate, error = %e, "alert fetch failed, publishing empty list");
                (Vec::new(), Some(e.to_string()))
            }
        };

        self.publish(PlaceAlertSnapshot {
            generation,
            coordinate: Some(coordinate),
            place,
            alerts,
            conditions,
            error,
            fetched_at: Some(Utc::now()),
        });
    }

    /// Surface a permission-state transition.
    ///
    /// A blocked state leaves a user-actionable advisory in the snapshot's
    /// error field without erasing previously published data; other states
    /// only log.
    pub fn report_permission(&self, status: PermissionStatus) {
        if status.is_blocked() {
            warn!(%status, "location access blocked");
            let message = PipelineError::Permission(status).to_string();
            self.tx.send_modify(|snapshot| snapshot.error = Some(message));
        } else {
            debug!(%status, "location permission update");
        }
    }

    /// Consume the location capability's update stream until it ends.
    ///
    /// Each position spawns its own fetch cycle so a newer coordinate never
    /// waits behind an older one; the generation guard settles the race in
    /// favor of the latest coordinate.
    pub async fn run(self: Arc<Self>, updates: impl Stream<Item = LocationUpdate>) {
        pin_mut!(updates);
        while let Some(update) = updates.next().await {
            match update {
                LocationUpdate::Position(coordinate) => {
                    let pipeline = Arc::clone(&self);
                    tokio::spawn(async move { pipeline.refresh(coordinate).await });
                }
                LocationUpdate::Permission(status) => self.report_permission(status),
            }
        }
        debug!("location update stream ended");
    }

    fn publish(&self, snapshot: PlaceAlertSnapshot) {
        self.tx.send_if_modified(|current| {
            if snapshot.generation < current.generation {
                debug!(
                    stale = snapshot.generation,
                    latest = current.generation,
                    "discarding stale fetch cycle"
                );
                return false;
            }
            *current = snapshot;
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::Placemark;
    use crate::severity::SeverityTier;
    use async_trait::async_trait;
    use tokio::sync::Notify;

    /// Geocoder double; optionally holds the cycle for one latitude until
    /// released, to sequence racing cycles deterministically.
    #[derive(Default)]
    struct TestGeocoder {
        hold_latitude: Option<f64>,
        release: Notify,
    }

    #[async_trait]
    impl ReverseGeocode for TestGeocoder {
        async fn reverse_geocode(
            &self,
            coordinate: Coordinate,
        ) -> Result<Option<Placemark>, PipelineError> {
            if self.hold_latitude == Some(coordinate.latitude) {
                self.release.notified().await;
            }
            Ok(Some(Placemark {
                locality: Some(format!("City {:.0}", coordinate.latitude)),
                region: Some("NY".to_string()),
            }))
        }
    }

    #[derive(Default)]
    struct TestAlerts {
        fail: bool,
    }

    #[async_trait]
    impl AlertSource for TestAlerts {
        async fn active_alerts(
            &self,
            coordinate: Coordinate,
        ) -> Result<Vec<Alert>, PipelineError> {
            if self.fail {
                return Err(PipelineError::NotFound {
                    query: coordinate.point_query(),
                });
            }
            Ok(vec![Alert::new(
                format!("A-{:.0}", coordinate.latitude),
                "Flood Watch",
                SeverityTier::Severe,
            )])
        }
    }

    struct FailingConditions;

    #[async_trait]
    impl ConditionsSource for FailingConditions {
        async fn current(
            &self,
            _coordinate: Coordinate,
        ) -> Result<CurrentConditions, PipelineError> {
            Err(PipelineError::NotFound {
                query: "conditions".into(),
            })
        }
    }

    fn pipeline() -> HazardPipeline {
        HazardPipeline::new(
            Arc::new(TestGeocoder::default()),
            Arc::new(TestAlerts::default()),
        )
    }

    #[tokio::test]
    async fn test_refresh_publishes_a_complete_snapshot() {
        let pipeline = pipeline();
        pipeline.refresh(Coordinate::new(40.0, -74.0)).await;

        let snapshot = pipeline.latest();
        assert_eq!(snapshot.generation, 1);
        assert_eq!(snapshot.coordinate, Some(Coordinate::new(40.0, -74.0)));
        assert_eq!(snapshot.place, PlaceName::new("City 40", "NY"));
        assert_eq!(snapshot.alerts.len(), 1);
        assert_eq!(snapshot.alerts[0].id, "A-40");
        assert!(snapshot.error.is_none());
        assert!(snapshot.fetched_at.is_some());
    }

    #[tokio::test]
    async fn test_alert_failure_degrades_to_an_empty_list() {
        let pipeline = HazardPipeline::new(
            Arc::new(TestGeocoder::default()),
            Arc::new(TestAlerts { fail: true }),
        );
        pipeline.refresh(Coordinate::new(40.0, -74.0)).await;

        let snapshot = pipeline.latest();
        assert!(snapshot.alerts.is_empty());
        assert!(snapshot.error.is_some());
        // The rest of the cycle still publishes normally.
        assert_eq!(snapshot.place, PlaceName::new("City 40", "NY"));
    }

    #[tokio::test]
    async fn test_failing_conditions_source_yields_none() {
        let pipeline = pipeline().with_conditions(Arc::new(FailingConditions));
        pipeline.refresh(Coordinate::new(40.0, -74.0)).await;

        let snapshot = pipeline.latest();
        assert!(snapshot.conditions.is_none());
        assert_eq!(snapshot.alerts.len(), 1);
        assert!(snapshot.error.is_none());
    }

    #[tokio::test]
    async fn test_stale_cycle_never_overwrites_a_newer_snapshot() {
        let geocoder = Arc::new(TestGeocoder {
            hold_latitude: Some(1.0),
            release: Notify::new(),
        });
        let pipeline = Arc::new(HazardPipeline::new(
            geocoder.clone(),
            Arc::new(TestAlerts::default()),
        ));

        let older = {
            let pipeline = pipeline.clone();
            tokio::spawn(async move { pipeline.refresh(Coordinate::new(1.0, 0.0)).await })
        };
        // Let the older cycle claim its generation before the newer one runs.
        tokio::task::yield_now().await;

        pipeline.refresh(Coordinate::new(2.0, 0.0)).await;
        assert_eq!(pipeline.latest().place.locality, "City 2");

        geocoder.release.notify_one();
        older.await.unwrap();

        let snapshot = pipeline.latest();
        assert_eq!(snapshot.place.locality, "City 2");
        assert_eq!(snapshot.coordinate, Some(Coordinate::new(2.0, 0.0)));
        assert_eq!(snapshot.generation, 2);
    }

    #[tokio::test]
    async fn test_blocked_permission_surfaces_without_erasing_data() {
        let pipeline = pipeline();
        pipeline.refresh(Coordinate::new(40.0, -74.0)).await;

        pipeline.report_permission(PermissionStatus::Denied);

        let snapshot = pipeline.latest();
        let advisory = snapshot.error.unwrap();
        assert!(advisory.contains("denied"));
        assert_eq!(snapshot.place, PlaceName::new("City 40", "NY"));
        assert_eq!(snapshot.alerts.len(), 1);
    }

    #[tokio::test]
    async fn test_non_blocked_permission_states_only_log() {
        let pipeline = pipeline();
        pipeline.report_permission(PermissionStatus::NotDetermined);
        pipeline.report_permission(PermissionStatus::Authorized);
        assert!(pipeline.latest().error.is_none());
    }

    #[tokio::test]
    async fn test_run_consumes_permission_updates() {
        let pipeline = Arc::new(pipeline());
        let updates = futures::stream::iter([LocationUpdate::Permission(
            PermissionStatus::Restricted,
        )]);

        pipeline.clone().run(updates).await;

        assert!(pipeline.latest().error.unwrap().contains("restricted"));
    }

    #[test]
    fn test_urgency_ordering_is_derived_and_tie_stable() {
        let snapshot = PlaceAlertSnapshot {
            alerts: vec![
                Alert::new("low", "a", SeverityTier::Minor),
                Alert::new("first-severe", "b", SeverityTier::Severe),
                Alert::new("unknown", "c", SeverityTier::Unknown),
                Alert::new("second-severe", "d", SeverityTier::Severe),
            ],
            ..Default::default()
        };

        let sorted = snapshot.alerts_by_urgency();
        let ids: Vec<&str> = sorted.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["first-severe", "second-severe", "low", "unknown"]);

        // Stored order is untouched.
        assert_eq!(snapshot.alerts[0].id, "low");
        assert_eq!(snapshot.most_urgent().unwrap().id, "first-severe");
    }

    #[test]
    fn test_most_urgent_on_an_empty_snapshot() {
        assert!(PlaceAlertSnapshot::default().most_urgent().is_none());
    }
}
