use crate::sdk::overlay::OverlayManager;
use crate::sdk::routing::coord::Coordinate;
use crate::sdk::routing::error::{FailureKind, FetchError, HttpError};
use crate::sdk::routing::route::{FetchOutcome, RequestId, RouteQuery};
use crate::sdk::routing::service::RoutingProvider;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

const EVENT_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Idle,
    Fetching(RequestId),
    Applied(RequestId),
    Failed(RequestId, FailureKind),
}

/// Notices for the UI. Superseded outcomes produce none.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteEvent {
    Applied(RequestId),
    Failed {
        request_id: RequestId,
        kind: FailureKind,
        message: &'static str,
    },
    Cleared,
}

/// What happened to one fetch outcome when it arrived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Settlement {
    Applied,
    Failed(FailureKind),
    Stale,
}

/// Handle to a submitted query. Dropping it does not cancel anything.
pub struct Submission {
    pub request_id: RequestId,
    handle: JoinHandle<Settlement>,
}

impl Submission {
    /// Waits for the outcome to arrive and be applied, reported or dropped.
    pub async fn settled(self) -> Settlement {
        match self.handle.await {
            Ok(settlement) => settlement,
            Err(e) => {
                log::error!("[CONTROLLER] Fetch task {} ended abnormally: {}", self.request_id, e);
                Settlement::Stale
            }
        }
    }
}

struct Inner {
    latest: RequestId,
    phase: Phase,
}

/// Drives route fetches and writes their results to the overlay. Only the
/// outcome of the most recent submission is ever applied; older ones are
/// discarded when they arrive, whatever order they arrive in.
pub struct RouteSearchController<R> {
    provider: R,
    overlay: OverlayManager,
    inner: Mutex<Inner>,
    events: broadcast::Sender<RouteEvent>,
}

impl<R: RoutingProvider + 'static> RouteSearchController<R> {
    pub fn new(provider: R, overlay: OverlayManager) -> Arc<Self> {
        let (events, _rx) = broadcast::channel(EVENT_CAPACITY);
        Arc::new(Self {
            provider,
            overlay,
            inner: Mutex::new(Inner {
                latest: RequestId::default(),
                phase: Phase::Idle,
            }),
            events,
        })
    }

    pub fn overlay(&self) -> &OverlayManager {
        &self.overlay
    }

    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RouteEvent> {
        self.events.subscribe()
    }

    /// Starts fetching a route. Must be called within a tokio runtime.
    pub fn submit(self: &Arc<Self>, from: Coordinate, to: Coordinate) -> Submission {
        let query = self.begin(from, to);
        let this = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let fetcher = Arc::clone(&this);
            let fetch = tokio::spawn(async move {
                fetcher.provider.fetch_route(query.from, query.to).await
            });
            let outcome = fetch.await.unwrap_or_else(|e| {
                log::error!("[CONTROLLER] Fetch for {} aborted: {}", query.request_id, e);
                Err(FetchError::Network(HttpError::Transport(e.to_string())))
            });
            this.settle(query, outcome)
        });

        Submission {
            request_id: query.request_id,
            handle,
        }
    }

    /// Removes the route overlay and invalidates any fetch still in flight.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.latest = inner.latest.next();
        inner.phase = Phase::Idle;
        self.overlay.clear();
        log::info!("[CONTROLLER] Route cleared");
        let _ = self.events.send(RouteEvent::Cleared);
    }

    fn begin(&self, from: Coordinate, to: Coordinate) -> RouteQuery {
        let mut inner = self.lock();
        inner.latest = inner.latest.next();
        inner.phase = Phase::Fetching(inner.latest);
        log::info!(
            "[CONTROLLER] Request {}: route {} -> {}",
            inner.latest,
            from,
            to
        );
        RouteQuery {
            from,
            to,
            request_id: inner.latest,
        }
    }

    fn settle(&self, query: RouteQuery, outcome: FetchOutcome) -> Settlement {
        let mut inner = self.lock();
        let id = query.request_id;
        if id != inner.latest {
            log::debug!(
                "[CONTROLLER] Dropping outcome of {}; {} is newer",
                id,
                inner.latest
            );
            return Settlement::Stale;
        }

        match outcome {
            Ok(path) => {
                self.overlay.apply(query.from, query.to, path);
                inner.phase = Phase::Applied(id);
                log::info!("[CONTROLLER] Request {} applied", id);
                let _ = self.events.send(RouteEvent::Applied(id));
                Settlement::Applied
            }
            Err(e) => {
                let kind = e.kind();
                inner.phase = Phase::Failed(id, kind);
                log::warn!("[CONTROLLER] Request {} failed: {}", id, e);
                let _ = self.events.send(RouteEvent::Failed {
                    request_id: id,
                    kind,
                    message: kind.user_message(),
                });
                Settlement::Failed(kind)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::overlay::OverlayState;
    use crate::sdk::routing::coord::RoutePath;
    use crate::sdk::routing::error::{DecodeError, FetchError, HttpError};
    use std::collections::VecDeque;
    use tokio::sync::oneshot;

    /// Each fetch waits on the next gate, so the test decides when and in
    /// which order outcomes arrive.
    #[derive(Default)]
    struct GatedRoutes {
        gates: Mutex<VecDeque<oneshot::Receiver<FetchOutcome>>>,
    }

    impl GatedRoutes {
        fn with_gates(count: usize) -> (Self, Vec<oneshot::Sender<FetchOutcome>>) {
            let mut senders = Vec::new();
            let mut receivers = VecDeque::new();
            for _ in 0..count {
                let (tx, rx) = oneshot::channel();
                senders.push(tx);
                receivers.push_back(rx);
            }
            (
                Self {
                    gates: Mutex::new(receivers),
                },
                senders,
            )
        }
    }

    impl RoutingProvider for GatedRoutes {
        async fn fetch_route(&self, _from: Coordinate, _to: Coordinate) -> FetchOutcome {
            let gate = self
                .gates
                .lock()
                .unwrap()
                .pop_front()
                .expect("no gate left for this request");
            gate.await
                .unwrap_or_else(|_| Err(HttpError::Transport("gate dropped".into()).into()))
        }
    }

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn path(from: Coordinate, to: Coordinate) -> RoutePath {
        RoutePath::new(vec![from, to]).unwrap()
    }

    struct Places {
        a: Coordinate,
        b: Coordinate,
        c: Coordinate,
        d: Coordinate,
    }

    fn places() -> Places {
        Places {
            a: coord(-6.2, 106.8),
            b: coord(-6.9, 107.6),
            c: coord(-7.25, 112.75),
            d: coord(-8.65, 115.22),
        }
    }

    #[tokio::test]
    async fn success_applies_markers_and_path() {
        let p = places();
        let (routes, mut gates) = GatedRoutes::with_gates(1);
        let controller = RouteSearchController::new(routes, OverlayManager::new());
        let mut events = controller.subscribe();

        let submission = controller.submit(p.a, p.b);
        assert_eq!(controller.phase(), Phase::Fetching(submission.request_id));

        let id = submission.request_id;
        gates.remove(0).send(Ok(path(p.a, p.b))).unwrap();
        assert_eq!(submission.settled().await, Settlement::Applied);

        assert_eq!(
            controller.overlay().current(),
            OverlayState::route(p.a, p.b, path(p.a, p.b))
        );
        assert_eq!(controller.phase(), Phase::Applied(id));
        assert_eq!(events.try_recv().unwrap(), RouteEvent::Applied(id));
    }

    #[tokio::test]
    async fn older_outcome_arriving_first_is_discarded() {
        let p = places();
        let (routes, mut gates) = GatedRoutes::with_gates(2);
        let controller = RouteSearchController::new(routes, OverlayManager::new());

        let first = controller.submit(p.a, p.b);
        let second = controller.submit(p.c, p.d);
        let second_gate = gates.remove(1);
        let first_gate = gates.remove(0);

        first_gate.send(Ok(path(p.a, p.b))).unwrap();
        assert_eq!(first.settled().await, Settlement::Stale);
        assert!(controller.overlay().current().is_cleared());

        second_gate.send(Ok(path(p.c, p.d))).unwrap();
        assert_eq!(second.settled().await, Settlement::Applied);
        assert_eq!(
            controller.overlay().current(),
            OverlayState::route(p.c, p.d, path(p.c, p.d))
        );
    }

    #[tokio::test]
    async fn older_outcome_arriving_last_is_discarded() {
        let p = places();
        let (routes, mut gates) = GatedRoutes::with_gates(2);
        let controller = RouteSearchController::new(routes, OverlayManager::new());
        let mut events = controller.subscribe();

        let first = controller.submit(p.a, p.b);
        let second = controller.submit(p.c, p.d);
        let second_id = second.request_id;
        let second_gate = gates.remove(1);
        let first_gate = gates.remove(0);

        second_gate.send(Ok(path(p.c, p.d))).unwrap();
        assert_eq!(second.settled().await, Settlement::Applied);

        first_gate.send(Ok(path(p.a, p.b))).unwrap();
        assert_eq!(first.settled().await, Settlement::Stale);

        assert_eq!(
            controller.overlay().current(),
            OverlayState::route(p.c, p.d, path(p.c, p.d))
        );
        assert_eq!(controller.phase(), Phase::Applied(second_id));
        assert_eq!(events.try_recv().unwrap(), RouteEvent::Applied(second_id));
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn stale_failure_is_not_surfaced() {
        let p = places();
        let (routes, mut gates) = GatedRoutes::with_gates(2);
        let controller = RouteSearchController::new(routes, OverlayManager::new());
        let mut events = controller.subscribe();

        let first = controller.submit(p.a, p.b);
        let second = controller.submit(p.c, p.d);
        let second_gate = gates.remove(1);
        let first_gate = gates.remove(0);

        first_gate.send(Err(FetchError::NoRouteFound)).unwrap();
        assert_eq!(first.settled().await, Settlement::Stale);
        assert_eq!(controller.phase(), Phase::Fetching(second.request_id));
        assert!(events.try_recv().is_err());

        second_gate.send(Ok(path(p.c, p.d))).unwrap();
        second.settled().await;
    }

    #[tokio::test]
    async fn failure_leaves_previous_route_untouched() {
        let p = places();
        let (routes, mut gates) = GatedRoutes::with_gates(2);
        let controller = RouteSearchController::new(routes, OverlayManager::new());

        let first = controller.submit(p.a, p.b);
        gates.remove(0).send(Ok(path(p.a, p.b))).unwrap();
        first.settled().await;
        let before = controller.overlay().current();

        let mut events = controller.subscribe();
        let second = controller.submit(p.c, p.d);
        let id = second.request_id;
        gates
            .remove(0)
            .send(Err(DecodeError::Truncated { offset: 7 }.into()))
            .unwrap();
        assert_eq!(
            second.settled().await,
            Settlement::Failed(FailureKind::DecodeFailure)
        );

        assert_eq!(controller.overlay().current(), before);
        assert_eq!(
            controller.phase(),
            Phase::Failed(id, FailureKind::DecodeFailure)
        );
        assert_eq!(
            events.try_recv().unwrap(),
            RouteEvent::Failed {
                request_id: id,
                kind: FailureKind::DecodeFailure,
                message: FailureKind::DecodeFailure.user_message(),
            }
        );
    }

    #[tokio::test]
    async fn clear_resets_overlay_and_invalidates_in_flight_fetch() {
        let p = places();
        let (routes, mut gates) = GatedRoutes::with_gates(2);
        let controller = RouteSearchController::new(routes, OverlayManager::new());

        let first = controller.submit(p.a, p.b);
        gates.remove(0).send(Ok(path(p.a, p.b))).unwrap();
        first.settled().await;

        let pending = controller.submit(p.c, p.d);
        controller.clear();
        assert!(controller.overlay().current().is_cleared());
        assert_eq!(controller.phase(), Phase::Idle);

        gates.remove(0).send(Ok(path(p.c, p.d))).unwrap();
        assert_eq!(pending.settled().await, Settlement::Stale);
        assert!(controller.overlay().current().is_cleared());
        assert_eq!(controller.phase(), Phase::Idle);
    }

    struct PanickingRoutes;

    impl RoutingProvider for PanickingRoutes {
        async fn fetch_route(&self, _from: Coordinate, _to: Coordinate) -> FetchOutcome {
            panic!("route backend blew up");
        }
    }

    #[tokio::test]
    async fn panicking_fetch_fails_the_request() {
        let p = places();
        let controller = RouteSearchController::new(PanickingRoutes, OverlayManager::new());
        let mut events = controller.subscribe();

        let submission = controller.submit(p.a, p.b);
        let id = submission.request_id;
        assert_eq!(
            submission.settled().await,
            Settlement::Failed(FailureKind::NetworkFailure)
        );

        assert!(controller.overlay().current().is_cleared());
        assert_eq!(
            controller.phase(),
            Phase::Failed(id, FailureKind::NetworkFailure)
        );
        assert_eq!(
            events.try_recv().unwrap(),
            RouteEvent::Failed {
                request_id: id,
                kind: FailureKind::NetworkFailure,
                message: FailureKind::NetworkFailure.user_message(),
            }
        );
    }

    #[tokio::test]
    async fn clear_is_always_accepted() {
        let (routes, _gates) = GatedRoutes::with_gates(0);
        let controller = RouteSearchController::new(routes, OverlayManager::new());
        let mut events = controller.subscribe();

        controller.clear();
        controller.clear();

        assert!(controller.overlay().current().is_cleared());
        assert_eq!(events.try_recv().unwrap(), RouteEvent::Cleared);
        assert_eq!(events.try_recv().unwrap(), RouteEvent::Cleared);
    }
}
