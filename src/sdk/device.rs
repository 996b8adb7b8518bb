use crate::sdk::routing::coord::Coordinate;
use tokio::sync::{mpsc, watch};

/// Pushed by the platform's geolocation and orientation sources.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    LocationAvailable(Coordinate),
    HeadingChanged(f64),
    /// Permission denied or no fix. Only means no default origin.
    LocationUnavailable(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UserLocation {
    pub position: Option<Coordinate>,
    /// Compass heading in [0, 360).
    pub heading_degrees: Option<f64>,
}

/// Keeps the user's own marker up to date. Independent of the route overlay.
pub struct DeviceTracker {
    state: watch::Sender<UserLocation>,
}

impl Default for DeviceTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceTracker {
    pub fn new() -> Self {
        let (state, _rx) = watch::channel(UserLocation::default());
        Self { state }
    }

    pub fn subscribe(&self) -> watch::Receiver<UserLocation> {
        self.state.subscribe()
    }

    pub fn current(&self) -> UserLocation {
        *self.state.borrow()
    }

    /// Applies one event. Returns the position if it is the session's first fix.
    pub fn handle(&self, event: DeviceEvent) -> Option<Coordinate> {
        match event {
            DeviceEvent::LocationAvailable(position) => {
                let mut first = false;
                self.state.send_modify(|state| {
                    first = state.position.is_none();
                    state.position = Some(position);
                });
                if first {
                    log::info!("[DEVICE] Location available at {}", position);
                    Some(position)
                } else {
                    None
                }
            }
            DeviceEvent::HeadingChanged(degrees) => {
                if degrees.is_finite() {
                    self.state.send_modify(|state| {
                        state.heading_degrees = Some(degrees.rem_euclid(360.0));
                    });
                }
                None
            }
            DeviceEvent::LocationUnavailable(reason) => {
                log::warn!("[DEVICE] Location unavailable: {}", reason);
                None
            }
        }
    }

    /// Consumes events until the source hangs up, which is how a subscription
    /// ends. `on_first_fix` runs at most once.
    pub async fn run<F>(&self, mut events: mpsc::Receiver<DeviceEvent>, on_first_fix: F)
    where
        F: FnOnce(Coordinate),
    {
        let mut on_first_fix = Some(on_first_fix);
        while let Some(event) = events.recv().await {
            if let Some(position) = self.handle(event) {
                if let Some(callback) = on_first_fix.take() {
                    callback(position);
                }
            }
        }
        log::debug!("[DEVICE] Event source closed");
    }
}
