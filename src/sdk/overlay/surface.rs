use super::state::{MarkerKind, OverlayState};
use crate::sdk::device::UserLocation;
use crate::sdk::routing::coord::Coordinate;
use std::collections::HashMap;
use tokio::sync::watch;

/// The map widget. Implemented by the UI layer; the core only calls it.
pub trait RenderSurface: Send + Sync {
    fn set_overlay(&self, kind: MarkerKind, position: Coordinate, visible: bool);

    fn set_path(&self, coordinates: Option<&[Coordinate]>);

    fn fit_view_to(&self, coordinates: &[Coordinate]);

    /// Rotates the user-location marker.
    fn set_heading(&self, _degrees: f64) {}

    /// Zooms back out after the route is cleared.
    fn reset_view(&self) {}
}

/// Mirrors overlay and user-location state onto a [`RenderSurface`].
pub struct SurfaceBridge<S> {
    surface: S,
    shown: HashMap<MarkerKind, Coordinate>,
    route_shown: bool,
}

impl<S: RenderSurface> SurfaceBridge<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            shown: HashMap::new(),
            route_shown: false,
        }
    }

    pub fn render_overlay(&mut self, state: &OverlayState) {
        for kind in [MarkerKind::Start, MarkerKind::End] {
            match state.marker(kind) {
                Some(marker) => {
                    self.surface.set_overlay(kind, marker.position, marker.visible);
                    self.shown.insert(kind, marker.position);
                }
                None => {
                    if let Some(position) = self.shown.remove(&kind) {
                        self.surface.set_overlay(kind, position, false);
                    }
                }
            }
        }

        match &state.path {
            Some(path) => {
                self.surface.set_path(Some(path.points()));
                self.surface.fit_view_to(path.points());
                self.route_shown = true;
            }
            None => {
                self.surface.set_path(None);
                if self.route_shown {
                    self.surface.reset_view();
                    self.route_shown = false;
                }
            }
        }
    }

    pub fn render_user(&mut self, user: &UserLocation) {
        if let Some(position) = user.position {
            self.surface.set_overlay(MarkerKind::UserLocation, position, true);
        }
        if let Some(degrees) = user.heading_degrees {
            self.surface.set_heading(degrees);
        }
    }

    /// Renders until the overlay feed closes. A closed user-location feed
    /// only stops user-marker updates.
    pub async fn run(
        mut self,
        mut overlay: watch::Receiver<OverlayState>,
        mut user: watch::Receiver<UserLocation>,
    ) {
        let state = overlay.borrow_and_update().clone();
        self.render_overlay(&state);
        let location = *user.borrow_and_update();
        self.render_user(&location);

        let mut user_open = true;
        loop {
            tokio::select! {
                changed = overlay.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let state = overlay.borrow_and_update().clone();
                    self.render_overlay(&state);
                }
                changed = user.changed(), if user_open => {
                    if changed.is_err() {
                        user_open = false;
                        continue;
                    }
                    let location = *user.borrow_and_update();
                    self.render_user(&location);
                }
            }
        }
        log::debug!("[OVERLAY] Surface bridge stopped");
    }
}
