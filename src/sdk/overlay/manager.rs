use super::state::OverlayState;
use crate::sdk::routing::coord::{Coordinate, RoutePath};
use std::sync::Arc;
use tokio::sync::watch;

/// Sole writer of [`OverlayState`]. Cloning yields another handle to the same
/// state. Each write swaps the whole value under the channel lock, so readers
/// never observe a mix of old and new fields.
#[derive(Clone)]
pub struct OverlayManager {
    state: Arc<watch::Sender<OverlayState>>,
}

impl Default for OverlayManager {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayManager {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(OverlayState::default());
        Self {
            state: Arc::new(tx),
        }
    }

    pub fn apply(&self, start: Coordinate, end: Coordinate, path: RoutePath) {
        log::debug!(
            "[OVERLAY] Showing route {} -> {} ({} points)",
            start,
            end,
            path.len()
        );
        self.state.send_replace(OverlayState::route(start, end, path));
    }

    /// Resets every field. Clearing an empty overlay does not notify readers.
    pub fn clear(&self) {
        let changed = self.state.send_if_modified(|state| {
            if state.is_cleared() {
                false
            } else {
                *state = OverlayState::default();
                true
            }
        });
        if changed {
            log::debug!("[OVERLAY] Cleared route overlay");
        }
    }

    pub fn current(&self) -> OverlayState {
        self.state.borrow().clone()
    }

    /// Change feed for the rendering surface.
    pub fn subscribe(&self) -> watch::Receiver<OverlayState> {
        self.state.subscribe()
    }
}
