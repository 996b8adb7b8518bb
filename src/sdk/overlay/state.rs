use crate::sdk::routing::coord::{Coordinate, RoutePath};
use serde::Serialize;

/// Opaque handle the rendering surface maps to its own marker primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Start,
    End,
    UserLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Marker {
    pub position: Coordinate,
    pub visible: bool,
}

impl Marker {
    pub fn shown_at(position: Coordinate) -> Self {
        Self {
            position,
            visible: true,
        }
    }
}

/// Everything drawn for the current route. Replaced or reset as a whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverlayState {
    pub start_marker: Option<Marker>,
    pub end_marker: Option<Marker>,
    pub path: Option<RoutePath>,
}

impl OverlayState {
    pub fn route(start: Coordinate, end: Coordinate, path: RoutePath) -> Self {
        Self {
            start_marker: Some(Marker::shown_at(start)),
            end_marker: Some(Marker::shown_at(end)),
            path: Some(path),
        }
    }

    pub fn is_cleared(&self) -> bool {
        self.start_marker.is_none() && self.end_marker.is_none() && self.path.is_none()
    }

    pub fn marker(&self, kind: MarkerKind) -> Option<&Marker> {
        match kind {
            MarkerKind::Start => self.start_marker.as_ref(),
            MarkerKind::End => self.end_marker.as_ref(),
            MarkerKind::UserLocation => None,
        }
    }
}
