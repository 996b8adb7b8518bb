use crate::sdk::routing::coord::{Coordinate, LocationCandidate};
use crate::sdk::routing::error::SelectionError;

pub const YOUR_LOCATION_LABEL: &str = "Your Location";

/// The two picks a route is requested between.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteSelection {
    from: Option<LocationCandidate>,
    to: Option<LocationCandidate>,
}

impl RouteSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_from(&mut self, candidate: LocationCandidate) {
        self.from = Some(candidate);
    }

    pub fn set_to(&mut self, candidate: LocationCandidate) {
        self.to = Some(candidate);
    }

    pub fn from(&self) -> Option<&LocationCandidate> {
        self.from.as_ref()
    }

    pub fn to(&self) -> Option<&LocationCandidate> {
        self.to.as_ref()
    }

    /// Fills an empty origin with the device position. Never overrides a pick.
    pub fn prefill_from(&mut self, position: Coordinate) -> bool {
        if self.from.is_some() {
            return false;
        }
        self.from = Some(LocationCandidate::new(YOUR_LOCATION_LABEL, position));
        true
    }

    pub fn query(&self) -> Result<(Coordinate, Coordinate), SelectionError> {
        match (&self.from, &self.to) {
            (Some(from), Some(to)) => Ok((from.coordinate, to.coordinate)),
            _ => Err(SelectionError::Incomplete),
        }
    }
}
