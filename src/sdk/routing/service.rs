use super::coord::{Coordinate, LocationCandidate};
use super::error::GeocodeError;
use super::route::FetchOutcome;
use std::future::Future;

pub trait GeocodingProvider: Send + Sync {
    /// Searches places matching a non-empty, trimmed query.
    fn search_places(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<LocationCandidate>, GeocodeError>> + Send;
}

pub trait RoutingProvider: Send + Sync {
    /// Fetches one driving route. A single attempt; never retries.
    fn fetch_route(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> impl Future<Output = FetchOutcome> + Send;
}
