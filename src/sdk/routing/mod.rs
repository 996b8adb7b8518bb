pub mod coord;
pub mod error;
pub mod geocode;
pub mod polyline;
pub mod provider;
pub mod route;
pub mod service;

pub use coord::{Coordinate, LocationCandidate, RoutePath};
pub use error::{FailureKind, FetchError, GeocodeError};
pub use geocode::{Geocoder, SearchResults, SearchSession};
pub use provider::{RemoteProvider, ReqwestHttpClient};
pub use route::{FetchOutcome, RequestId, RouteQuery};
pub use service::{GeocodingProvider, RoutingProvider};
