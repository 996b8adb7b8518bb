pub mod sdk;

pub use sdk::config::ServiceConfig;
pub use sdk::controller::{RouteEvent, RouteSearchController, Settlement};
pub use sdk::device::{DeviceEvent, DeviceTracker, UserLocation};
pub use sdk::overlay::{OverlayManager, OverlayState, RenderSurface, SurfaceBridge};
pub use sdk::routing::{Coordinate, Geocoder, LocationCandidate, RemoteProvider, RoutePath};
pub use sdk::selection::RouteSelection;
