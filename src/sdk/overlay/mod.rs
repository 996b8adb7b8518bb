pub mod manager;
pub mod state;
pub mod surface;

pub use manager::OverlayManager;
pub use state::{Marker, MarkerKind, OverlayState};
pub use surface::{RenderSurface, SurfaceBridge};
