pub mod config;
pub mod controller;
pub mod device;
pub mod overlay;
pub mod routing;
pub mod selection;
pub mod util;
