use super::coord::{Coordinate, RoutePath};
use super::error::FetchError;
use std::fmt;

/// Result of a single route fetch.
pub type FetchOutcome = Result<RoutePath, FetchError>;

/// Identity of a submitted query. Later submissions get larger ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestId(u64);

impl RequestId {
    pub fn next(self) -> Self {
        RequestId(self.0 + 1)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteQuery {
    pub from: Coordinate,
    pub to: Coordinate,
    pub request_id: RequestId,
}
