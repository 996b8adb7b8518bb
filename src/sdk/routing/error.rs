use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordinateError {
    #[error("Latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("Longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("Coordinate components must be finite numbers")]
    NotFinite,

    #[error("Cannot parse coordinate from \"{0}\"")]
    Unparseable(String),
}

/// Reasons an encoded polyline cannot be turned into a route path.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("Polyline ends mid-sequence at byte {offset}")]
    Truncated { offset: usize },

    #[error("Invalid polyline character {byte:#04x} at byte {offset}")]
    InvalidCharacter { offset: usize, byte: u8 },

    #[error("Polyline value starting before byte {offset} is too large")]
    Overflow { offset: usize },

    #[error("Polyline decodes to an invalid coordinate: {0}")]
    InvalidCoordinate(#[from] CoordinateError),

    #[error("Polyline decodes to zero coordinates")]
    Empty,

    #[error("Polyline decodes to a single coordinate")]
    SinglePoint,

    #[error("Polyline could not be decoded: {0}")]
    Malformed(String),

    #[error("Routing response body is not valid: {0}")]
    Payload(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Polyline could not be encoded: {0}")]
pub struct EncodeError(pub String);

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HttpError {
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },
}

impl From<reqwest::Error> for HttpError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            HttpError::Timeout
        } else if let Some(status) = e.status() {
            HttpError::Status {
                status: status.as_u16(),
                url: e.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else {
            HttpError::Transport(e.to_string())
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeocodeError {
    #[error("Geocoding request failed: {0}")]
    Http(#[from] HttpError),

    #[error("Geocoding response is not a list of places: {0}")]
    Malformed(String),
}

/// The failure half of a route fetch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Routing request failed: {0}")]
    Network(#[from] HttpError),

    #[error("The routing service returned no routes")]
    NoRouteFound,

    #[error("Route geometry could not be decoded: {0}")]
    Decode(#[from] DecodeError),
}

impl FetchError {
    pub fn kind(&self) -> FailureKind {
        match self {
            FetchError::Network(_) => FailureKind::NetworkFailure,
            FetchError::NoRouteFound => FailureKind::NoRouteFound,
            FetchError::Decode(_) => FailureKind::DecodeFailure,
        }
    }
}

impl GeocodeError {
    pub fn kind(&self) -> FailureKind {
        FailureKind::GeocodeFailure
    }
}

/// User-facing classification of everything that can go wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    GeocodeFailure,
    NetworkFailure,
    NoRouteFound,
    DecodeFailure,
}

impl FailureKind {
    /// The single notice shown to the user for this kind of failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            FailureKind::GeocodeFailure => "Location search is unavailable right now. Try typing again.",
            FailureKind::NetworkFailure => "Could not reach the routing service. Please try again.",
            FailureKind::NoRouteFound => "No driving route was found between these locations.",
            FailureKind::DecodeFailure => "The route returned by the routing service could not be read.",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Please select both start and end locations.")]
    Incomplete,
}
