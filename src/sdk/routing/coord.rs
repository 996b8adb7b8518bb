use super::error::{CoordinateError, DecodeError};
use serde::Serialize;
use std::{fmt, str::FromStr};

/// A geodetic position. Latitude comes first everywhere inside the crate;
/// providers translate to their own axis order at the wire boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(CoordinateError::NotFinite);
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(CoordinateError::LongitudeOutOfRange(lon));
        }
        Ok(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

/// Parses the `"lat,lon"` text form used as a candidate's value.
impl FromStr for Coordinate {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| CoordinateError::Unparseable(s.to_string()))?;
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| CoordinateError::Unparseable(s.to_string()))?;
        let lon: f64 = lon
            .trim()
            .parse()
            .map_err(|_| CoordinateError::Unparseable(s.to_string()))?;
        Coordinate::new(lat, lon)
    }
}

/// A selectable search result: what the user sees and where it points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationCandidate {
    pub label: String,
    pub coordinate: Coordinate,
}

impl LocationCandidate {
    pub fn new(label: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            label: label.into(),
            coordinate,
        }
    }
}

/// The decoded driving path in traversal order. Always holds at least two points.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RoutePath(Vec<Coordinate>);

impl RoutePath {
    pub fn new(points: Vec<Coordinate>) -> Result<Self, DecodeError> {
        match points.len() {
            0 => Err(DecodeError::Empty),
            1 => Err(DecodeError::SinglePoint),
            _ => Ok(Self(points)),
        }
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.0
    }

    pub fn start(&self) -> Coordinate {
        self.0[0]
    }

    pub fn end(&self) -> Coordinate {
        self.0[self.0.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_latitude() {
        assert_eq!(
            Coordinate::new(91.0, 0.0),
            Err(CoordinateError::LatitudeOutOfRange(91.0))
        );
        assert_eq!(
            Coordinate::new(0.0, -180.5),
            Err(CoordinateError::LongitudeOutOfRange(-180.5))
        );
        assert_eq!(Coordinate::new(f64::NAN, 0.0), Err(CoordinateError::NotFinite));
    }

    #[test]
    fn accepts_the_poles_and_antimeridian() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn parses_candidate_value_text() {
        let coord: Coordinate = "-6.2, 106.8".parse().unwrap();
        assert_eq!(coord.lat(), -6.2);
        assert_eq!(coord.lon(), 106.8);

        assert!("-6.2".parse::<Coordinate>().is_err());
        assert!("abc,1".parse::<Coordinate>().is_err());
        assert!("100,1".parse::<Coordinate>().is_err());
    }

    #[test]
    fn route_path_needs_two_points() {
        let a = Coordinate::new(1.0, 2.0).unwrap();
        assert_eq!(RoutePath::new(vec![]), Err(DecodeError::Empty));
        assert_eq!(RoutePath::new(vec![a]), Err(DecodeError::SinglePoint));

        let b = Coordinate::new(3.0, 4.0).unwrap();
        let path = RoutePath::new(vec![a, b]).unwrap();
        assert_eq!(path.start(), a);
        assert_eq!(path.end(), b);
        assert_eq!(path.len(), 2);
    }
}
