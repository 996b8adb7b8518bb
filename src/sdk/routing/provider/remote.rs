use super::http::HttpClient;
use super::types::{PlaceRecord, RouteResponse};
use crate::sdk::config::ServiceConfig;
use crate::sdk::routing::coord::{Coordinate, LocationCandidate};
use crate::sdk::routing::error::{DecodeError, FetchError, GeocodeError, HttpError};
use crate::sdk::routing::polyline;
use crate::sdk::routing::route::FetchOutcome;
use crate::sdk::routing::service::{GeocodingProvider, RoutingProvider};
use crate::sdk::util::rate_limit::{limiter, Limiter};
use reqwest::Url;

/// Talks to a Nominatim-style search endpoint and an OSRM-style route endpoint.
pub struct RemoteProvider<C> {
    client: C,
    geocode_base_url: String,
    routing_base_url: String,
    profile: String,
    geocode_limiter: Limiter,
    route_limiter: Limiter,
}

impl<C: HttpClient> RemoteProvider<C> {
    pub fn new(client: C, config: &ServiceConfig) -> Self {
        Self {
            client,
            geocode_base_url: config.geocode_base_url.trim_end_matches('/').to_string(),
            routing_base_url: config.routing_base_url.trim_end_matches('/').to_string(),
            profile: config.routing_profile.clone(),
            geocode_limiter: limiter(config.geocode_rate_per_second),
            route_limiter: limiter(config.route_rate_per_second),
        }
    }

    fn search_url(&self, query: &str) -> Result<Url, HttpError> {
        Url::parse_with_params(
            &format!("{}/search", self.geocode_base_url),
            &[("format", "json"), ("q", query)],
        )
        .map_err(|e| HttpError::InvalidUrl(e.to_string()))
    }

    /// The routing service wants `lon,lat;lon,lat`.
    fn route_url(&self, from: Coordinate, to: Coordinate) -> Result<Url, HttpError> {
        Url::parse_with_params(
            &format!(
                "{}/route/v1/{}/{},{};{},{}",
                self.routing_base_url,
                self.profile,
                from.lon(),
                from.lat(),
                to.lon(),
                to.lat()
            ),
            &[("overview", "full")],
        )
        .map_err(|e| HttpError::InvalidUrl(e.to_string()))
    }
}

impl<C: HttpClient> GeocodingProvider for RemoteProvider<C> {
    async fn search_places(&self, query: &str) -> Result<Vec<LocationCandidate>, GeocodeError> {
        let url = self.search_url(query)?;
        self.geocode_limiter.until_ready().await;
        log::debug!("[PROVIDER] Calling remote search for \"{}\"", query);

        let body = self.client.get(url.as_str()).await?;
        parse_places(&body)
    }
}

impl<C: HttpClient> RoutingProvider for RemoteProvider<C> {
    async fn fetch_route(&self, from: Coordinate, to: Coordinate) -> FetchOutcome {
        let url = self.route_url(from, to)?;
        self.route_limiter.until_ready().await;
        log::debug!("[PROVIDER] Calling remote route for {} -> {}", from, to);

        let body = self.client.get(url.as_str()).await?;
        parse_route(&body)
    }
}

/// Turns a search response into candidates, skipping records that lack a
/// name or carry unusable coordinates.
pub fn parse_places(body: &[u8]) -> Result<Vec<LocationCandidate>, GeocodeError> {
    let records: Vec<serde_json::Value> = serde_json::from_slice(body).map_err(|e| {
        log::error!(
            "Failed to parse search response: {}. Body: {}",
            e,
            String::from_utf8_lossy(body)
        );
        GeocodeError::Malformed(e.to_string())
    })?;

    let total = records.len();
    let candidates: Vec<LocationCandidate> = records
        .into_iter()
        .filter_map(|value| serde_json::from_value::<PlaceRecord>(value).ok())
        .filter_map(candidate_from_record)
        .collect();

    if candidates.len() < total {
        log::debug!(
            "[PROVIDER] Skipped {} malformed search records",
            total - candidates.len()
        );
    }
    Ok(candidates)
}

fn candidate_from_record(record: PlaceRecord) -> Option<LocationCandidate> {
    let label = record.display_name?;
    let lat = record.lat?.trim().parse().ok()?;
    let lon = record.lon?.trim().parse().ok()?;
    let coordinate = Coordinate::new(lat, lon).ok()?;
    Some(LocationCandidate { label, coordinate })
}

/// Decodes the first route's geometry from a route response.
pub fn parse_route(body: &[u8]) -> FetchOutcome {
    let response: RouteResponse = serde_json::from_slice(body).map_err(|e| {
        log::error!(
            "Failed to parse route response: {}. Body: {}",
            e,
            String::from_utf8_lossy(body)
        );
        DecodeError::Payload(e.to_string())
    })?;

    let route = response.routes.first().ok_or(FetchError::NoRouteFound)?;
    Ok(polyline::decode(&route.geometry)?)
}
