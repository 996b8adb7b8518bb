use anyhow::{anyhow, Context};
use std::env::{self, VarError};
use std::num::NonZeroU32;
use std::str::FromStr;
use std::time::Duration;

/// Endpoints and pacing for the geocoding and routing services.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub geocode_base_url: String,
    pub routing_base_url: String,
    pub routing_profile: String,
    pub user_agent: String,
    pub request_timeout: Duration,
    /// Quiescence window for search-as-you-type.
    pub debounce: Duration,
    pub geocode_rate_per_second: NonZeroU32,
    pub route_rate_per_second: NonZeroU32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            geocode_base_url: "https://nominatim.openstreetmap.org".to_string(),
            routing_base_url: "https://router.project-osrm.org".to_string(),
            routing_profile: "driving".to_string(),
            user_agent: concat!("routeview/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout: Duration::from_secs(15),
            debounce: Duration::from_millis(300),
            geocode_rate_per_second: NonZeroU32::MIN,
            route_rate_per_second: NonZeroU32::new(5).unwrap_or(NonZeroU32::MIN),
        }
    }
}

impl ServiceConfig {
    /// Reads `ROUTEVIEW_*` variables, keeping the default for any that are unset.
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            geocode_base_url: var("ROUTEVIEW_GEOCODE_URL")?.unwrap_or(defaults.geocode_base_url),
            routing_base_url: var("ROUTEVIEW_ROUTING_URL")?.unwrap_or(defaults.routing_base_url),
            routing_profile: var("ROUTEVIEW_ROUTING_PROFILE")?
                .unwrap_or(defaults.routing_profile),
            user_agent: var("ROUTEVIEW_USER_AGENT")?.unwrap_or(defaults.user_agent),
            request_timeout: parsed::<u64>("ROUTEVIEW_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            debounce: parsed::<u64>("ROUTEVIEW_DEBOUNCE_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.debounce),
            geocode_rate_per_second: parsed("ROUTEVIEW_GEOCODE_RPS")?
                .unwrap_or(defaults.geocode_rate_per_second),
            route_rate_per_second: parsed("ROUTEVIEW_ROUTE_RPS")?
                .unwrap_or(defaults.route_rate_per_second),
        })
    }

    pub fn log(&self) {
        log::info!(
            "Geocoding via {}, routing via {} ({})",
            self.geocode_base_url,
            self.routing_base_url,
            self.routing_profile
        );
        log::debug!(
            "timeout={:?} debounce={:?} geocode_rps={} route_rps={}",
            self.request_timeout,
            self.debounce,
            self.geocode_rate_per_second,
            self.route_rate_per_second
        );
    }
}

fn var(name: &str) -> anyhow::Result<Option<String>> {
    match env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(anyhow!("{name} value is not valid unicode")),
    }
}

fn parsed<T>(name: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    var(name)?
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("{name} has invalid value \"{raw}\""))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_public_services() {
        let config = ServiceConfig::default();
        assert_eq!(config.debounce, Duration::from_millis(300));
        assert_eq!(config.routing_profile, "driving");
        assert_eq!(config.geocode_rate_per_second.get(), 1);
        assert!(config.user_agent.starts_with("routeview/"));
    }

    #[test]
    fn invalid_numbers_are_reported_with_the_variable_name() {
        env::set_var("ROUTEVIEW_TEST_ONLY_RPS", "zero");
        let err = parsed::<NonZeroU32>("ROUTEVIEW_TEST_ONLY_RPS").unwrap_err();
        assert!(err.to_string().contains("ROUTEVIEW_TEST_ONLY_RPS"));
        env::remove_var("ROUTEVIEW_TEST_ONLY_RPS");

        assert_eq!(parsed::<u64>("ROUTEVIEW_TEST_ONLY_UNSET").unwrap(), None);
    }
}
