use serde::Deserialize;

// --- Wire formats of the geocoding and routing services ---

/// One search hit. Fields are optional so a broken record can be skipped on its own.
#[derive(Deserialize, Debug)]
pub struct PlaceRecord {
    pub display_name: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct RouteResponse {
    #[serde(default)]
    pub routes: Vec<RouteRecord>,
}

#[derive(Deserialize, Debug)]
pub struct RouteRecord {
    pub geometry: String,
}
