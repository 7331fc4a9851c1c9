//! Search parameters and the query string they turn into.
//!
//! Parameters arrive as the node's configuration object (see
//! [`crate::description`] for the wire names). Each item gets its own
//! [`SearchQuery`], built from scratch.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use nodes::NodeError;

/// Kilometres per degree of latitude, the flat-Earth constant WiGLE users
/// are used to.
pub const KM_PER_DEGREE: f64 = 111.0;

pub const DEFAULT_RESULTS_PER_PAGE: u32 = 25;

pub const DEFAULT_RESULTS_FIELD: &str = "wigle";

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    #[default]
    SearchNetwork,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    pub results_per_page: Option<f64>,
    pub results_field: Option<String>,
}

/// Typed view of the node's configuration object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchParameters {
    pub operation: Operation,
    #[serde(rename = "query_ssid")]
    pub ssid: String,
    #[serde(rename = "query_bssid")]
    pub bssid: String,

    pub filter_geo: bool,
    #[serde(rename = "query_lat")]
    pub latitude: f64,
    #[serde(rename = "query_lon")]
    pub longitude: f64,
    #[serde(rename = "query_radius")]
    pub radius_km: f64,

    pub filter_location: bool,
    #[serde(rename = "query_road")]
    pub road: String,
    #[serde(rename = "query_city")]
    pub city: String,
    #[serde(rename = "query_region")]
    pub region: String,
    #[serde(rename = "query_postalcode")]
    pub postal_code: String,
    #[serde(rename = "query_country")]
    pub country: String,

    pub options: SearchOptions,
}

impl Default for SearchParameters {
    /// No filters at all, a 0.1 km radius ready for when the geo filter is
    /// switched on.
    fn default() -> Self {
        Self {
            operation: Operation::SearchNetwork,
            ssid: String::new(),
            bssid: String::new(),
            filter_geo: false,
            latitude: 0.0,
            longitude: 0.0,
            radius_km: 0.1,
            filter_location: false,
            road: String::new(),
            city: String::new(),
            region: String::new(),
            postal_code: String::new(),
            country: String::new(),
            options: SearchOptions::default(),
        }
    }
}

impl SearchParameters {
    /// Parse resolved node parameters. Unknown operations are rejected here.
    pub fn from_value(parameters: &Value) -> Result<Self, NodeError> {
        Self::deserialize(parameters).map_err(|e| NodeError::InvalidParameters(e.to_string()))
    }

    /// Configured page size; unset, zero or negative fall back to 25.
    pub fn results_per_page(&self) -> u32 {
        match self.options.results_per_page {
            Some(n) if n.is_finite() && n >= 1.0 => n.min(f64::from(u32::MAX)) as u32,
            _ => DEFAULT_RESULTS_PER_PAGE,
        }
    }

    /// Output field for the results; unset or empty falls back to `wigle`.
    pub fn results_field(&self) -> &str {
        match self.options.results_field.as_deref() {
            Some(field) if !field.is_empty() => field,
            _ => DEFAULT_RESULTS_FIELD,
        }
    }

    /// Build the query string for one search.
    ///
    /// Geo and location fields are only consulted when their filter flag is
    /// set; both filters may contribute at once.
    pub fn build_query(&self) -> SearchQuery {
        let mut query = SearchQuery::default();

        if !self.ssid.is_empty() {
            query.insert("ssidlike", QueryValue::Text(self.ssid.clone()));
        }
        if !self.bssid.is_empty() {
            query.insert("netid", QueryValue::Text(self.bssid.clone()));
        }

        if self.filter_geo {
            let bbox = BoundingBox::around(self.latitude, self.longitude, self.radius_km);
            query.insert("latrange1", QueryValue::Float(bbox.lat_min));
            query.insert("latrange2", QueryValue::Float(bbox.lat_max));
            query.insert("longrange1", QueryValue::Float(bbox.lon_min));
            query.insert("longrange2", QueryValue::Float(bbox.lon_max));
        }

        if self.filter_location {
            let fields = [
                ("road", &self.road),
                ("city", &self.city),
                ("region", &self.region),
                ("postalCode", &self.postal_code),
                ("country", &self.country),
            ];
            for (key, value) in fields {
                let value = value.trim();
                if !value.is_empty() {
                    query.insert(key, QueryValue::Text(value.to_owned()));
                }
            }
        }

        query.insert("resultsPerPage", QueryValue::Integer(self.results_per_page()));
        query
    }
}

// ---------------------------------------------------------------------------
// Bounding box
// ---------------------------------------------------------------------------

/// Rectangle approximating a circle of `radius_km` around a point.
///
/// Not clamped: near the poles the longitude span blows up, and at exactly
/// ±90° it is infinite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl BoundingBox {
    pub fn around(latitude: f64, longitude: f64, radius_km: f64) -> Self {
        let d_lat = radius_km / KM_PER_DEGREE;
        let d_lon = radius_km / (KM_PER_DEGREE * latitude.to_radians().cos());
        Self {
            lat_min: latitude - d_lat,
            lat_max: latitude + d_lat,
            lon_min: longitude - d_lon,
            lon_max: longitude + d_lon,
        }
    }
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryValue {
    Text(String),
    Float(f64),
    Integer(u32),
}

impl QueryValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Integer(i) => Some(f64::from(*i)),
            Self::Text(_) => None,
        }
    }
}

/// Query-string parameters for `network/search`, keyed by WiGLE's names.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SearchQuery(BTreeMap<&'static str, QueryValue>);

impl SearchQuery {
    fn insert(&mut self, key: &'static str, value: QueryValue) {
        self.0.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
