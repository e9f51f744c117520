use serde::Serialize;

/// One place matched by a geocoding search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodingResult {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
    pub feature_code: String,
    pub country_code: String,
    pub country_id: i64,
    pub country: String,
    pub timezone: String,
    pub admin1: Option<String>,
    pub admin1_id: Option<i64>,
    pub admin2: Option<String>,
    pub admin2_id: Option<i64>,
    pub admin3: Option<String>,
    pub admin3_id: Option<i64>,
    pub admin4: Option<String>,
    pub admin4_id: Option<i64>,
    pub population: Option<i64>,
    pub postcodes: Vec<String>,
    pub ranking: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Geocoding {
    pub generation_time_ms: f64,
    /// Empty when nothing matched.
    pub results: Vec<GeocodingResult>,
}
