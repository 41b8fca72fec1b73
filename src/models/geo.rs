//! Geolocation result for one postcode.

/// Coordinates for a postcode. NaN means the lookup did not resolve it.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoResult {
    pub postcode: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoResult {
    pub fn unresolved(postcode: &str) -> Self {
        GeoResult {
            postcode: postcode.to_string(),
            latitude: f64::NAN,
            longitude: f64::NAN,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !self.latitude.is_nan()
    }
}
