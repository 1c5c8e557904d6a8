use crate::core::predicate::Predicate;
use crate::core::schema::SchoolSchema;
use crate::models::BoundingBox;

/// Earth's radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometers per degree of latitude (and of longitude at the equator)
pub const KM_PER_DEGREE: f64 = 111.0;

/// Floor applied to cos(latitude) so longitude deltas stay finite near the poles
pub const MIN_COS_LAT: f64 = 0.01;

/// Name of the SQL function registered by the bundled migrations
pub const HAVERSINE_FUNCTION: &str = "haversine_km";

/// Tuning for the two-phase distance filter
#[derive(Debug, Clone, PartialEq)]
pub struct GeoConfig {
    pub km_per_degree: f64,
    pub cos_floor: f64,
    /// Registered great-circle function, or `None` when the query engine
    /// has no such capability and only the bounding box can be applied
    pub haversine_function: Option<String>,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            km_per_degree: KM_PER_DEGREE,
            cos_floor: MIN_COS_LAT,
            haversine_function: Some(HAVERSINE_FUNCTION.to_string()),
        }
    }
}

impl GeoConfig {
    /// Same tuning, bounding box only
    pub fn without_haversine(self) -> Self {
        Self {
            haversine_function: None,
            ..self
        }
    }
}

/// Great-circle distance between two points in kilometers
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lng1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lng2` - Longitude of second point in degrees
#[inline]
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);

    // Rounding can push `a` a hair above 1 for antipodal points
    2.0 * EARTH_RADIUS_KM * a.min(1.0).sqrt().asin()
}

/// Calculate a bounding box around a center point
///
/// The box is a superset of the circle of radius `radius_km`:
/// 1° latitude ≈ 111km, 1° longitude ≈ 111km * cos(latitude),
/// with cos(latitude) floored at `config.cos_floor`.
pub fn bounding_box(lat: f64, lng: f64, radius_km: f64, config: &GeoConfig) -> BoundingBox {
    let lat_delta = radius_km / config.km_per_degree;
    let cos_lat = lat.to_radians().cos().max(config.cos_floor);
    let lng_delta = radius_km / (config.km_per_degree * cos_lat);

    BoundingBox {
        min_lat: lat - lat_delta,
        max_lat: lat + lat_delta,
        min_lng: lng - lng_delta,
        max_lng: lng + lng_delta,
    }
}

/// Check if a point is within a bounding box (edges inclusive)
#[inline]
pub fn is_within_bounding_box(lat: f64, lng: f64, bbox: &BoundingBox) -> bool {
    lat >= bbox.min_lat && lat <= bbox.max_lat && lng >= bbox.min_lng && lng <= bbox.max_lng
}

/// Predicates restricting schools to `max_distance_km` of a reference point.
///
/// Emits the four bounding-box range predicates first, then the exact
/// great-circle predicate when `config` names a registered function.
pub fn distance_clauses<S>(
    max_distance_km: f64,
    ref_lat: f64,
    ref_lng: f64,
    schools: &S,
    config: &GeoConfig,
) -> Vec<Predicate>
where
    S: SchoolSchema + ?Sized,
{
    let bbox = bounding_box(ref_lat, ref_lng, max_distance_km, config);

    let mut clauses = vec![
        Predicate::ge(schools.lat(), bbox.min_lat),
        Predicate::le(schools.lat(), bbox.max_lat),
        Predicate::ge(schools.lng(), bbox.min_lng),
        Predicate::le(schools.lng(), bbox.max_lng),
    ];

    match &config.haversine_function {
        Some(function) => clauses.push(Predicate::WithinDistance {
            function: function.clone(),
            lat: schools.lat(),
            lng: schools.lng(),
            ref_lat,
            ref_lng,
            max_km: max_distance_km,
        }),
        None => tracing::debug!(
            "No haversine function registered, distance filter of {}km is bounding box only",
            max_distance_km
        ),
    }

    clauses
}
