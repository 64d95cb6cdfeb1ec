use crate::model::{
    attendance::{GeoReading, GeofenceVerdict},
    company_location::CompanyLocation,
};

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Used when no company location is configured so the kiosk never fails closed.
pub const DEFAULT_LOCATION_NAME: &str = "Head Office";
pub const DEFAULT_LOCATION_LATITUDE: f64 = 25.033_976;
pub const DEFAULT_LOCATION_LONGITUDE: f64 = 121.564_472;
pub const DEFAULT_LOCATION_RADIUS_METERS: f64 = 100.0;

pub fn default_location() -> CompanyLocation {
    CompanyLocation {
        id: 0,
        name: DEFAULT_LOCATION_NAME.to_string(),
        latitude: DEFAULT_LOCATION_LATITUDE,
        longitude: DEFAULT_LOCATION_LONGITUDE,
        radius_meters: DEFAULT_LOCATION_RADIUS_METERS,
        is_active: true,
    }
}

/// Haversine great-circle distance, rounded to the nearest meter.
pub fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // near-antipodal points can round a past 1.0
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    (EARTH_RADIUS_METERS * c).round()
}

fn distance_to(point: &GeoReading, location: &CompanyLocation) -> f64 {
    distance_meters(
        point.latitude,
        point.longitude,
        location.latitude,
        location.longitude,
    )
}

/// Linear scan for the closest location; ties keep the first one seen.
pub fn nearest_location<'a>(
    point: &GeoReading,
    locations: &'a [CompanyLocation],
) -> Option<(&'a CompanyLocation, f64)> {
    let mut best: Option<(&CompanyLocation, f64)> = None;
    for location in locations {
        let distance = distance_to(point, location);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((location, distance)),
        }
    }
    best
}

pub fn is_within_range(point: &GeoReading, location: &CompanyLocation) -> bool {
    distance_to(point, location) <= location.radius_meters
}

/// Checks a reading against the nearest active location, falling back to
/// the built-in default when none is configured.
pub fn is_within_any_location(point: &GeoReading, locations: &[CompanyLocation]) -> GeofenceVerdict {
    let fallback = default_location();
    let (location, distance) = nearest_location(point, locations)
        .unwrap_or_else(|| (&fallback, distance_to(point, &fallback)));

    GeofenceVerdict {
        location_name: location.name.clone(),
        distance_meters: distance,
        in_range: is_within_range(point, location),
    }
}
