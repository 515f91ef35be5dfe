use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const EARTH_RADIUS_NM: f64 = 3440.065;
pub const FT_PER_NM: f64 = 6076.115;
pub const FT_PER_DEG_LAT: f64 = 60.0 * FT_PER_NM; // one arc-minute is one nm
pub const STANDARD_RATE_DEG_S: f64 = 3.0;
pub const MAX_BANK_DEG: f64 = 25.0;

const KT_TO_MS: f64 = 0.514_444;
const G0: f64 = 9.80665; // m/s^2
const SLERP_EPSILON: f64 = 1e-9; // rad

// ---------------------------------------------------------------------------
// Geographic point
// ---------------------------------------------------------------------------

/// A latitude/longitude pair in decimal degrees (WGS-84 sphere approximation).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64, // deg, +N
    pub lon: f64, // deg, +E
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

// ---------------------------------------------------------------------------
// Great-circle primitives
// ---------------------------------------------------------------------------

/// Haversine distance in nautical miles.
pub fn great_circle_distance_nm(a: GeoPoint, b: GeoPoint) -> f64 {
    EARTH_RADIUS_NM * central_angle(a, b)
}

/// Haversine distance in feet.
pub fn great_circle_distance_ft(a: GeoPoint, b: GeoPoint) -> f64 {
    great_circle_distance_nm(a, b) * FT_PER_NM
}

fn central_angle(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * h.sqrt().min(1.0).asin()
}

/// Initial true bearing from `a` to `b`, in [0, 360).
pub fn heading(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    normalize_heading(y.atan2(x).to_degrees())
}

/// Spherical interpolation between `a` and `b` at `fraction` (clamped to [0, 1]).
///
/// Falls back to linear blending when the two points are practically
/// coincident, where the slerp weights divide by a vanishing sine.
pub fn interpolate_great_circle(a: GeoPoint, b: GeoPoint, fraction: f64) -> GeoPoint {
    let f = fraction.clamp(0.0, 1.0);
    let delta = central_angle(a, b);

    if delta < SLERP_EPSILON {
        return GeoPoint {
            lat: a.lat + (b.lat - a.lat) * f,
            lon: a.lon + (b.lon - a.lon) * f,
        };
    }

    let wa = ((1.0 - f) * delta).sin() / delta.sin();
    let wb = (f * delta).sin() / delta.sin();

    let (lat1, lon1) = (a.lat.to_radians(), a.lon.to_radians());
    let (lat2, lon2) = (b.lat.to_radians(), b.lon.to_radians());

    let x = wa * lat1.cos() * lon1.cos() + wb * lat2.cos() * lon2.cos();
    let y = wa * lat1.cos() * lon1.sin() + wb * lat2.cos() * lon2.sin();
    let z = wa * lat1.sin() + wb * lat2.sin();

    GeoPoint {
        lat: z.atan2((x * x + y * y).sqrt()).to_degrees(),
        lon: y.atan2(x).to_degrees(),
    }
}

/// Point reached from `start` after `distance_nm` along the initial bearing.
pub fn destination_point(start: GeoPoint, bearing_deg: f64, distance_nm: f64) -> GeoPoint {
    let delta = distance_nm / EARTH_RADIUS_NM;
    let theta = bearing_deg.to_radians();
    let lat1 = start.lat.to_radians();
    let lon1 = start.lon.to_radians();

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos()).asin();
    let lon2 = lon1
        + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    GeoPoint {
        lat: lat2.to_degrees(),
        lon: (lon2.to_degrees() + 540.0) % 360.0 - 180.0,
    }
}

// ---------------------------------------------------------------------------
// Runway-local flat frame
// ---------------------------------------------------------------------------

/// East/north direction cosines of the centreline from `threshold` toward
/// `opposite`, in a flat frame tangent at `threshold`.
pub fn runway_unit_vector(threshold: GeoPoint, opposite: GeoPoint) -> Vector2<f64> {
    let east = (opposite.lon - threshold.lon) * FT_PER_DEG_LAT * threshold.lat.to_radians().cos();
    let north = (opposite.lat - threshold.lat) * FT_PER_DEG_LAT;
    let v = Vector2::new(east, north);
    let len = v.norm();
    if len > 0.0 {
        v / len
    } else {
        Vector2::new(0.0, 1.0)
    }
}

/// Maps a scalar distance along the centreline (ft) back to lat/lon.
///
/// Negative distances address the extended centreline before the threshold.
pub fn position_on_runway(threshold: GeoPoint, unit: &Vector2<f64>, distance_ft: f64) -> GeoPoint {
    let offset = unit * distance_ft; // ft [east, north]
    let cos_lat = threshold.lat.to_radians().cos().max(1e-6);
    GeoPoint {
        lat: threshold.lat + offset.y / FT_PER_DEG_LAT,
        lon: threshold.lon + offset.x / (FT_PER_DEG_LAT * cos_lat),
    }
}

/// Signed distance (ft) of `p` along the centreline from `threshold`.
/// Negative on the approach side of the threshold.
pub fn along_runway_ft(threshold: GeoPoint, unit: &Vector2<f64>, p: GeoPoint) -> f64 {
    let cos_lat = threshold.lat.to_radians().cos().max(1e-6);
    let offset = Vector2::new(
        (p.lon - threshold.lon) * FT_PER_DEG_LAT * cos_lat,
        (p.lat - threshold.lat) * FT_PER_DEG_LAT,
    );
    unit.dot(&offset)
}

// ---------------------------------------------------------------------------
// Heading helpers
// ---------------------------------------------------------------------------

/// Wraps any angle into [0, 360).
pub fn normalize_heading(deg: f64) -> f64 {
    let h = deg.rem_euclid(360.0);
    if h >= 360.0 {
        0.0
    } else {
        h
    }
}

/// Signed smallest rotation from `from` to `to`, in (-180, 180].
pub fn heading_difference(from: f64, to: f64) -> f64 {
    let d = (to - from).rem_euclid(360.0);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

/// Slews `current` toward `target` at no more than `rate_deg_s`; never overshoots.
pub fn turn_toward(current: f64, target: f64, rate_deg_s: f64, dt: f64) -> f64 {
    let diff = heading_difference(current, target);
    let max_step = (rate_deg_s * dt).abs();
    if diff.abs() <= max_step {
        normalize_heading(target)
    } else {
        normalize_heading(current + max_step * diff.signum())
    }
}

/// Bank angle (deg) giving a standard-rate turn at `speed_kts`, capped at 25°.
///
/// Only drives the attitude shown to the renderer; turn rate itself is fixed.
pub fn standard_rate_bank_angle(speed_kts: f64) -> f64 {
    let v = speed_kts.max(0.0) * KT_TO_MS;
    let omega = STANDARD_RATE_DEG_S.to_radians();
    (v * omega / G0).atan().to_degrees().min(MAX_BANK_DEG)
}
