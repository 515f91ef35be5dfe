use crate::geo::{self, GeoPoint, FT_PER_NM};

// ---------------------------------------------------------------------------
// Unit conversions
// ---------------------------------------------------------------------------

pub const FT_S_PER_KT: f64 = FT_PER_NM / 3600.0;
pub const FPM_PER_KT: f64 = FT_PER_NM / 60.0;
pub const GLIDESLOPE_DEG: f64 = 3.0;

/// Nose-up body angle added to the flight-path angle for display.
const BODY_ANGLE_DEG: f64 = 2.5;

// ---------------------------------------------------------------------------
// Scalar kinematics shared by the phase modules
// ---------------------------------------------------------------------------

/// Distance (ft) covered while speed changes linearly from `v0` to `v1` (kt).
pub fn trapezoid_distance_ft(v0_kts: f64, v1_kts: f64, dt: f64) -> f64 {
    0.5 * (v0_kts + v1_kts) * FT_S_PER_KT * dt
}

/// Moves `current` toward `target` at `accel` when below it and `decel` when above.
pub fn approach_speed(current: f64, target: f64, accel: f64, decel: f64, dt: f64) -> f64 {
    if current < target {
        (current + accel * dt).min(target)
    } else {
        (current - decel * dt).max(target)
    }
}

/// Moves `current` toward `target` by at most `rate * dt`.
pub fn approach_value(current: f64, target: f64, rate: f64, dt: f64) -> f64 {
    approach_speed(current, target, rate, rate, dt)
}

/// Displayed pitch for a given vertical and ground speed.
pub fn flight_path_pitch(vs_fpm: f64, gs_kts: f64) -> f64 {
    let horizontal_fpm = (gs_kts * FPM_PER_KT).max(1.0);
    vs_fpm.atan2(horizontal_fpm).to_degrees() + BODY_ANGLE_DEG
}

/// Vertical speed holding a 3° path at `gs_kts` (negative, fpm).
pub fn glideslope_vs_fpm(gs_kts: f64) -> f64 {
    -gs_kts * FPM_PER_KT * GLIDESLOPE_DEG.to_radians().tan()
}

/// Altitude of the 3° path `distance_ft` from the threshold.
pub fn glideslope_altitude_ft(distance_ft: f64, field_elevation_ft: f64) -> f64 {
    distance_ft * GLIDESLOPE_DEG.to_radians().tan() + field_elevation_ft
}

/// Great-circle step of at most `step_nm` toward `target`.
///
/// Returns the new position and the distance actually covered; lands exactly
/// on `target` when the step would overshoot it.
pub fn move_toward(position: GeoPoint, target: GeoPoint, step_nm: f64) -> (GeoPoint, f64) {
    let remaining = geo::great_circle_distance_nm(position, target);
    if step_nm >= remaining {
        (target, remaining)
    } else {
        (
            geo::interpolate_great_circle(position, target, step_nm / remaining),
            step_nm,
        )
    }
}

/// Bank shown while the heading is still slewing toward `target_heading`.
pub fn turn_bank(heading_deg: f64, target_heading: f64, gs_kts: f64) -> f64 {
    let diff = geo::heading_difference(heading_deg, target_heading);
    if diff.abs() < 0.5 {
        0.0
    } else {
        geo::standard_rate_bank_angle(gs_kts) * diff.signum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn trapezoid_beats_euler_at_large_steps() {
        // 0 -> 10 kt over 10 s at constant acceleration: exact distance is the average
        let d = trapezoid_distance_ft(0.0, 10.0, 10.0);
        assert_relative_eq!(d, 5.0 * FT_S_PER_KT * 10.0, epsilon = 1e-12);
    }

    #[test]
    fn speed_approach_never_overshoots() {
        assert_eq!(approach_speed(100.0, 101.0, 3.0, 1.0, 1.0), 101.0);
        assert_eq!(approach_speed(100.0, 90.0, 3.0, 1.0, 1.0), 99.0);
        assert_eq!(approach_speed(100.0, 100.0, 3.0, 1.0, 1.0), 100.0);
    }

    #[test]
    fn glideslope_numbers() {
        // ~318 ft per nm
        let per_nm = glideslope_altitude_ft(FT_PER_NM, 0.0);
        assert!((per_nm - 318.4).abs() < 0.5, "got {}", per_nm);
        // ~5 x groundspeed rule of thumb
        let vs = glideslope_vs_fpm(140.0);
        assert!((vs + 743.0).abs() < 5.0, "got {}", vs);
    }

    #[test]
    fn move_toward_clamps_to_target() {
        let a = GeoPoint::new(40.0, -100.0);
        let b = geo::destination_point(a, 90.0, 2.0);
        let (p, moved) = move_toward(a, b, 5.0);
        assert_eq!(p, b);
        assert_relative_eq!(moved, 2.0, epsilon = 1e-9);

        let (p, moved) = move_toward(a, b, 0.5);
        assert_eq!(moved, 0.5);
        assert_relative_eq!(geo::great_circle_distance_nm(p, b), 1.5, epsilon = 1e-9);
    }

    #[test]
    fn level_flight_shows_body_angle() {
        assert_relative_eq!(flight_path_pitch(0.0, 450.0), BODY_ANGLE_DEG, epsilon = 1e-12);
        assert!(flight_path_pitch(-1000.0, 250.0) < BODY_ANGLE_DEG);
    }

    #[test]
    fn bank_follows_turn_direction() {
        assert!(turn_bank(90.0, 120.0, 250.0) > 0.0);
        assert!(turn_bank(90.0, 60.0, 250.0) < 0.0);
        assert_eq!(turn_bank(90.0, 90.2, 250.0), 0.0);
    }
}
