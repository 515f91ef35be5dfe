use crate::planning::AircraftPerformance;

// ---------------------------------------------------------------------------
// Derivation ratios and defaults
// ---------------------------------------------------------------------------

const VR_PER_CRUISE: f64 = 0.38;
const V1_PER_VR: f64 = 0.92;
const V2_OVER_VR_KTS: f64 = 12.0;
const VREF_PER_CRUISE: f64 = 0.32;
const APPROACH_OVER_VREF_KTS: f64 = 10.0;
const TAKEOFF_FT_PER_CRUISE_KT: f64 = 15.0;

const DEFAULT_INITIAL_CLIMB_FPM: f64 = 2500.0;
const DEFAULT_CRUISE_CLIMB_FPM: f64 = 2000.0;
const DEFAULT_DESCENT_FPM: f64 = 2000.0;
const ROTATION_RATE_DEG_S: f64 = 3.0;
const INITIAL_CLIMB_PITCH_DEG: f64 = 15.0;

// ---------------------------------------------------------------------------
// Aircraft profile (derived, immutable)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct AircraftProfile {
    pub type_code: String,
    pub v1_kts: f64,
    pub vr_kts: f64,
    pub v2_kts: f64,
    pub vref_kts: f64,
    pub approach_speed_kts: f64,
    pub takeoff_distance_ft: f64,
    pub ground_accel_kts_s: f64,
    pub rotation_rate_deg_s: f64,
    pub initial_climb_pitch_deg: f64,
    pub initial_climb_rate_fpm: f64,
    pub cruise_climb_rate_fpm: f64,
    pub cruise_speed_kts: f64,
    pub cruise_altitude_ft: f64,
    pub descent_rate_fpm: f64,
}

impl AircraftProfile {
    /// Fill in everything the performance record leaves out.
    pub fn derive(perf: &AircraftPerformance) -> Self {
        let cruise = perf.cruise_speed_kts;

        let vr = perf.vr_kts.unwrap_or(VR_PER_CRUISE * cruise);
        let v1 = perf.v1_kts.unwrap_or(V1_PER_VR * vr).min(vr);
        let v2 = perf.v2_kts.unwrap_or(vr + V2_OVER_VR_KTS).max(vr);
        let vref = perf.vref_kts.unwrap_or(VREF_PER_CRUISE * cruise);

        let takeoff_distance_ft = perf
            .takeoff_distance_ft
            .unwrap_or(TAKEOFF_FT_PER_CRUISE_KT * cruise);

        Self {
            type_code: perf.type_code.clone(),
            v1_kts: v1,
            vr_kts: vr,
            v2_kts: v2,
            vref_kts: vref,
            approach_speed_kts: perf
                .approach_speed_kts
                .unwrap_or(vref + APPROACH_OVER_VREF_KTS),
            takeoff_distance_ft,
            ground_accel_kts_s: ground_acceleration(takeoff_distance_ft),
            rotation_rate_deg_s: ROTATION_RATE_DEG_S,
            initial_climb_pitch_deg: INITIAL_CLIMB_PITCH_DEG,
            initial_climb_rate_fpm: positive_or(perf.initial_climb_rate_fpm, DEFAULT_INITIAL_CLIMB_FPM),
            cruise_climb_rate_fpm: positive_or(perf.cruise_climb_rate_fpm, DEFAULT_CRUISE_CLIMB_FPM),
            cruise_speed_kts: cruise,
            cruise_altitude_ft: perf.cruise_altitude_ft,
            descent_rate_fpm: positive_or(perf.descent_rate_fpm.map(f64::abs), DEFAULT_DESCENT_FPM),
        }
    }
}

/// A rate of zero would stall its phase for good.
fn positive_or(value: Option<f64>, default: f64) -> f64 {
    value.filter(|v| *v > 0.0).unwrap_or(default)
}

/// Ground-roll acceleration bucketed by required takeoff distance (kt/s).
pub fn ground_acceleration(takeoff_distance_ft: f64) -> f64 {
    if takeoff_distance_ft > 10_000.0 {
        2.5
    } else if takeoff_distance_ft > 7_000.0 {
        3.0
    } else if takeoff_distance_ft > 5_000.0 {
        3.5
    } else {
        4.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cruise_only(speed: f64) -> AircraftPerformance {
        AircraftPerformance {
            type_code: "TEST".into(),
            cruise_speed_kts: speed,
            cruise_altitude_ft: 33_000.0,
            ..Default::default()
        }
    }

    #[test]
    fn v_speeds_from_cruise_ratios() {
        let p = AircraftProfile::derive(&cruise_only(450.0));
        assert_relative_eq!(p.vr_kts, 171.0, epsilon = 1e-9);
        assert_relative_eq!(p.v1_kts, 157.32, epsilon = 1e-9);
        assert_relative_eq!(p.v2_kts, 183.0, epsilon = 1e-9);
        assert_relative_eq!(p.vref_kts, 144.0, epsilon = 1e-9);
        assert_relative_eq!(p.approach_speed_kts, 154.0, epsilon = 1e-9);
        assert!(p.v1_kts < p.vr_kts && p.vr_kts < p.v2_kts);
    }

    #[test]
    fn supplied_speeds_win() {
        let perf = AircraftPerformance {
            v1_kts: Some(140.0),
            vr_kts: Some(145.0),
            v2_kts: Some(152.0),
            vref_kts: Some(135.0),
            ..cruise_only(450.0)
        };
        let p = AircraftProfile::derive(&perf);
        assert_eq!((p.v1_kts, p.vr_kts, p.v2_kts, p.vref_kts), (140.0, 145.0, 152.0, 135.0));
    }

    #[test]
    fn inconsistent_supplied_speeds_are_ordered() {
        let perf = AircraftPerformance {
            v1_kts: Some(160.0),
            vr_kts: Some(150.0),
            v2_kts: Some(140.0),
            ..cruise_only(450.0)
        };
        let p = AircraftProfile::derive(&perf);
        assert!(p.v1_kts <= p.vr_kts && p.vr_kts <= p.v2_kts);
    }

    #[test]
    fn unusable_vertical_rates_fall_back_to_defaults() {
        let perf = AircraftPerformance {
            initial_climb_rate_fpm: Some(0.0),
            cruise_climb_rate_fpm: Some(-100.0),
            descent_rate_fpm: Some(0.0),
            ..cruise_only(450.0)
        };
        let p = AircraftProfile::derive(&perf);
        assert_eq!(p.initial_climb_rate_fpm, DEFAULT_INITIAL_CLIMB_FPM);
        assert_eq!(p.cruise_climb_rate_fpm, DEFAULT_CRUISE_CLIMB_FPM);
        assert_eq!(p.descent_rate_fpm, DEFAULT_DESCENT_FPM);

        let perf = AircraftPerformance { descent_rate_fpm: Some(-1500.0), ..cruise_only(450.0) };
        assert_eq!(AircraftProfile::derive(&perf).descent_rate_fpm, 1500.0);
    }

    #[test]
    fn acceleration_buckets() {
        assert_eq!(ground_acceleration(11_000.0), 2.5);
        assert_eq!(ground_acceleration(10_000.0), 3.0);
        assert_eq!(ground_acceleration(7_500.0), 3.0);
        assert_eq!(ground_acceleration(6_000.0), 3.5);
        assert_eq!(ground_acceleration(5_000.0), 4.0);
    }

    #[test]
    fn takeoff_distance_proxy_drives_acceleration() {
        // 450 kt cruise -> 6750 ft proxy -> 3.5 kt/s
        let p = AircraftProfile::derive(&cruise_only(450.0));
        assert_eq!(p.takeoff_distance_ft, 6750.0);
        assert_eq!(p.ground_accel_kts_s, 3.5);
    }
}
