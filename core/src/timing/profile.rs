//! Mode-dependent announcement thresholds
//!
//! Car, bicycle and pedestrian use fixed tables derived from lead-time
//! budgets. Every other class scales linearly with its default speed.

use guidance_types::{VehicleClass, VehicleProfile};

/// Fallback default speed (m/s) when a custom profile has none
const FALLBACK_DEFAULT_SPEED: f32 = 12.0;

/// Distance thresholds (m) and reference speeds (m/s) for one vehicle class.
///
/// The `*_end` bounds are "do not announce after" floors: once the vehicle
/// is closer than the floor the prompt for that tier is skipped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingProfile {
    pub prepare_long: u32,
    pub prepare_long_end: u32,
    pub prepare: u32,
    pub prepare_end: u32,
    pub turn_in: u32,
    pub turn_in_end: u32,
    pub turn: u32,
    /// Reference speed for the TURN tier
    pub turn_default_speed: f32,
    /// Reference speed for every other tier and the fallback for bad inputs
    pub default_speed: f32,
}

impl TimingProfile {
    /// Derive thresholds for a vehicle profile. Deterministic; recompute on
    /// every class or default-speed change.
    pub fn for_vehicle(vehicle: &VehicleProfile) -> Self {
        match vehicle.class.base() {
            Some(VehicleClass::Car) => Self {
                prepare_long: 3500,      // 105 s @ 120 km/h
                prepare_long_end: 4000,  // above prepare_long: never spoken on ticks
                prepare: 1500,           // 125 s
                prepare_end: 1200,       // 100 s
                turn_in: 300,            // 23 s
                turn_in_end: 210,        // 16 s
                turn: 50,                // 7 s
                turn_default_speed: 7.0, // 25 km/h
                default_speed: 13.0,     // 48 km/h
            },
            Some(VehicleClass::Bicycle) => Self {
                prepare_long: 500,
                prepare_long_end: 1300,
                prepare: 200,
                prepare_end: 120,
                turn_in: 80,
                turn_in_end: 60,
                turn: 30,
                turn_default_speed: 5.0,
                default_speed: 5.0,
            },
            Some(VehicleClass::Pedestrian) => Self {
                prepare_long: 500,
                prepare_long_end: 600,
                prepare: 200,
                prepare_end: 250,
                turn_in: 50,
                turn_in_end: 30,
                turn: 15,
                turn_default_speed: 2.0,
                default_speed: 2.0,
            },
            _ => Self::scaled(vehicle.default_speed),
        }
    }

    /// Linear thresholds for classes without a fixed table
    fn scaled(default_speed: f32) -> Self {
        let speed = if default_speed.is_finite() && default_speed > 0.0 {
            default_speed
        } else {
            FALLBACK_DEFAULT_SPEED
        };
        let at = |secs: f32| (speed * secs) as u32;
        Self {
            prepare_long: at(270.0),
            prepare_long_end: at(230.0) * 2,
            prepare: at(115.0),
            prepare_end: at(92.0),
            turn_in: at(23.0),
            turn_in_end: at(16.0),
            turn: at(7.0),
            turn_default_speed: speed / 2.0,
            default_speed: speed,
        }
    }

    /// Replace a missing or non-positive speed with the default speed
    pub fn effective_speed(&self, speed: f32) -> f32 {
        if speed.is_finite() && speed > 0.0 {
            speed
        } else {
            self.default_speed
        }
    }

    /// Whether `distance` is inside a threshold.
    ///
    /// True when the raw distance is below `threshold` (widened by
    /// `warmup_distance`), or when the time to cover the distance at the
    /// current speed is shorter than the time to cover `threshold` at
    /// `threshold_speed`. Non-positive speeds fall back to the default speed.
    pub fn is_imminent(
        &self,
        current_speed: f32,
        distance: f64,
        threshold: f64,
        threshold_speed: f32,
        warmup_distance: f64,
    ) -> bool {
        let current_speed = f64::from(self.effective_speed(current_speed));
        let threshold_speed = f64::from(self.effective_speed(threshold_speed));

        distance < threshold + warmup_distance
            || (distance - warmup_distance) / current_speed < threshold / threshold_speed
    }
}

impl Default for TimingProfile {
    fn default() -> Self {
        Self::for_vehicle(&VehicleProfile::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn car() -> TimingProfile {
        TimingProfile::for_vehicle(&VehicleProfile::new(VehicleClass::Car, 0.0))
    }

    #[test]
    fn derived_classes_share_car_table() {
        let truck = TimingProfile::for_vehicle(&VehicleProfile::new(VehicleClass::Truck, 20.0));
        assert_eq!(truck, car());
        assert_eq!(car().turn_in, 300);
    }

    #[test]
    fn custom_class_scales_with_default_speed() {
        let boat = TimingProfile::for_vehicle(&VehicleProfile::new(VehicleClass::Boat, 4.0));
        assert_eq!(boat.prepare_long, 1080);
        assert_eq!(boat.prepare_long_end, 1840);
        assert_eq!(boat.prepare, 460);
        assert_eq!(boat.prepare_end, 368);
        assert_eq!(boat.turn_in, 92);
        assert_eq!(boat.turn_in_end, 64);
        assert_eq!(boat.turn, 28);
        assert_eq!(boat.turn_default_speed, 2.0);
    }

    #[test]
    fn custom_class_without_speed_uses_fallback() {
        let other = TimingProfile::for_vehicle(&VehicleProfile::new(VehicleClass::Other, 0.0));
        assert_eq!(other.default_speed, FALLBACK_DEFAULT_SPEED);
        assert_eq!(other.turn, 84);
    }

    #[test]
    fn raw_distance_floor() {
        let profile = car();
        // Very slow: time check fails, raw distance check holds
        assert!(profile.is_imminent(0.5, 40.0, 50.0, 7.0, 0.0));
        assert!(!profile.is_imminent(0.5, 60.0, 50.0, 7.0, 0.0));
    }

    #[test]
    fn time_check_triggers_earlier_at_speed() {
        let profile = car();
        // 320 m at 20 m/s is 16 s, below 300 m at 13 m/s (23 s)
        assert!(profile.is_imminent(20.0, 320.0, 300.0, 0.0, 0.0));
        assert!(!profile.is_imminent(13.0, 320.0, 300.0, 0.0, 0.0));
    }

    #[test]
    fn warmup_widens_threshold() {
        let profile = car();
        assert!(!profile.is_imminent(1.0, 55.0, 50.0, 7.0, 0.0));
        assert!(profile.is_imminent(1.0, 55.0, 50.0, 7.0, 10.0));
    }

    #[test]
    fn non_positive_speed_uses_default() {
        let profile = car();
        assert_eq!(
            profile.is_imminent(0.0, 290.0, 300.0, 0.0, 0.0),
            profile.is_imminent(13.0, 290.0, 300.0, 13.0, 0.0)
        );
        assert_eq!(profile.effective_speed(-3.0), 13.0);
    }

    #[test]
    fn monotonic_in_distance() {
        let profile = car();
        for speed in [0.0_f32, 3.0, 13.0, 30.0] {
            for far in (0..2000).step_by(37) {
                if !profile.is_imminent(speed, far as f64, 300.0, 0.0, 5.0) {
                    continue;
                }
                for near in (0..far).step_by(11) {
                    assert!(profile.is_imminent(speed, near as f64, 300.0, 0.0, 5.0));
                }
            }
        }
    }
}
