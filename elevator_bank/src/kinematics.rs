/// ----- KINEMATICS MODULE -----
/// Stateless travel-time arithmetic for a cabin that accelerates and brakes
/// at a constant rate up to a top speed. Both the ETA estimator and the
/// motion planner go through `MotionProfile`, so the durations they use
/// always agree.

use crate::config::{
    ACCELERATION, DISTANCE_TO_ACCELERATE, FLOOR_HEIGHT, MAX_SPEED, TIME_TO_ACCELERATE,
    WAITING_TIME,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionProfile {
    /// Long enough to reach `MAX_SPEED`: accelerate, cruise, brake.
    Trapezoidal { cruise_time: f64 },
    /// Too short to reach `MAX_SPEED`: accelerate for half the trip, brake for the rest.
    Triangular { half_time: f64 },
}

impl MotionProfile {
    pub fn for_distance(distance: f64) -> Self {
        if distance > DISTANCE_TO_ACCELERATE * 2.0 {
            MotionProfile::Trapezoidal {
                cruise_time: (distance - DISTANCE_TO_ACCELERATE * 2.0) / MAX_SPEED,
            }
        } else {
            MotionProfile::Triangular {
                half_time: (distance / ACCELERATION).sqrt(),
            }
        }
    }

    pub fn total_time(&self) -> f64 {
        match *self {
            MotionProfile::Trapezoidal { cruise_time } => cruise_time + TIME_TO_ACCELERATE * 2.0,
            MotionProfile::Triangular { half_time } => half_time * 2.0,
        }
    }
}

pub fn floor_distance(floor1: u8, floor2: u8) -> f64 {
    (f64::from(floor2) - f64::from(floor1)).abs() * FLOOR_HEIGHT
}

pub fn travel_time(floor1: u8, floor2: u8) -> f64 {
    MotionProfile::for_distance(floor_distance(floor1, floor2)).total_time()
}

/// Travel time plus the dwell at the far end. Staying put costs nothing.
pub fn travel_and_wait_time(floor1: u8, floor2: u8) -> f64 {
    if floor1 == floor2 {
        0.0
    } else {
        travel_time(floor1, floor2) + WAITING_TIME
    }
}
