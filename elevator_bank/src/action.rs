use crate::config::{TIME_TO_ACCELERATE, WAITING_TIME};
use crate::direction::Direction;
use crate::kinematics::MotionProfile;

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Accelerating,
    Moving,
    Decelerating,
    Waiting,
}

/// One timed phase of cabin motion. Durations are in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Action {
    duration: f64,
    phase: Phase,
    direction: Direction,
}

impl Action {
    pub fn new(duration: f64, phase: Phase, direction: Direction) -> Self {
        Action {
            duration: duration,
            phase: phase,
            direction: direction,
        }
    }

    /// Doors open, passengers board or leave.
    pub fn wait() -> Self {
        Action::new(WAITING_TIME, Phase::Waiting, Direction::Stop)
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The phases needed to cover `displacement` metres and dwell at the end.
    pub fn plan_trip(displacement: f64) -> Vec<Action> {
        let direction = Direction::of_displacement(displacement);
        let mut actions = Vec::with_capacity(4);
        match MotionProfile::for_distance(displacement.abs()) {
            MotionProfile::Trapezoidal { cruise_time } => {
                actions.push(Action::new(TIME_TO_ACCELERATE, Phase::Accelerating, direction));
                actions.push(Action::new(cruise_time, Phase::Moving, direction));
                actions.push(Action::new(TIME_TO_ACCELERATE, Phase::Decelerating, direction));
            }
            MotionProfile::Triangular { half_time } => {
                actions.push(Action::new(half_time, Phase::Accelerating, direction));
                actions.push(Action::new(half_time, Phase::Decelerating, direction));
            }
        }
        actions.push(Action::wait());
        actions
    }
}
