//! Physical and loop constants shared by every elevator in the bank.
//!
//! These are fixed for a build; the front end only decides how the
//! simulation is displayed, never how it moves.

pub const FIXED_UPDATES_PER_SECOND: u32 = 25;
pub const FRAMES_PER_SECOND: u32 = 10;
pub const MAX_FRAME_SKIP: u32 = 5;

pub const FLOOR_HEIGHT: f64 = 4.0; // m
pub const MAX_SPEED: f64 = 8.0; // m/s
pub const ACCELERATION: f64 = 1.5; // m/s^2
pub const WAITING_TIME: f64 = 10.0; // s
pub const CAPACITY: u8 = 3;
pub const MAX_DELTA: f64 = 0.01; // m

pub const NUMBER_OF_ELEVATORS: usize = 7;
pub const NUMBER_OF_FLOORS: u8 = 55;
pub const LOBBY_FLOOR: u8 = 0;

// Calculated
pub const FIXED_DELTA_TIME: f64 = 1.0 / FIXED_UPDATES_PER_SECOND as f64;
pub const DISTANCE_TO_ACCELERATE: f64 = (MAX_SPEED * MAX_SPEED) / (ACCELERATION * 2.0);
pub const TIME_TO_ACCELERATE: f64 = MAX_SPEED / ACCELERATION;
