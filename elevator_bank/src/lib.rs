//! `elevator_bank`: dispatch and motion simulation for a bank of elevators
//! serving lobby-bound traffic.
//!
//! | Module        | Contents                                              |
//! |---------------|-------------------------------------------------------|
//! | [`config`]    | physical and loop constants                           |
//! | [`kinematics`]| travel times, `MotionProfile`                         |
//! | [`direction`] | `Direction` of travel                                 |
//! | [`action`]    | `Action`, `Phase`                                     |
//! | [`request`]   | `Request` route-legs                                  |
//! | [`elevator`]  | per-cabin state machine, ETA and fold-in              |
//! | [`tower`]     | request inbox and dispatcher                          |
//! | [`clock`]     | `Clock`, `MonotonicClock`, `ManualClock`              |
//! | [`simulation`]| `SimObject`, `Renderer`, fixed-timestep loop          |
//! | [`error`]     | `RequestError`, `SimulationError`                     |

pub mod action;
pub mod clock;
pub mod config;
pub mod direction;
pub mod elevator;
pub mod error;
pub mod kinematics;
pub mod request;
pub mod simulation;
pub mod tower;

pub use action::{Action, Phase};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use direction::Direction;
pub use elevator::{Elevator, ElevatorSnapshot, Placement, Slot, Status};
pub use error::{RequestError, SimulationError};
pub use request::Request;
pub use simulation::{FixedTimestep, Frame, Iteration, Renderer, SimObject, Simulation, SimulationHandle};
pub use tower::{Assignment, AssignmentKind, RequestSender, Tower};
