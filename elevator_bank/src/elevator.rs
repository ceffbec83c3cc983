/// ----- ELEVATOR MODULE -----
/// One cabin: its continuous elevation, the legs it has committed to and
/// the timed actions that carry it to the next stop. `advance` is the
/// per-tick state machine; `plan_placement` answers how soon the cabin
/// could take on another request and where that request would go.

use std::collections::VecDeque;
use std::fmt;

use log::debug;

use crate::action::{Action, Phase};
use crate::config::{ACCELERATION, FIXED_DELTA_TIME, FLOOR_HEIGHT, MAX_DELTA, MAX_SPEED, NUMBER_OF_FLOORS};
use crate::direction::Direction;
use crate::kinematics::travel_and_wait_time;
use crate::request::Request;

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Accelerating,
    Moving,
    Decelerating,
    Waiting,
}

impl Status {
    pub fn as_string(&self) -> String {
        match self {
            Status::Idle => String::from("idle"),
            Status::Accelerating => String::from("accelerating"),
            Status::Moving => String::from("moving"),
            Status::Decelerating => String::from("decelerating"),
            Status::Waiting => String::from("waiting"),
        }
    }
}

impl From<Phase> for Status {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Accelerating => Status::Accelerating,
            Phase::Moving => Status::Moving,
            Phase::Decelerating => Status::Decelerating,
            Phase::Waiting => Status::Waiting,
        }
    }
}

/// Where a new request goes in a stop queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Ahead of the leg at this index, on the empty run leading to its origin.
    BeforeLeg(usize),
    /// Inside the leg at this index, which is split around the new passenger.
    RideAlong(usize),
    Tail,
}

/// Result of fitting a request into an elevator's itinerary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Seconds until the cabin can start serving the request's origin.
    pub arrival: f64,
    /// Seconds until the request has been delivered.
    pub completion: f64,
    pub slot: Slot,
}

impl Placement {
    fn new(arrival: f64, request: &Request, slot: Slot) -> Self {
        Placement {
            arrival: arrival,
            completion: arrival + travel_and_wait_time(request.origin(), request.destination()),
            slot: slot,
        }
    }
}

/// Read-only view of an elevator for status displays.
#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub struct ElevatorSnapshot {
    pub index: usize,
    pub current_floor: u8,
    pub elevation_meters: f64,
    pub velocity: f64,
    pub status: Status,
    pub direction: Direction,
    pub next_destination_floor: u8,
    pub passengers_aboard: u8,
    pub queued_stops: Vec<String>,
}

impl ElevatorSnapshot {
    /// Elevation extrapolated `interpolation` of a tick past the last update.
    pub fn display_elevation(&self, interpolation: f64) -> f64 {
        self.elevation_meters + self.velocity * interpolation * FIXED_DELTA_TIME
    }
}

impl fmt::Display for ElevatorSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {:.2}m {}",
            self.current_floor,
            self.elevation_meters,
            self.status.as_string()
        )?;
        if let Some(direction) = self.direction.as_string() {
            write!(f, " {}", direction)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Elevator {
    index: usize,
    position: f64,
    speed: f64,
    velocity: f64,
    current_floor: u8,
    next_destination_floor: u8,
    passengers_aboard: u8,
    stop_queue: Vec<Request>,
    action_queue: VecDeque<Action>,
    status: Status,
    direction: Direction,
    // the running action ends here; queued actions only carry durations
    action_end_time: f64,
}

impl Elevator {
    pub fn new(index: usize, floor: u8) -> Self {
        Elevator {
            index: index,
            position: f64::from(floor) * FLOOR_HEIGHT,
            speed: 0.0,
            velocity: 0.0,
            current_floor: floor,
            next_destination_floor: floor,
            passengers_aboard: 0,
            stop_queue: Vec::new(),
            action_queue: VecDeque::new(),
            status: Status::Idle,
            direction: Direction::Stop,
            action_end_time: 0.0,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn elevation(&self) -> f64 {
        self.position
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn current_floor(&self) -> u8 {
        self.current_floor
    }

    pub fn next_destination_floor(&self) -> u8 {
        self.next_destination_floor
    }

    pub fn passengers_aboard(&self) -> u8 {
        self.passengers_aboard
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn stop_queue(&self) -> &[Request] {
        &self.stop_queue
    }

    pub fn action_queue(&self) -> &VecDeque<Action> {
        &self.action_queue
    }

    pub fn snapshot(&self) -> ElevatorSnapshot {
        ElevatorSnapshot {
            index: self.index,
            current_floor: self.current_floor,
            elevation_meters: self.position,
            velocity: self.velocity,
            status: self.status,
            direction: self.direction,
            next_destination_floor: self.next_destination_floor,
            passengers_aboard: self.passengers_aboard,
            queued_stops: self.stop_queue.iter().map(ToString::to_string).collect(),
        }
    }

    /// Books the request onto a queued leg flying the same route, if one
    /// has room.
    pub fn try_merge_passenger(&mut self, request: &Request) -> bool {
        self.stop_queue.iter_mut().any(|leg| leg.try_merge(request))
    }

    /// Seconds left on the running action plus everything queued behind it.
    pub fn remaining_action_time(&self, now: f64) -> f64 {
        let rest = (self.action_end_time - now).max(0.0);
        rest + self.action_queue.iter().map(Action::duration).sum::<f64>()
    }

    pub fn estimate_arrival(&self, request: &Request, now: f64) -> f64 {
        self.plan_placement(request, now).arrival
    }

    pub fn estimate_completion(&self, request: &Request, now: f64) -> f64 {
        self.plan_placement(request, now).completion
    }

    /// Walks the queued legs the way the cabin will fly them and stops at
    /// the first leg the request can be folded into: either the empty run
    /// towards that leg's origin passes the request's origin and ends at its
    /// destination, or the leg already covers the request's span and has
    /// seats left. Otherwise the request goes to the back.
    pub fn plan_placement(&self, request: &Request, now: f64) -> Placement {
        let mut total = self.remaining_action_time(now);
        let mut previous_floor = self.next_destination_floor;

        for (index, leg) in self.stop_queue.iter().enumerate() {
            if previous_floor != leg.origin()
                && request.destination() == leg.origin()
                && lies_between(request.origin(), previous_floor, leg.origin())
            {
                let arrival = total + travel_and_wait_time(previous_floor, request.origin());
                return Placement::new(arrival, request, Slot::BeforeLeg(index));
            }
            if leg.covers(request) && leg.has_room_for(request) {
                let arrival = total
                    + travel_and_wait_time(previous_floor, leg.origin())
                    + travel_and_wait_time(leg.origin(), request.origin());
                return Placement::new(arrival, request, Slot::RideAlong(index));
            }
            total += travel_and_wait_time(previous_floor, leg.origin())
                + travel_and_wait_time(leg.origin(), leg.destination());
            previous_floor = leg.destination();
        }

        let arrival = total + travel_and_wait_time(previous_floor, request.origin());
        Placement::new(arrival, request, Slot::Tail)
    }

    /// Puts the request at `slot` (as returned by `plan_placement` on this
    /// elevator's current state).
    pub fn insert(&mut self, request: Request, slot: Slot) {
        match slot {
            Slot::BeforeLeg(index) if index < self.stop_queue.len() => {
                self.stop_queue.insert(index, request);
            }
            Slot::RideAlong(index) if index < self.stop_queue.len() => {
                let leg = self.stop_queue[index];
                let seated = leg.passengers();
                let mut pieces = Vec::with_capacity(3);
                if leg.origin() != request.origin() {
                    pieces.push(Request::leg(leg.origin(), request.origin(), seated));
                }
                pieces.push(Request::leg(
                    request.origin(),
                    request.destination(),
                    seated + request.passengers(),
                ));
                if request.destination() != leg.destination() {
                    pieces.push(Request::leg(request.destination(), leg.destination(), seated));
                }
                self.stop_queue.splice(index..=index, pieces);
            }
            Slot::BeforeLeg(_) | Slot::RideAlong(_) | Slot::Tail => {
                debug_assert!(slot == Slot::Tail, "slot {slot:?} is outside the stop queue");
                self.stop_queue.push(request);
            }
        }

        // Already standing at the pickup floor: open the doors right away.
        let boards_here = self
            .stop_queue
            .first()
            .map_or(false, |head| head.origin() == self.current_floor);
        if boards_here && self.status == Status::Idle && self.action_queue.is_empty() {
            self.action_queue.push_back(Action::wait());
        }
    }

    /// Places the request where `plan_placement` says and returns that plan.
    pub fn add_request(&mut self, request: Request, now: f64) -> Placement {
        let placement = self.plan_placement(&request, now);
        self.insert(request, placement.slot);
        placement
    }

    /// One fixed tick covering `now..now + delta_time`. An idle cabin only
    /// plans or starts its next action at `now`; a running one is integrated
    /// exactly through every action boundary inside the tick, each action
    /// starting where the previous one ended.
    pub fn advance(&mut self, now: f64, delta_time: f64) {
        let tick_end = now + delta_time;
        let mut time = now;

        if self.status == Status::Idle {
            match self.action_queue.pop_front() {
                Some(action) => self.begin(action, now),
                None => {
                    self.replan();
                    return;
                }
            }
        }

        while self.action_end_time <= tick_end {
            self.integrate(self.action_end_time - time);
            time = self.action_end_time;
            match self.action_queue.pop_front() {
                Some(action) => self.begin(action, time),
                None => {
                    self.come_to_rest();
                    self.replan();
                    return;
                }
            }
        }

        self.integrate(tick_end - time);
        self.current_floor = floor_at(self.position);
    }

    fn begin(&mut self, action: Action, start: f64) {
        self.status = action.phase().into();
        self.direction = action.direction();
        self.action_end_time = start + action.duration();
    }

    fn come_to_rest(&mut self) {
        self.speed = 0.0;
        self.velocity = 0.0;
        self.status = Status::Idle;
        self.direction = Direction::Stop;
        self.current_floor = floor_at(self.position);
    }

    /// Moves the cabin `seconds` forward under the running phase.
    fn integrate(&mut self, seconds: f64) {
        let acceleration = match self.status {
            Status::Accelerating => ACCELERATION,
            Status::Decelerating => -ACCELERATION,
            Status::Moving => 0.0,
            Status::Waiting | Status::Idle => {
                self.speed = 0.0;
                self.velocity = 0.0;
                return;
            }
        };
        let start_speed = self.speed;
        self.speed = (start_speed + acceleration * seconds).clamp(0.0, MAX_SPEED);
        self.velocity = self.speed * self.direction.signum();
        self.position += (start_speed + self.speed) * 0.5 * seconds * self.direction.signum();
    }

    /// Turns the head of the stop queue into actions.
    fn replan(&mut self) {
        debug_assert!(
            self.action_queue.is_empty(),
            "elevator {} replanned with actions still queued",
            self.index
        );

        let Some(head) = self.stop_queue.first().copied() else {
            self.status = Status::Idle;
            self.passengers_aboard = 0;
            self.next_destination_floor = self.current_floor;
            return;
        };

        if head.origin() == self.current_floor && self.status == Status::Idle {
            self.stop_queue.remove(0);
            self.passengers_aboard = head.passengers();
            self.next_destination_floor = head.destination();
            debug!("elevator {}: leaving floor {} with {}", self.index, self.current_floor, head);
        } else {
            self.passengers_aboard = 0;
            self.next_destination_floor = head.origin();
            debug!("elevator {}: heading to floor {} to pick up {}", self.index, head.origin(), head);
        }

        let displacement = f64::from(self.next_destination_floor) * FLOOR_HEIGHT - self.position;
        if displacement.abs() < MAX_DELTA {
            return;
        }
        self.action_queue.extend(Action::plan_trip(displacement));
    }
}

fn floor_at(position: f64) -> u8 {
    (position / FLOOR_HEIGHT).round().clamp(0.0, f64::from(NUMBER_OF_FLOORS)) as u8
}

fn lies_between(floor: u8, from: u8, to: u8) -> bool {
    from.min(to) <= floor && floor <= from.max(to)
}
