use std::fmt;

use crate::config::{CAPACITY, LOBBY_FLOOR, NUMBER_OF_FLOORS};
use crate::direction::Direction;
use crate::error::RequestError;

/// One route-leg: everyone booked on it boards at `origin` and leaves at
/// `destination`. Two requests with the same floors are the same leg,
/// whatever their passenger counts.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy)]
pub struct Request {
    origin: u8,
    destination: u8,
    passengers: u8,
}

impl Request {
    /// Lobby-bound request for a single passenger.
    pub fn new(origin: u8, destination: u8) -> Result<Self, RequestError> {
        if origin == destination {
            return Err(RequestError::SameFloor { floor: origin });
        }
        for floor in [origin, destination] {
            if floor > NUMBER_OF_FLOORS {
                return Err(RequestError::FloorOutOfRange { floor: floor, max: NUMBER_OF_FLOORS });
            }
        }
        if origin != LOBBY_FLOOR && destination != LOBBY_FLOOR {
            return Err(RequestError::NotLobbyBound { origin: origin, destination: destination });
        }
        Ok(Request::leg(origin, destination, 1))
    }

    /// A leg produced by splitting an existing one. Only the queue builds
    /// these, so the lobby rule does not apply.
    pub(crate) fn leg(origin: u8, destination: u8, passengers: u8) -> Self {
        debug_assert!(origin != destination, "leg {origin}-{destination} goes nowhere");
        debug_assert!(passengers <= CAPACITY);
        Request {
            origin: origin,
            destination: destination,
            passengers: passengers,
        }
    }

    pub fn origin(&self) -> u8 {
        self.origin
    }

    pub fn destination(&self) -> u8 {
        self.destination
    }

    pub fn passengers(&self) -> u8 {
        self.passengers
    }

    pub fn direction(&self) -> Direction {
        Direction::between(self.origin, self.destination)
    }

    pub fn same_route(&self, other: &Request) -> bool {
        self.origin == other.origin && self.destination == other.destination
    }

    pub fn has_room_for(&self, other: &Request) -> bool {
        self.passengers + other.passengers <= CAPACITY
    }

    /// Books `other`'s passengers onto this leg if it flies the same route
    /// and has room for them.
    pub fn try_merge(&mut self, other: &Request) -> bool {
        if self.same_route(other) && self.has_room_for(other) {
            self.passengers += other.passengers;
            true
        } else {
            false
        }
    }

    /// True if `other` boards and alights inside this leg's span, travelling
    /// the same way, so it could ride along without any extra travel.
    pub fn covers(&self, other: &Request) -> bool {
        let (low, high) = self.span();
        let (other_low, other_high) = other.span();
        self.direction() == other.direction() && low <= other_low && other_high <= high
    }

    fn span(&self) -> (u8, u8) {
        (self.origin.min(self.destination), self.origin.max(self.destination))
    }
}

impl PartialEq for Request {
    fn eq(&self, other: &Self) -> bool {
        self.same_route(other)
    }
}

impl Eq for Request {}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} ({})", self.origin, self.destination, self.passengers)
    }
}
