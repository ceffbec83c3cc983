/// ----- TOWER MODULE -----
/// The tower owns the elevators and an inbox of requests. Any thread may
/// submit through a `RequestSender`; only the simulation thread drains the
/// inbox, so assigning requests to elevators needs no locking.

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, warn};

use crate::config::{LOBBY_FLOOR, NUMBER_OF_ELEVATORS};
use crate::elevator::{Elevator, Placement, Slot};
use crate::error::RequestError;
use crate::request::Request;

/// Cloneable handle for submitting requests from other threads.
#[derive(Debug, Clone)]
pub struct RequestSender {
    inbox_tx: Sender<Request>,
}

impl RequestSender {
    pub fn submit(&self, origin: u8, destination: u8) -> Result<(), RequestError> {
        let request = Request::new(origin, destination).map_err(|e| {
            warn!("rejected request {} -> {}: {}", origin, destination, e);
            e
        })?;
        self.inbox_tx.send(request).map_err(|_| {
            warn!("dropped request {}: simulation has stopped", request);
            RequestError::InboxClosed
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AssignmentKind {
    /// Joined a queued leg flying the same route.
    Merged,
    Inserted { slot: Slot, arrival: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assignment {
    pub request: Request,
    pub elevator: usize,
    pub kind: AssignmentKind,
}

pub struct Tower {
    elevators: Vec<Elevator>,
    inbox_tx: Sender<Request>,
    inbox_rx: Receiver<Request>,
}

impl Tower {
    /// `NUMBER_OF_ELEVATORS` cabins waiting in the lobby.
    pub fn new() -> Self {
        Tower::with_start_floors(&[LOBBY_FLOOR; NUMBER_OF_ELEVATORS])
    }

    pub fn with_start_floors(floors: &[u8]) -> Self {
        debug_assert!(!floors.is_empty(), "a tower needs at least one elevator");
        let (inbox_tx, inbox_rx) = unbounded();
        Tower {
            elevators: floors
                .iter()
                .enumerate()
                .map(|(index, &floor)| Elevator::new(index, floor))
                .collect(),
            inbox_tx: inbox_tx,
            inbox_rx: inbox_rx,
        }
    }

    pub fn elevators(&self) -> &[Elevator] {
        &self.elevators
    }

    pub fn sender(&self) -> RequestSender {
        RequestSender {
            inbox_tx: self.inbox_tx.clone(),
        }
    }

    pub fn submit(&self, origin: u8, destination: u8) -> Result<(), RequestError> {
        self.sender().submit(origin, destination)
    }

    pub fn pending(&self) -> usize {
        self.inbox_rx.len()
    }

    /// Assigns everything submitted since the last call, oldest first.
    pub fn drain_and_assign(&mut self, now: f64) -> Vec<Assignment> {
        let pending: Vec<Request> = self.inbox_rx.try_iter().collect();
        pending
            .into_iter()
            .filter_map(|request| self.assign(request, now))
            .collect()
    }

    /// Merges the request into a matching leg if any elevator has one with
    /// room; otherwise hands it to the elevator that reaches its origin
    /// first. Ties go to the lowest index.
    pub fn assign(&mut self, request: Request, now: f64) -> Option<Assignment> {
        for elevator in self.elevators.iter_mut() {
            if elevator.try_merge_passenger(&request) {
                debug!("merged {} into a leg of elevator {}", request, elevator.index());
                return Some(Assignment {
                    request: request,
                    elevator: elevator.index(),
                    kind: AssignmentKind::Merged,
                });
            }
        }

        let fastest = self
            .elevators
            .iter()
            .map(|elevator| (elevator.index(), elevator.plan_placement(&request, now)))
            .fold(None, |best: Option<(usize, Placement)>, (index, placement)| match best {
                Some((_, fastest)) if fastest.arrival <= placement.arrival => best,
                _ => Some((index, placement)),
            });

        let Some((index, placement)) = fastest else {
            warn!("no elevator to serve {}", request);
            return None;
        };
        self.elevators[index].insert(request, placement.slot);
        debug!(
            "assigned {} to elevator {} ({:?}, arrival in {:.2}s)",
            request, index, placement.slot, placement.arrival
        );
        Some(Assignment {
            request: request,
            elevator: index,
            kind: AssignmentKind::Inserted {
                slot: placement.slot,
                arrival: placement.arrival,
            },
        })
    }

    /// One fixed tick: route new requests, then move every cabin.
    pub fn advance(&mut self, now: f64, delta_time: f64) {
        self.drain_and_assign(now);
        for elevator in self.elevators.iter_mut() {
            elevator.advance(now, delta_time);
        }
    }
}

impl Default for Tower {
    fn default() -> Self {
        Tower::new()
    }
}
