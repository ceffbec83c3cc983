//! Error types for the elevator bank.
//!
//! Rejected requests are reported, never retried: the caller may resubmit.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("origin and destination floors have to be different (both {floor})")]
    SameFloor { floor: u8 },

    #[error("only requests from or to the lobby are valid ({origin} -> {destination})")]
    NotLobbyBound { origin: u8, destination: u8 },

    #[error("{floor} is not a valid floor number (0..={max})")]
    FloorOutOfRange { floor: u8, max: u8 },

    #[error("the simulation is no longer accepting requests")]
    InboxClosed,
}

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("could not spawn the simulation thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("the simulation thread panicked")]
    Panicked,
}
