use rand::Rng;
use thiserror::Error;

use elevator_bank::config::{LOBBY_FLOOR, NUMBER_OF_FLOORS};

pub const HELP: &str = "\
COMMANDS
  addRequest | ar <from> <to>         call an elevator, one floor must be the lobby (0)
  addRandomRequest | arr [count]      submit random lobby-bound requests (default 1)
  status                              print every elevator once
  help                                show this text
  quit | exit | <empty line>          stop the simulation";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    AddRequest { origin: u8, destination: u8 },
    AddRandomRequests(u8),
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}', type 'help' for a list of commands")]
    UnknownCommand(String),

    #[error("'{command}' needs {expected}")]
    WrongArity { command: String, expected: &'static str },

    #[error("'{0}' is not a whole number")]
    NotANumber(String),

    #[error("{floor} is not a valid floor number (0..={max})")]
    InvalidFloor { floor: u16, max: u8 },

    #[error("limited to {limit} random requests at once, got {count}")]
    TooManyRandom { count: u16, limit: u8 },
}

fn number(word: &str) -> Result<u16, CommandError> {
    word.parse::<u16>()
        .map_err(|_| CommandError::NotANumber(word.to_string()))
}

fn floor(word: &str) -> Result<u8, CommandError> {
    let floor = number(word)?;
    match u8::try_from(floor) {
        Ok(floor) if floor <= NUMBER_OF_FLOORS => Ok(floor),
        _ => Err(CommandError::InvalidFloor {
            floor: floor,
            max: NUMBER_OF_FLOORS,
        }),
    }
}

fn random_count(word: &str, limit: u8) -> Result<u8, CommandError> {
    let count = number(word)?;
    match u8::try_from(count) {
        Ok(count) if count <= limit => Ok(count),
        _ => Err(CommandError::TooManyRandom {
            count: count,
            limit: limit,
        }),
    }
}

/// Parses one line of user input. Floors are only range-checked here; the
/// lobby rule is enforced when the request is submitted.
pub fn parse(line: &str, random_limit: u8) -> Result<Command, CommandError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((keyword, arguments)) = words.split_first() else {
        return Ok(Command::Quit);
    };

    match keyword.to_ascii_lowercase().as_str() {
        "ar" | "addrequest" => match arguments {
            [origin, destination] => Ok(Command::AddRequest {
                origin: floor(origin)?,
                destination: floor(destination)?,
            }),
            _ => Err(CommandError::WrongArity {
                command: keyword.to_string(),
                expected: "2 floors",
            }),
        },
        "arr" | "addrandomrequest" => match arguments {
            [] => Ok(Command::AddRandomRequests(1)),
            [count] => Ok(Command::AddRandomRequests(random_count(count, random_limit)?)),
            _ => Err(CommandError::WrongArity {
                command: keyword.to_string(),
                expected: "at most 1 count",
            }),
        },
        "status" => Ok(Command::Status),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        _ => Err(CommandError::UnknownCommand(keyword.to_string())),
    }
}

/// A trip between the lobby and a random upper floor, up or down with equal odds.
pub fn random_request<R: Rng>(rng: &mut R) -> (u8, u8) {
    let floor = rng.gen_range(1..=NUMBER_OF_FLOORS);
    if rng.gen_bool(0.5) {
        (LOBBY_FLOOR, floor)
    } else {
        (floor, LOBBY_FLOOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn add_request() {
        assert_eq!(parse("ar 0 15", 12), Ok(Command::AddRequest { origin: 0, destination: 15 }));
        assert_eq!(parse("  addRequest   20 0 ", 12), Ok(Command::AddRequest { origin: 20, destination: 0 }));
        // not lobby-bound, rejected later by the tower
        assert_eq!(parse("AR 4 9", 12), Ok(Command::AddRequest { origin: 4, destination: 9 }));
    }

    #[test]
    fn add_random_requests() {
        assert_eq!(parse("arr", 12), Ok(Command::AddRandomRequests(1)));
        assert_eq!(parse("addRandomRequest 5", 12), Ok(Command::AddRandomRequests(5)));
        assert_eq!(parse("arr 12", 12), Ok(Command::AddRandomRequests(12)));
    }

    #[test]
    fn keywords() {
        assert_eq!(parse("", 12), Ok(Command::Quit));
        assert_eq!(parse("   ", 12), Ok(Command::Quit));
        assert_eq!(parse("QUIT", 12), Ok(Command::Quit));
        assert_eq!(parse("exit", 12), Ok(Command::Quit));
        assert_eq!(parse("help", 12), Ok(Command::Help));
        assert_eq!(parse("status", 12), Ok(Command::Status));
    }

    #[test]
    fn errors() {
        assert_eq!(parse("fly 3", 12), Err(CommandError::UnknownCommand(String::from("fly"))));
        assert_eq!(parse("ar 0 x", 12), Err(CommandError::NotANumber(String::from("x"))));
        assert_eq!(parse("ar 0 -1", 12), Err(CommandError::NotANumber(String::from("-1"))));
        assert_eq!(parse("ar 0 300", 12), Err(CommandError::InvalidFloor { floor: 300, max: NUMBER_OF_FLOORS }));
        assert_eq!(parse("ar 56 0", 12), Err(CommandError::InvalidFloor { floor: 56, max: NUMBER_OF_FLOORS }));
        assert_eq!(parse("arr 13", 12), Err(CommandError::TooManyRandom { count: 13, limit: 12 }));
        assert!(matches!(parse("ar 5", 12), Err(CommandError::WrongArity { .. })));
        assert!(matches!(parse("ar 0 1 2", 12), Err(CommandError::WrongArity { .. })));
        assert!(matches!(parse("arr 1 2", 12), Err(CommandError::WrongArity { .. })));
    }

    #[test]
    fn errors_read_like_prompts() {
        let err = parse("arr 40", 12).unwrap_err();
        assert_eq!(err.to_string(), "limited to 12 random requests at once, got 40");
    }

    #[test]
    fn random_requests_touch_the_lobby() {
        let mut rng = StdRng::seed_from_u64(27);
        let mut ups = 0;
        for _ in 0..200 {
            let (origin, destination) = random_request(&mut rng);
            assert_ne!(origin, destination);
            assert!(origin == LOBBY_FLOOR || destination == LOBBY_FLOOR);
            assert!(origin <= NUMBER_OF_FLOORS && destination <= NUMBER_OF_FLOORS);
            if origin == LOBBY_FLOOR {
                ups += 1;
            }
        }
        assert!(ups > 50 && ups < 150);
    }

    #[test]
    fn same_seed_same_requests() {
        let first: Vec<_> = (0..10).scan(StdRng::seed_from_u64(1), |rng, _| Some(random_request(rng))).collect();
        let second: Vec<_> = (0..10).scan(StdRng::seed_from_u64(1), |rng, _| Some(random_request(rng))).collect();
        assert_eq!(first, second);
    }
}
