#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Down,
    #[default]
    Stop,
    Up,
}

impl Direction {
    /// Direction of travel needed to cover `displacement` (metres, up positive).
    pub fn of_displacement(displacement: f64) -> Self {
        if displacement > 0.0 {
            Direction::Up
        } else if displacement < 0.0 {
            Direction::Down
        } else {
            Direction::Stop
        }
    }

    pub fn between(from: u8, to: u8) -> Self {
        Direction::of_displacement(f64::from(to) - f64::from(from))
    }

    /// Sign applied to speed to get velocity. A cabin without a direction
    /// still reports its (decaying) speed upwards.
    pub fn signum(self) -> f64 {
        match self {
            Direction::Up | Direction::Stop => 1.0,
            Direction::Down => -1.0,
        }
    }

    pub fn as_string(self) -> Option<String> {
        match self {
            Direction::Down => Some(String::from("down")),
            Direction::Up => Some(String::from("up")),
            Direction::Stop => None,
        }
    }
}
