/***************************************/
/*        3rd party libraries          */
/***************************************/
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI32, AtomicU64, Ordering};
use std::time::Instant;

static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(0);

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    None,
}

impl Direction {
    /// Direction the car has to move to get from `from` to `to`.
    pub fn between(from: i32, to: i32) -> Direction {
        if to > from {
            Direction::Up
        } else if to < from {
            Direction::Down
        } else {
            Direction::None
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::None => "NONE",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDirectionError(pub String);

impl fmt::Display for ParseDirectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown direction '{}'", self.0)
    }
}

impl std::error::Error for ParseDirectionError {}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "UP" => Ok(Direction::Up),
            "DOWN" => Ok(Direction::Down),
            "NONE" => Ok(Direction::None),
            other => Err(ParseDirectionError(other.to_string())),
        }
    }
}

/**
 * A physical button, either in the car (`Direction::None`) or a hall call (`Up`/`Down`).
 *
 * Only used to deduplicate presses; ordering is done on `Request`s.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Button {
    pub floor: i32,
    pub direction: Direction,
}

impl Button {
    pub fn new(floor: i32, direction: Direction) -> Button {
        Button { floor, direction }
    }

    pub fn internal(floor: i32) -> Button {
        Button::new(floor, Direction::None)
    }

    pub fn is_internal(&self) -> bool {
        self.direction == Direction::None
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Button{{floor={}, direction={}}}", self.floor, self.direction)
    }
}

/**
 * One unsatisfied trip intent.
 *
 * Requests are immutable once created. Every request gets a process-unique `id`, so two
 * requests for the same floor and direction are still distinct values.
 *
 * # Fields
 * - `id`:                  Unique identity, increasing in creation order.
 * - `floor_number`:        Destination (internal) or calling floor (external).
 * - `desired_direction`:   `None` for in-car presses, `Up`/`Down` for hall calls.
 * - `time_created`:        When the press was accepted, used for latency statistics.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    id: u64,
    floor_number: i32,
    desired_direction: Direction,
    time_created: Instant,
}

impl Request {
    pub fn new(floor_number: i32, desired_direction: Direction) -> Request {
        Request {
            id: NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed),
            floor_number,
            desired_direction,
            time_created: Instant::now(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn floor_number(&self) -> i32 {
        self.floor_number
    }

    pub fn desired_direction(&self) -> Direction {
        self.desired_direction
    }

    pub fn time_created(&self) -> Instant {
        self.time_created
    }
}

impl From<Button> for Request {
    fn from(button: Button) -> Self {
        Request::new(button.floor, button.direction)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorState {
    Open,
    Closed,
}

impl fmt::Display for DoorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            DoorState::Open => f.write_str("OPEN"),
            DoorState::Closed => f.write_str("CLOSED"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behaviour {
    Idle,
    Traveling,
    Boarding,
    Terminating,
}

/**
 * The car's current floor, shared between the controller (writer) and the scheduler
 * (reader). Reads and writes are atomic; nothing else is synchronized through it.
 */
#[derive(Debug, Default)]
pub struct FloorIndicator {
    floor: AtomicI32,
}

impl FloorIndicator {
    pub fn new(floor: i32) -> FloorIndicator {
        FloorIndicator {
            floor: AtomicI32::new(floor),
        }
    }

    pub fn get(&self) -> i32 {
        self.floor.load(Ordering::SeqCst)
    }

    pub fn set(&self, floor: i32) {
        self.floor.store(floor, Ordering::SeqCst);
    }

    /// Moves one floor towards `destination` and returns the new floor.
    pub fn step_towards(&self, destination: i32) -> i32 {
        let current = self.get();
        let next = match Direction::between(current, destination) {
            Direction::Up => current + 1,
            Direction::Down => current - 1,
            Direction::None => current,
        };
        self.set(next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parse_and_display() {
        assert_eq!("UP".parse::<Direction>(), Ok(Direction::Up));
        assert_eq!(" DOWN ".parse::<Direction>(), Ok(Direction::Down));
        assert_eq!("NONE".parse::<Direction>(), Ok(Direction::None));
        assert!("SIDEWAYS".parse::<Direction>().is_err());
        assert_eq!(Direction::Down.to_string(), "DOWN");
    }

    #[test]
    fn test_direction_between() {
        assert_eq!(Direction::between(3, 5), Direction::Up);
        assert_eq!(Direction::between(3, -1), Direction::Down);
        assert_eq!(Direction::between(4, 4), Direction::None);
    }

    #[test]
    fn test_button_equality_by_value() {
        assert_eq!(Button::new(3, Direction::Up), Button::new(3, Direction::Up));
        assert_ne!(Button::new(3, Direction::Up), Button::new(3, Direction::Down));
        assert_ne!(Button::internal(3), Button::new(3, Direction::Up));
        assert!(Button::internal(3).is_internal());
    }

    #[test]
    fn test_requests_are_distinct() {
        let first = Request::new(2, Direction::None);
        let second = Request::new(2, Direction::None);

        assert_ne!(first, second);
        assert!(second.id() > first.id());
        assert_eq!(first, first.clone());
    }

    #[test]
    fn test_floor_indicator_steps() {
        let floor = FloorIndicator::new(2);

        assert_eq!(floor.step_towards(4), 3);
        assert_eq!(floor.step_towards(-1), 2);
        assert_eq!(floor.step_towards(2), 2);
        assert_eq!(floor.get(), 2);
    }
}
