/* Modules */
pub mod banner;
pub mod config;
pub mod elevator;
pub mod event_source;
pub mod logging;
pub mod scheduler;
pub mod shared;

pub use elevator::ElevatorController;
pub use event_source::EventSource;
pub use scheduler::{LookScheduler, RequestScheduler};
pub use shared::{Button, Direction, Request};
