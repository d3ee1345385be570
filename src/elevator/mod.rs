pub mod controller;
pub mod doors;
pub mod stats;
mod controller_tests;

pub use controller::ElevatorController;
pub use doors::Doors;
pub use stats::StatsCollector;
