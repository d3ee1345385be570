//! Injected logging capability.
//!
//! Components take an `Arc<dyn Logger>` at construction instead of reaching for a
//! process-wide logger:
//!
//! - `FacadeLogger` forwards to the `log` crate (the binary installs `env_logger`)
//! - `NoOpLogger` discards everything
//! - `MemoryLogger` keeps the formatted lines so tests can inspect them

mod facade;
mod memory;
mod r#trait;

pub use facade::{FacadeLogger, NoOpLogger};
pub use memory::MemoryLogger;
pub use r#trait::{LogLevel, Logger};
