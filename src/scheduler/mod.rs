pub mod job_queue;
pub mod look;

pub use look::LookScheduler;

use crate::shared::Request;

/**
 * Dispatch policy used by the elevator controller.
 *
 * Every operation is atomic with respect to every other, so one scheduler can be shared
 * between the controller thread and whoever presses buttons.
 */
pub trait RequestScheduler: Send + Sync {
    /// Takes ownership of a new, not yet satisfied request.
    fn add_request(&self, request: Request);

    /// Drops a satisfied request. Returns `false` if it was not in the active queue.
    fn remove_request(&self, request: &Request) -> bool;

    /// The request the car should travel to next, without removing it.
    fn current_request(&self) -> Option<Request>;

    fn has_requests(&self) -> bool;
}
