/***************************************/
/*        3rd party libraries          */
/***************************************/
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::logging::Logger;
use crate::log_debug;
use crate::scheduler::job_queue::{JobQueue, QueueOrder};
use crate::scheduler::RequestScheduler;
use crate::shared::{Direction, FloorIndicator, Request};

/**
 * LOOK scheduling with a desired-direction check.
 *
 * All reachable work in the current direction is served before the car turns around.
 * Active queues are kept in travel order (`up_jobs` ascending, `down_jobs` descending).
 * A hall call whose direction matches the current travel direction, but whose floor is
 * already behind the car, goes to the matching pending queue. Pending work is promoted
 * when its active queue drains.
 *
 * # Fields
 * - `floor`:   The car's live floor, read on every `add_request`.
 * - `queues`:  The four queues and the scheduling direction, behind one lock.
 * - `logger`:  Injected logger.
 */
pub struct LookScheduler {
    floor: Arc<FloorIndicator>,
    queues: Mutex<Queues>,
    logger: Arc<dyn Logger>,
}

struct Queues {
    up_jobs: JobQueue,
    down_jobs: JobQueue,
    pending_up_jobs: JobQueue,
    pending_down_jobs: JobQueue,
    scheduling_direction: Direction,
}

impl Queues {
    fn new() -> Queues {
        Queues {
            up_jobs: JobQueue::new(QueueOrder::Ascending),
            down_jobs: JobQueue::new(QueueOrder::Descending),
            pending_up_jobs: JobQueue::new(QueueOrder::Ascending),
            pending_down_jobs: JobQueue::new(QueueOrder::Descending),
            scheduling_direction: Direction::None,
        }
    }

    fn start_if_idle(&mut self, direction: Direction) {
        if self.scheduling_direction == Direction::None {
            self.scheduling_direction = direction;
        }
    }
}

impl LookScheduler {
    pub fn new(floor: Arc<FloorIndicator>, logger: Arc<dyn Logger>) -> LookScheduler {
        LookScheduler {
            floor,
            queues: Mutex::new(Queues::new()),
            logger,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Queues> {
        self.queues.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn scheduling_direction(&self) -> Direction {
        self.lock().scheduling_direction
    }

    /// Number of requests in the active queues.
    pub fn active_len(&self) -> usize {
        let queues = self.lock();
        queues.up_jobs.len() + queues.down_jobs.len()
    }

    /// Number of requests waiting in the pending queues.
    pub fn pending_len(&self) -> usize {
        let queues = self.lock();
        queues.pending_up_jobs.len() + queues.pending_down_jobs.len()
    }

    /// Active up, active down, pending up and pending down floors, in priority order.
    pub fn snapshot(&self) -> [Vec<i32>; 4] {
        let queues = self.lock();
        [
            queues.up_jobs.floors(),
            queues.down_jobs.floors(),
            queues.pending_up_jobs.floors(),
            queues.pending_down_jobs.floors(),
        ]
    }
}

impl RequestScheduler for LookScheduler {
    fn add_request(&self, request: Request) {
        let current_floor = self.floor.get();
        let floor = request.floor_number();
        let mut queues = self.lock();

        match request.desired_direction() {
            Direction::Up => {
                if floor >= current_floor || queues.scheduling_direction != Direction::Up {
                    queues.up_jobs.push(request);
                } else {
                    log_debug!(self.logger, "Floor {} (UP) is behind the car, deferring", floor);
                    queues.pending_up_jobs.push(request);
                }
                queues.start_if_idle(Direction::Up);
            }
            Direction::Down => {
                if floor <= current_floor || queues.scheduling_direction != Direction::Down {
                    queues.down_jobs.push(request);
                } else {
                    log_debug!(self.logger, "Floor {} (DOWN) is behind the car, deferring", floor);
                    queues.pending_down_jobs.push(request);
                }
                queues.start_if_idle(Direction::Down);
            }
            Direction::None => {
                if floor >= current_floor {
                    queues.up_jobs.push(request);
                    queues.start_if_idle(Direction::Up);
                } else {
                    queues.down_jobs.push(request);
                    queues.start_if_idle(Direction::Down);
                }
            }
        }
    }

    fn remove_request(&self, request: &Request) -> bool {
        let mut queues = self.lock();
        let q = &mut *queues;

        let (active, pending, opposite) = match q.scheduling_direction {
            Direction::Up => (&mut q.up_jobs, &mut q.pending_up_jobs, &q.down_jobs),
            _ => (&mut q.down_jobs, &mut q.pending_down_jobs, &q.up_jobs),
        };

        let removed = active.remove(request);
        if active.is_empty() {
            pending.drain_into(active);
            let refilled = !active.is_empty();
            let flip = !opposite.is_empty();

            if flip {
                q.scheduling_direction = match q.scheduling_direction {
                    Direction::Up => Direction::Down,
                    _ => Direction::Up,
                };
                log_debug!(self.logger, "Scheduling direction is now {}", q.scheduling_direction);
            } else if !refilled {
                q.scheduling_direction = Direction::None;
            }
        }
        removed
    }

    fn current_request(&self) -> Option<Request> {
        let queues = self.lock();
        match queues.scheduling_direction {
            Direction::Up => queues.up_jobs.peek().cloned(),
            _ => queues.down_jobs.peek().cloned(),
        }
    }

    fn has_requests(&self) -> bool {
        let queues = self.lock();
        !queues.up_jobs.is_empty() || !queues.down_jobs.is_empty()
    }
}
