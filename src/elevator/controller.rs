/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::sleep;
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::ElevatorConfig;
use crate::elevator::{Doors, StatsCollector};
use crate::logging::Logger;
use crate::scheduler::{LookScheduler, RequestScheduler};
use crate::shared::{Behaviour, Button, Direction, DoorState, FloorIndicator, Request};
use crate::{log_debug, log_info, log_warn};

/**
 * Drives a single car through the move, arrive and dwell cycle.
 *
 * Ordering decisions are delegated to a `RequestScheduler`. The controller owns the car
 * position, the doors and the memory of which buttons are lit. `run` is meant to be
 * called on its own thread while other threads call `press_button` and `terminate`.
 *
 * # Fields
 * - `id`:              Identifier of the car.
 * - `travel_time`:     Time to move one floor.
 * - `dwell_time`:      Time the doors stay open at a stop.
 * - `poll_interval`:   Longest idle wait before the scheduler is checked again.
 * - `floor`:           Current floor, shared with the scheduler.
 * - `moving`:          Set while travelling between floors.
 * - `running`:         Cleared by `terminate`; the loop then drains and exits.
 * - `behaviour`:       Idle, Traveling, Boarding or Terminating.
 * - `doors`:           Door state.
 * - `pressed`:         Lit buttons, one set per kind of button.
 * - `scheduler`:       Dispatch policy.
 * - `stats`:           Latency statistics of satisfied requests.
 * - `wake_tx/wake_rx`: Ends an idle wait early when work arrives or on terminate.
 * - `logger`:          Injected logger.
 */
pub struct ElevatorController {
    id: u32,
    travel_time: Duration,
    dwell_time: Duration,
    poll_interval: Duration,
    floor: Arc<FloorIndicator>,
    moving: AtomicBool,
    running: AtomicBool,
    behaviour: Mutex<Behaviour>,
    doors: Mutex<Doors>,
    pressed: Mutex<PressedButtons>,
    scheduler: Arc<dyn RequestScheduler>,
    stats: StatsCollector,
    wake_tx: cbc::Sender<()>,
    wake_rx: cbc::Receiver<()>,
    logger: Arc<dyn Logger>,
}

// A floor is in a set from the moment its press is accepted until its request is satisfied
#[derive(Debug, Default)]
struct PressedButtons {
    internal: HashSet<i32>,
    external_up: HashSet<i32>,
    external_down: HashSet<i32>,
}

impl PressedButtons {
    fn set_for(&mut self, direction: Direction) -> &mut HashSet<i32> {
        match direction {
            Direction::None => &mut self.internal,
            Direction::Up => &mut self.external_up,
            Direction::Down => &mut self.external_down,
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ElevatorController {
    /// Creates a car at `config.start_floor` scheduled with `LookScheduler`.
    pub fn new(config: &ElevatorConfig, logger: Arc<dyn Logger>) -> ElevatorController {
        let floor = Arc::new(FloorIndicator::new(config.start_floor));
        let scheduler = Arc::new(LookScheduler::new(floor.clone(), logger.clone()));
        ElevatorController::with_scheduler(config, floor, scheduler, logger)
    }

    /// Creates a car with a custom scheduler. The car starts on whatever floor `floor`
    /// holds; `config.start_floor` is not applied.
    pub fn with_scheduler(
        config: &ElevatorConfig,
        floor: Arc<FloorIndicator>,
        scheduler: Arc<dyn RequestScheduler>,
        logger: Arc<dyn Logger>,
    ) -> ElevatorController {
        let (wake_tx, wake_rx) = cbc::bounded::<()>(1);
        ElevatorController {
            id: config.id,
            travel_time: config.travel_time(),
            dwell_time: config.dwell_time(),
            poll_interval: config.poll_interval(),
            floor,
            moving: AtomicBool::new(false),
            running: AtomicBool::new(true),
            behaviour: Mutex::new(Behaviour::Idle),
            doors: Mutex::new(Doors::new(logger.clone())),
            pressed: Mutex::new(PressedButtons::default()),
            scheduler,
            stats: StatsCollector::new(),
            wake_tx,
            wake_rx,
            logger,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn current_floor(&self) -> i32 {
        self.floor.get()
    }

    pub fn is_moving(&self) -> bool {
        self.moving.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn behaviour(&self) -> Behaviour {
        *lock(&self.behaviour)
    }

    pub fn door_state(&self) -> DoorState {
        lock(&self.doors).state()
    }

    /// Human readable latency report.
    pub fn stats(&self) -> String {
        self.stats.to_string()
    }

    pub fn completed_requests(&self) -> u64 {
        self.stats.count()
    }

    /// Accepts a button press. A press for a button that is already lit is ignored.
    pub fn press_button(&self, button: Button) {
        log_info!(
            self.logger,
            "[BUTTON_PRESS] Pressing button for floor: {}, direction: {}",
            button.floor,
            button.direction
        );

        let newly_pressed = lock(&self.pressed).set_for(button.direction).insert(button.floor);
        if !newly_pressed {
            log_info!(
                self.logger,
                "[BUTTON_PRESS] Button for floor: {}, direction: {} is already pressed. Ignoring request.",
                button.floor,
                button.direction
            );
            return;
        }

        self.scheduler.add_request(Request::from(button));
        self.wake();
    }

    pub fn press_internal_button(&self, floor: i32) {
        self.press_button(Button::internal(floor));
    }

    pub fn press_external_button(&self, floor: i32, direction: Direction) {
        self.press_button(Button::new(floor, direction));
    }

    /// Stops accepting new idle cycles. Requests already queued are still served.
    pub fn terminate(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.wake();
    }

    fn wake(&self) {
        // A full channel already holds a wake-up
        let _ = self.wake_tx.try_send(());
    }

    pub fn run(&self) {
        log_info!(self.logger, "Elevator {} started on floor {}", self.id, self.current_floor());

        while self.is_running() || self.scheduler.has_requests() {
            if self.scheduler.has_requests() {
                self.process_next_request();
            } else {
                self.enter(Behaviour::Idle);
                self.wait_for_requests();
            }
        }

        self.enter(Behaviour::Idle);
        log_info!(self.logger, "Elevator {} stopped on floor {}", self.id, self.current_floor());
    }

    fn enter(&self, behaviour: Behaviour) {
        let behaviour = if !self.is_running() && behaviour != Behaviour::Idle {
            Behaviour::Terminating
        } else {
            behaviour
        };
        *lock(&self.behaviour) = behaviour;
    }

    fn wait_for_requests(&self) {
        match self.wake_rx.recv_timeout(self.poll_interval) {
            Ok(()) => log_debug!(self.logger, "Elevator waiting for requests interrupted"),
            Err(cbc::RecvTimeoutError::Timeout) => (),
            Err(cbc::RecvTimeoutError::Disconnected) => sleep(self.poll_interval),
        }
    }

    /// Travels to the scheduler's current request, switching destination at floor
    /// boundaries when the scheduler's choice changes, then serves it.
    pub(crate) fn process_next_request(&self) {
        let mut request = match self.scheduler.current_request() {
            Some(request) => request,
            None => {
                log_warn!(self.logger, "Expected a request to exist, but instead got none.");
                return;
            }
        };
        let mut destination = request.floor_number();
        log_info!(
            self.logger,
            "[DESTINATION_CHANGE] Moving elevator in direction {} to floor {}",
            Direction::between(self.current_floor(), destination),
            destination
        );

        lock(&self.doors).close();

        while self.current_floor() != destination {
            self.moving.store(true, Ordering::SeqCst);
            self.enter(Behaviour::Traveling);
            self.travel_one_floor_towards(destination);

            if let Some(next) = self.scheduler.current_request() {
                if next.id() != request.id() {
                    request = next;
                    destination = request.floor_number();
                    log_info!(
                        self.logger,
                        "[DESTINATION_CHANGE] Updating elevator to move in direction {} to floor {}",
                        Direction::between(self.current_floor(), destination),
                        destination
                    );
                }
            }
        }

        self.moving.store(false, Ordering::SeqCst);
        self.arrived_at_destination(&request);
    }

    fn travel_one_floor_towards(&self, destination: i32) {
        if destination == self.current_floor() {
            log_info!(
                self.logger,
                "Destination floor ({}) and current floor are the same. Elevator will not move.",
                destination
            );
            return;
        }

        sleep(self.travel_time);
        let floor = self.floor.step_towards(destination);
        log_info!(
            self.logger,
            "[MOVING] Current floor is now: {}, destination floor is: {}",
            floor,
            destination
        );
    }

    fn arrived_at_destination(&self, request: &Request) {
        log_info!(self.logger, "[ARRIVED] Destination reached. Floor: {}", request.floor_number());

        let removed = self.scheduler.remove_request(request);
        lock(&self.pressed)
            .set_for(request.desired_direction())
            .remove(&request.floor_number());

        if !removed {
            log_warn!(
                self.logger,
                "Arrived for a request on floor {} that is no longer scheduled.",
                request.floor_number()
            );
            sleep(self.poll_interval);
            return;
        }
        self.stats.add_completed_request(request);

        self.enter(Behaviour::Boarding);
        lock(&self.doors).open();
        sleep(self.dwell_time);
        lock(&self.doors).close();
    }
}

impl fmt::Display for ElevatorController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Elevator{{id={}, currentFloor={}, isMoving={}, doors={}, travelTime={:?}, dwellTime={:?}, pollInterval={:?}}}",
            self.id,
            self.current_floor(),
            self.is_moving(),
            self.door_state(),
            self.travel_time,
            self.dwell_time,
            self.poll_interval
        )
    }
}
