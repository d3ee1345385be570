/*
 * Unit tests for the elevator controller
 *
 * The unit tests follows the Arrange, Act, Assert pattern. The controller loop runs on
 * a separate thread with millisecond travel and dwell times.
 *
 * Tests:
 * - test_controller_init
 * - test_duplicate_press_is_ignored
 * - test_internal_and_external_presses_do_not_collide
 * - test_press_after_satisfaction_creates_new_request
 * - test_scenario_start_floor_10
 * - test_scenario_start_floor_0
 * - test_scenario_start_floor_5
 * - test_hall_calls_follow_sweep
 * - test_mid_travel_redirect
 * - test_terminate_drains_queue
 * - test_terminate_while_idle
 * - test_missing_request_is_logged
 * - test_unremovable_request_releases_button
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod controller_tests {
    use crate::config::ElevatorConfig;
    use crate::elevator::ElevatorController;
    use crate::logging::{LogLevel, MemoryLogger};
    use crate::scheduler::{LookScheduler, RequestScheduler};
    use crate::shared::Direction::{Down, Up};
    use crate::shared::{Behaviour, Button, DoorState, FloorIndicator, Request};
    use crossbeam_channel::unbounded;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::thread::{sleep, spawn};
    use std::time::{Duration, Instant};

    fn test_config(travel_time_ms: u64) -> ElevatorConfig {
        ElevatorConfig {
            id: 7,
            start_floor: 0,
            travel_time_ms,
            dwell_time_ms: 1,
            poll_interval_ms: 5,
        }
    }

    fn setup_controller(
        start_floor: i32,
        travel_time_ms: u64,
    ) -> (Arc<ElevatorController>, Arc<LookScheduler>, Arc<MemoryLogger>) {
        let logger = Arc::new(MemoryLogger::new());
        let floor = Arc::new(FloorIndicator::new(start_floor));
        let scheduler = Arc::new(LookScheduler::new(floor.clone(), logger.clone()));
        let controller = ElevatorController::with_scheduler(
            &test_config(travel_time_ms),
            floor,
            scheduler.clone(),
            logger.clone(),
        );
        (Arc::new(controller), scheduler, logger)
    }

    // Runs the loop on its own thread and returns a handle that waits for it to finish
    fn start(controller: &Arc<ElevatorController>) -> impl FnOnce() {
        let (done_tx, done_rx) = unbounded::<()>();
        let runner = controller.clone();
        let handle = spawn(move || {
            runner.run();
            let _ = done_tx.send(());
        });

        move || {
            match done_rx.recv_timeout(Duration::from_secs(10)) {
                Ok(()) => {}
                Err(crossbeam_channel::RecvTimeoutError::Timeout) => {
                    panic!("Timed out waiting for the elevator to stop");
                }
                Err(e) => panic!("Elevator thread failed: {:?}", e),
            }
            handle.join().unwrap();
        }
    }

    fn arrivals(logger: &MemoryLogger) -> Vec<i32> {
        logger
            .tagged("[ARRIVED]")
            .iter()
            .map(|line| line.rsplit(' ').next().unwrap().parse().unwrap())
            .collect()
    }

    fn run_scenario(start_floor: i32, presses: &[i32]) -> Vec<i32> {
        let (controller, _scheduler, logger) = setup_controller(start_floor, 1);
        for &floor in presses {
            controller.press_internal_button(floor);
        }

        let wait = start(&controller);
        controller.terminate();
        wait();

        assert_eq!(controller.completed_requests(), presses.len() as u64);
        arrivals(&logger)
    }

    #[test]
    fn test_controller_init() {
        // Arrange
        let (controller, scheduler, _logger) = setup_controller(3, 1);

        // Assert
        assert_eq!(controller.id(), 7);
        assert_eq!(controller.current_floor(), 3);
        assert!(!controller.is_moving());
        assert!(controller.is_running());
        assert_eq!(controller.behaviour(), Behaviour::Idle);
        assert_eq!(controller.door_state(), DoorState::Closed);
        assert!(!scheduler.has_requests());
        assert!(controller.stats().contains("Total Requests Completed:  0"));
    }

    #[test]
    fn test_duplicate_press_is_ignored() {
        // Arrange
        let (controller, scheduler, logger) = setup_controller(0, 1);

        // Act
        controller.press_internal_button(5);
        controller.press_internal_button(5);

        // Assert
        assert_eq!(scheduler.active_len(), 1);
        let ignored = logger.tagged("[BUTTON_PRESS] Button for floor: 5");
        assert_eq!(ignored.len(), 1);
        assert!(ignored[0].ends_with("is already pressed. Ignoring request."));
    }

    #[test]
    fn test_internal_and_external_presses_do_not_collide() {
        // Arrange
        let (controller, scheduler, _logger) = setup_controller(0, 1);

        // Act
        controller.press_button(Button::internal(4));
        controller.press_button(Button::new(4, Up));
        controller.press_button(Button::new(4, Down));
        controller.press_button(Button::new(4, Up));

        // Assert
        assert_eq!(scheduler.active_len(), 3);
    }

    #[test]
    fn test_press_after_satisfaction_creates_new_request() {
        // Arrange
        let (controller, scheduler, logger) = setup_controller(0, 1);
        controller.press_internal_button(2);
        controller.terminate();
        controller.run();
        assert_eq!(controller.completed_requests(), 1);

        // Act
        controller.press_internal_button(2);

        // Assert
        assert_eq!(scheduler.active_len(), 1);
        assert!(logger.tagged("[BUTTON_PRESS] Button for floor").is_empty());

        controller.run();
        assert_eq!(controller.completed_requests(), 2);
        assert!(!scheduler.has_requests());
    }

    #[test]
    fn test_scenario_start_floor_10() {
        assert_eq!(run_scenario(10, &[5, 7, 3, 1, 2, 9]), vec![9, 7, 5, 3, 2, 1]);
    }

    #[test]
    fn test_scenario_start_floor_0() {
        assert_eq!(run_scenario(0, &[5, 7, 3, 1, 2, 9]), vec![1, 2, 3, 5, 7, 9]);
    }

    #[test]
    fn test_scenario_start_floor_5() {
        assert_eq!(run_scenario(5, &[6, 7, 3, 1, -2, 9]), vec![6, 7, 9, 3, 1, -2]);
    }

    #[test]
    fn test_hall_calls_follow_sweep() {
        // Purpose: going up from 2, the DOWN call at 8 is served after the UP work and
        // before the internal press below the car

        // Arrange
        let (controller, _scheduler, logger) = setup_controller(2, 1);
        controller.press_external_button(4, Up);
        controller.press_external_button(8, Down);
        controller.press_internal_button(6);
        controller.press_internal_button(0);

        // Act
        let wait = start(&controller);
        controller.terminate();
        wait();

        // Assert
        assert_eq!(arrivals(&logger), vec![4, 6, 8, 0]);
        assert_eq!(controller.current_floor(), 0);
    }

    #[test]
    fn test_mid_travel_redirect() {
        // Arrange
        let (controller, _scheduler, logger) = setup_controller(0, 40);
        controller.press_internal_button(9);
        let wait = start(&controller);

        let deadline = Instant::now() + Duration::from_secs(5);
        while controller.current_floor() < 2 {
            assert!(Instant::now() < deadline, "Elevator never left the ground floor");
            sleep(Duration::from_millis(2));
        }
        assert!(controller.is_moving());

        // Act
        controller.press_internal_button(6);
        controller.terminate();
        wait();

        // Assert
        assert_eq!(arrivals(&logger), vec![6, 9]);
        assert!(logger
            .tagged("[DESTINATION_CHANGE]")
            .contains(&"[DESTINATION_CHANGE] Updating elevator to move in direction UP to floor 6".to_string()));
        assert_eq!(controller.current_floor(), 9);
    }

    #[test]
    fn test_terminate_drains_queue() {
        // Arrange
        let (controller, scheduler, logger) = setup_controller(0, 1);
        controller.press_internal_button(2);
        controller.press_external_button(4, Down);

        // Act
        controller.terminate();
        controller.run();

        // Assert
        assert!(!controller.is_running());
        assert!(!scheduler.has_requests());
        assert_eq!(controller.completed_requests(), 2);
        assert_eq!(arrivals(&logger), vec![2, 4]);
        assert_eq!(controller.behaviour(), Behaviour::Idle);
        assert_eq!(controller.door_state(), DoorState::Closed);
        assert!(!controller.is_moving());
        assert_eq!(logger.tagged("[MOVING]").len(), 4);
    }

    #[test]
    fn test_terminate_while_idle() {
        // Arrange
        let (controller, _scheduler, _logger) = setup_controller(0, 1);
        let wait = start(&controller);
        sleep(Duration::from_millis(20));

        // Act
        controller.terminate();
        wait();

        // Assert
        assert_eq!(controller.completed_requests(), 0);
        assert_eq!(controller.current_floor(), 0);
    }

    struct EmptyScheduler;

    impl RequestScheduler for EmptyScheduler {
        fn add_request(&self, _request: Request) {}

        fn remove_request(&self, _request: &Request) -> bool {
            false
        }

        fn current_request(&self) -> Option<Request> {
            None
        }

        fn has_requests(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_missing_request_is_logged() {
        // Arrange
        let logger = Arc::new(MemoryLogger::new());
        let controller = ElevatorController::with_scheduler(
            &test_config(1),
            Arc::new(FloorIndicator::new(1)),
            Arc::new(EmptyScheduler),
            logger.clone(),
        );

        // Act
        controller.process_next_request();

        // Assert
        assert_eq!(
            logger.at_level(LogLevel::Warn),
            vec!["Expected a request to exist, but instead got none.".to_string()]
        );
        assert_eq!(controller.current_floor(), 1);
        assert_eq!(controller.completed_requests(), 0);
    }

    // Keeps handing out the last added request and refuses to remove it
    #[derive(Default)]
    struct StuckScheduler {
        request: Mutex<Option<Request>>,
        added: AtomicUsize,
    }

    impl RequestScheduler for StuckScheduler {
        fn add_request(&self, request: Request) {
            self.added.fetch_add(1, Ordering::SeqCst);
            *self.request.lock().unwrap() = Some(request);
        }

        fn remove_request(&self, _request: &Request) -> bool {
            false
        }

        fn current_request(&self) -> Option<Request> {
            self.request.lock().unwrap().clone()
        }

        fn has_requests(&self) -> bool {
            self.request.lock().unwrap().is_some()
        }
    }

    #[test]
    fn test_unremovable_request_releases_button() {
        // Arrange
        let logger = Arc::new(MemoryLogger::new());
        let scheduler = Arc::new(StuckScheduler::default());
        let mut config = test_config(1);
        config.poll_interval_ms = 30;
        let controller = ElevatorController::with_scheduler(
            &config,
            Arc::new(FloorIndicator::new(2)),
            scheduler.clone(),
            logger.clone(),
        );
        controller.press_internal_button(2);

        // Act
        let started = Instant::now();
        controller.process_next_request();
        let elapsed = started.elapsed();
        controller.press_internal_button(2);

        // Assert
        assert!(elapsed >= Duration::from_millis(30));
        assert_eq!(
            logger.at_level(LogLevel::Warn),
            vec!["Arrived for a request on floor 2 that is no longer scheduled.".to_string()]
        );
        assert_eq!(scheduler.added.load(Ordering::SeqCst), 2);
        assert!(logger.tagged("[BUTTON_PRESS] Button for floor").is_empty());
        assert_eq!(controller.completed_requests(), 0);
        assert_eq!(controller.door_state(), DoorState::Closed);
    }
}
