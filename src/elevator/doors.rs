use std::sync::Arc;

use crate::log_info;
use crate::logging::Logger;
use crate::shared::DoorState;

/// Car doors. Opening and closing take effect immediately.
pub struct Doors {
    state: DoorState,
    logger: Arc<dyn Logger>,
}

impl Doors {
    pub fn new(logger: Arc<dyn Logger>) -> Doors {
        Doors {
            state: DoorState::Closed,
            logger,
        }
    }

    pub fn open(&mut self) {
        self.state = DoorState::Open;
        log_info!(self.logger, "[DOORS] Opening doors.");
    }

    /// Closing already closed doors is a no-op.
    pub fn close(&mut self) {
        if self.state == DoorState::Closed {
            return;
        }
        self.state = DoorState::Closed;
        log_info!(self.logger, "[DOORS] Closing doors.");
    }

    pub fn are_closed(&self) -> bool {
        self.state == DoorState::Closed
    }

    pub fn state(&self) -> DoorState {
        self.state
    }
}
